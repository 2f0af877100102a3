use cosden_core::config::PlannerConfig;
use cosden_core::domain::effect::ToneShift;
use cosden_core::domain::goal::{CosmeticGoal, CosmeticGoalType};

use crate::profile::CosmeticUserProfile;

const EVENT_KEYWORDS: &[&str] =
    &["wedding", "photoshoot", "photo shoot", "big event", "red carpet", "tonight", "tomorrow"];
const DAILY_KEYWORDS: &[&str] = &["every day", "daily", "routine", "maintenance"];
const GENTLE_KEYWORDS: &[&str] = &["gentle", "sensitive", "start", "first time"];
const MINERAL_KEYWORDS: &[&str] = &["mineral", "comfort", "tray", "overnight"];

const COOL_CUES: &[&str] = &["cool", "blue white"];
const WARM_CUES: &[&str] = &["warm", "golden"];
const NEUTRAL_CUES: &[&str] = &["neutral", "porcelain"];

const TONIGHT_EVENT_HOURS: u32 = 8;
const TOMORROW_EVENT_HOURS: u32 = 24;

/// Deterministic keyword classifier from request text to a [`CosmeticGoal`].
///
/// Keyword groups are checked in priority order (event, daily, gentle,
/// mineral); the first group with a hit decides the goal type.
#[derive(Clone, Debug, Default)]
pub struct GoalInterpreter {
    planner: PlannerConfig,
}

impl GoalInterpreter {
    pub fn new(planner: PlannerConfig) -> Self {
        Self { planner }
    }

    pub fn interpret(&self, user: &CosmeticUserProfile, request_text: &str) -> CosmeticGoal {
        let text = normalize_text(request_text);
        let goal_type = classify_goal_type(&text, user);

        let tone_preference = user.tone_preference.or_else(|| tone_cue(&text));
        let target_event_hours = user.event_time_hours.or_else(|| {
            (goal_type == CosmeticGoalType::EventMaximize).then(|| event_hours_cue(&text)).flatten()
        });
        let max_steps = if user.sensitivity_flag {
            self.planner.sensitive_max_steps
        } else {
            self.planner.default_max_steps
        };

        CosmeticGoal { goal_type, tone_preference, max_steps, target_event_hours }
    }
}

fn classify_goal_type(text: &str, user: &CosmeticUserProfile) -> CosmeticGoalType {
    if contains_any(text, EVENT_KEYWORDS) {
        CosmeticGoalType::EventMaximize
    } else if contains_any(text, DAILY_KEYWORDS) {
        CosmeticGoalType::DailyMaintenance
    } else if contains_any(text, GENTLE_KEYWORDS) {
        CosmeticGoalType::GentleStart
    } else if contains_any(text, MINERAL_KEYWORDS) {
        CosmeticGoalType::MineralSupport
    } else if !user.age_profile.group.is_grown() || user.sensitivity_flag {
        CosmeticGoalType::GentleStart
    } else {
        CosmeticGoalType::DailyMaintenance
    }
}

fn tone_cue(text: &str) -> Option<ToneShift> {
    if contains_any(text, COOL_CUES) {
        Some(ToneShift::Cool)
    } else if contains_any(text, WARM_CUES) {
        Some(ToneShift::Warm)
    } else if contains_any(text, NEUTRAL_CUES) {
        Some(ToneShift::Neutral)
    } else {
        None
    }
}

fn event_hours_cue(text: &str) -> Option<u32> {
    if text.contains("tonight") {
        Some(TONIGHT_EVENT_HOURS)
    } else if text.contains("tomorrow") || text.contains("24 hours") {
        Some(TOMORROW_EVENT_HOURS)
    } else {
        None
    }
}

fn normalize_text(text: &str) -> String {
    text.to_lowercase()
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
