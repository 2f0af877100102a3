use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::effect::ToneShift;

pub const DEFAULT_MAX_STEPS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosmeticGoalType {
    DailyMaintenance,
    EventMaximize,
    GentleStart,
    MineralSupport,
}

impl CosmeticGoalType {
    pub const ALL: [Self; 4] =
        [Self::DailyMaintenance, Self::EventMaximize, Self::GentleStart, Self::MineralSupport];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyMaintenance => "daily_maintenance",
            Self::EventMaximize => "event_maximize",
            Self::GentleStart => "gentle_start",
            Self::MineralSupport => "mineral_support",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "daily_maintenance" => Some(Self::DailyMaintenance),
            "event_maximize" => Some(Self::EventMaximize),
            "gentle_start" => Some(Self::GentleStart),
            "mineral_support" => Some(Self::MineralSupport),
            _ => None,
        }
    }
}

impl fmt::Display for CosmeticGoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level cosmetic intent for one request.
///
/// `max_steps` caps the recommended stack length. A cap of zero is accepted;
/// the rule engine's single-product fallback may still return one code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticGoal {
    pub goal_type: CosmeticGoalType,
    pub tone_preference: Option<ToneShift>,
    pub max_steps: usize,
    pub target_event_hours: Option<u32>,
}

impl CosmeticGoal {
    pub fn new(goal_type: CosmeticGoalType) -> Self {
        Self { goal_type, tone_preference: None, max_steps: DEFAULT_MAX_STEPS, target_event_hours: None }
    }

    pub fn with_tone(mut self, tone: ToneShift) -> Self {
        self.tone_preference = Some(tone);
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_event_hours(mut self, hours: u32) -> Self {
        self.target_event_hours = Some(hours);
        self
    }
}
