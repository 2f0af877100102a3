use cosden_core::config::LoadOptions;
use cosden_core::domain::age::AgeProfile;
use cosden_core::domain::goal::{CosmeticGoal, CosmeticGoalType};
use cosden_core::domain::product::ProductCode;
use serde_json::json;

use crate::commands::{load_config, load_engine, parse_tone, CommandResult};

#[derive(Clone, Debug)]
pub struct RecommendArgs {
    pub age: u32,
    pub goal: String,
    pub tone: Option<String>,
    pub max_steps: Option<usize>,
    pub event_hours: Option<u32>,
}

pub fn run(options: &LoadOptions, args: &RecommendArgs) -> CommandResult {
    let config = match load_config("recommend", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let Some(goal_type) = CosmeticGoalType::parse(&args.goal) else {
        return CommandResult::invalid_argument(
            "recommend",
            format!(
                "unknown goal `{}` (expected daily_maintenance|event_maximize|gentle_start|mineral_support)",
                args.goal
            ),
        );
    };
    let tone = match parse_tone("recommend", args.tone.as_deref()) {
        Ok(tone) => tone,
        Err(failure) => return failure,
    };

    let goal = CosmeticGoal {
        goal_type,
        tone_preference: tone,
        max_steps: args.max_steps.unwrap_or(config.planner.default_max_steps),
        target_event_hours: args.event_hours,
    };

    let engine = match load_engine("recommend", &config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };
    let age_profile = AgeProfile::from_age(args.age);

    let stack = match engine.recommend_stack_for_goal(age_profile, args.age, &goal) {
        Ok(stack) => stack,
        Err(error) => return CommandResult::domain_failure("recommend", &error),
    };
    let codes = stack.codes();
    let rendered = codes.iter().map(ProductCode::as_str).collect::<Vec<_>>().join(", ");

    CommandResult::success_with_data(
        "recommend",
        if codes.is_empty() {
            "no eligible products for this age".to_string()
        } else {
            format!("recommended stack: {rendered}")
        },
        Some(json!({
            "age_years": args.age,
            "age_group": age_profile.group,
            "goal": goal,
            "codes": codes,
        })),
    )
}
