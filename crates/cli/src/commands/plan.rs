use cosden_agent::planner::CosmeticPlannerAgent;
use cosden_agent::profile::CosmeticUserProfile;
use cosden_agent::providers::HttpLlmClient;
use cosden_core::config::LoadOptions;

use crate::commands::{
    load_config, load_engine, parse_tone, CommandResult, EXIT_CONFIG_VALIDATION,
};

#[derive(Clone, Debug)]
pub struct PlanArgs {
    pub age: u32,
    pub text: String,
    pub tone: Option<String>,
    pub sensitive: bool,
    pub event_hours: Option<u32>,
    pub notes: Option<String>,
}

pub fn run(options: &LoadOptions, args: &PlanArgs) -> CommandResult {
    let config = match load_config("plan", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    if args.text.trim().is_empty() {
        return CommandResult::invalid_argument("plan", "request text must not be empty");
    }

    let mut user = CosmeticUserProfile::from_age(args.age).with_sensitivity(args.sensitive);
    match parse_tone("plan", args.tone.as_deref()) {
        Ok(Some(tone)) => user = user.with_tone(tone),
        Ok(None) => {}
        Err(failure) => return failure,
    }
    if let Some(hours) = args.event_hours {
        user = user.with_event_hours(hours);
    }
    if let Some(notes) = &args.notes {
        user = user.with_notes(notes.clone());
    }

    let engine = match load_engine("plan", &config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };
    let mut agent = CosmeticPlannerAgent::new(engine).with_planner_config(config.planner.clone());

    match HttpLlmClient::from_config(&config.llm) {
        Ok(Some(client)) => {
            agent = agent.with_llm_client(Box::new(client), config.llm.max_output_tokens);
        }
        Ok(None) => {}
        Err(error) => {
            return CommandResult::failure(
                "plan",
                "config_validation",
                format!("llm client could not be initialised: {error:#}"),
                EXIT_CONFIG_VALIDATION,
            );
        }
    }

    match agent.plan_for_request(&user, &args.text) {
        Ok(plan) => {
            let message = plan
                .assistant_summary
                .clone()
                .unwrap_or_else(|| plan.simulation.describe());
            CommandResult::success_with_data("plan", message, plan.to_json_value().ok())
        }
        Err(error) => CommandResult::domain_failure("plan", &error),
    }
}
