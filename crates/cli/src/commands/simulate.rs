use cosden_core::config::LoadOptions;
use cosden_core::domain::age::AgeProfile;

use crate::commands::{load_config, load_engine, CommandResult};

#[derive(Clone, Debug)]
pub struct SimulateArgs {
    pub age: u32,
    pub codes: Vec<String>,
}

pub fn run(options: &LoadOptions, args: &SimulateArgs) -> CommandResult {
    let config = match load_config("simulate", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let codes = args
        .codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();

    let engine = match load_engine("simulate", &config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let result = engine
        .build_stack(codes)
        .and_then(|stack| engine.simulate_stack(&stack, AgeProfile::from_age(args.age), args.age));

    match result {
        Ok(simulation) => CommandResult::success_with_data(
            "simulate",
            simulation.describe(),
            simulation.to_json_value().ok(),
        ),
        Err(error) => CommandResult::domain_failure("simulate", &error),
    }
}
