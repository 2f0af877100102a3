use crate::domain::age::AgeProfile;
use crate::domain::effect::ProductEffect;
use crate::domain::simulation::SimulationResult;
use crate::domain::stack::ProductStack;
use crate::engine::gate;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug)]
pub struct SimulationInput<'a> {
    pub stack: &'a ProductStack,
    pub age_profile: AgeProfile,
    pub age_years: u32,
    pub render_target_attached: bool,
}

/// Folds the stack's effects in order, re-checking the age gate for every
/// product. The first ineligible product aborts the run.
pub fn simulate(input: &SimulationInput<'_>) -> Result<SimulationResult, DomainError> {
    let mut aggregated = ProductEffect::identity();
    let mut notes = Vec::with_capacity(input.stack.len() + 2);

    for product in input.stack.products() {
        if !gate::is_allowed(product, input.age_years) {
            return Err(DomainError::AgeGate {
                code: product.code.clone(),
                age_years: input.age_years,
            });
        }

        aggregated = aggregated.merge(&product.effect);
        notes.push(format!("{}: {} → {}", product.code, product.name, product.effect.summary()));
    }

    if input.render_target_attached {
        notes.push("Render target attached: effects can be mapped to a 3D model.".to_string());
    } else {
        notes.push("No render target attached: visualization-only preview.".to_string());
    }
    notes.push(format!(
        "Age profile: {} (cosmetic guidance only, no diagnosis).",
        input.age_profile.group
    ));

    Ok(SimulationResult::new(input.stack.codes(), aggregated, notes))
}
