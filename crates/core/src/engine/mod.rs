pub mod catalog;
pub mod gate;
pub mod handles;
pub mod rules;
pub mod simulator;

use std::fmt;
use std::sync::Arc;

use crate::domain::age::AgeProfile;
use crate::domain::goal::CosmeticGoal;
use crate::domain::product::{Product, ProductCode};
use crate::domain::simulation::SimulationResult;
use crate::domain::stack::ProductStack;
use crate::errors::DomainError;

use self::{
    catalog::{build_default_catalog, Catalog},
    handles::{DeviceRegistry, OpaqueHandle},
    rules::{RecommendationEngine, RecommendationInput, RuleTableRecommender},
    simulator::SimulationInput,
};

/// Owns the active catalog and the optional external handles, and composes
/// the rule engine, stack builder and simulator.
///
/// Recommend and simulate take `&self`; replacing the catalog takes
/// `&mut self`, so callers sharing an engine across threads must serialize
/// reloads themselves (e.g. behind an `RwLock`).
pub struct CosDenEngine<R = RuleTableRecommender> {
    catalog: Catalog,
    devices: DeviceRegistry,
    render_target: Option<Arc<dyn OpaqueHandle>>,
    recommender: R,
}

impl CosDenEngine<RuleTableRecommender> {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_recommender(catalog, RuleTableRecommender)
    }

    pub fn with_default_catalog() -> Self {
        Self::new(build_default_catalog())
    }
}

impl Default for CosDenEngine<RuleTableRecommender> {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

impl<R> CosDenEngine<R> {
    pub fn with_recommender(catalog: Catalog, recommender: R) -> Self {
        Self { catalog, devices: DeviceRegistry::default(), render_target: None, recommender }
    }

    pub fn load_default_catalog(&mut self) {
        self.set_catalog(build_default_catalog());
    }

    pub fn set_catalog(&mut self, catalog: Catalog) {
        tracing::debug!(
            event_name = "engine.catalog.replaced",
            previous_size = self.catalog.len(),
            product_count = catalog.len(),
            "catalog replaced"
        );
        self.catalog = catalog;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_products(&self) -> Vec<Arc<Product>> {
        self.catalog.products().cloned().collect()
    }

    pub fn get_product(&self, code: &ProductCode) -> Result<Arc<Product>, DomainError> {
        self.catalog
            .find(code)
            .cloned()
            .ok_or_else(|| DomainError::UnknownProduct { code: code.clone() })
    }

    /// Resolves codes in order; the first unknown code aborts the build.
    pub fn build_stack<I>(&self, codes: I) -> Result<ProductStack, DomainError>
    where
        I: IntoIterator,
        I::Item: Into<ProductCode>,
    {
        let products = codes
            .into_iter()
            .map(|code| self.get_product(&code.into()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProductStack::new(products))
    }

    pub fn register_device(&mut self, name: impl Into<String>, device: Arc<dyn OpaqueHandle>) {
        self.devices.register(name, device);
    }

    pub fn device(&self, name: &str) -> Option<&Arc<dyn OpaqueHandle>> {
        self.devices.get(name)
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    pub fn attach_render_target(&mut self, target: Arc<dyn OpaqueHandle>) {
        self.render_target = Some(target);
    }

    pub fn detach_render_target(&mut self) -> Option<Arc<dyn OpaqueHandle>> {
        self.render_target.take()
    }

    pub fn render_target_attached(&self) -> bool {
        self.render_target.is_some()
    }

    pub fn simulate_stack(
        &self,
        stack: &ProductStack,
        age_profile: AgeProfile,
        age_years: u32,
    ) -> Result<SimulationResult, DomainError> {
        let outcome = simulator::simulate(&SimulationInput {
            stack,
            age_profile,
            age_years,
            render_target_attached: self.render_target_attached(),
        });

        match &outcome {
            Ok(result) => tracing::debug!(
                event_name = "engine.simulation.completed",
                age_group = %age_profile.group,
                stack_size = result.stack_codes().len(),
                brightness_delta = result.aggregated_effect().brightness_delta,
                "stack simulated"
            ),
            Err(error) => tracing::debug!(
                event_name = "engine.simulation.rejected",
                age_group = %age_profile.group,
                error_class = error.error_class(),
                error = %error,
                "stack simulation rejected"
            ),
        }

        outcome
    }
}

impl<R: RecommendationEngine> CosDenEngine<R> {
    pub fn recommend_stack_for_goal(
        &self,
        age_profile: AgeProfile,
        age_years: u32,
        goal: &CosmeticGoal,
    ) -> Result<ProductStack, DomainError> {
        let codes = self.recommender.recommend(&RecommendationInput {
            catalog: &self.catalog,
            age_profile,
            age_years,
            goal,
        });

        tracing::debug!(
            event_name = "engine.recommendation.computed",
            goal_type = %goal.goal_type,
            age_group = %age_profile.group,
            max_steps = goal.max_steps,
            codes = ?codes.iter().map(ProductCode::as_str).collect::<Vec<_>>(),
            "recommendation computed"
        );

        self.build_stack(codes)
    }
}

impl<R> fmt::Debug for CosDenEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosDenEngine")
            .field("catalog_size", &self.catalog.len())
            .field("devices", &self.devices)
            .field("render_target", &self.render_target.as_ref().map(|target| target.handle_id()))
            .finish()
    }
}
