pub mod audit;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;

pub use audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink};
pub use config::{AppConfig, ConfigError, LoadOptions};
pub use domain::age::{AgeGroup, AgeProfile};
pub use domain::effect::{fold_effects, ProductEffect, ToneShift};
pub use domain::goal::{CosmeticGoal, CosmeticGoalType};
pub use domain::product::{Product, ProductCode, ProductSeries};
pub use domain::simulation::SimulationResult;
pub use domain::stack::ProductStack;
pub use engine::catalog::{build_default_catalog, Catalog};
pub use engine::handles::{NamedHandle, OpaqueHandle};
pub use engine::rules::{RecommendationEngine, RuleTableRecommender};
pub use engine::CosDenEngine;
pub use errors::{CatalogError, DomainError};
