//! Planner Agent - natural-language cosmetic planning on top of the CosDen engine
//!
//! This crate turns a free-text request plus a light user profile into a
//! structured, cosmetic-only plan:
//! - Interprets the request into a `CosmeticGoal` with a deterministic keyword classifier
//! - Screens the request for medical or diagnostic language
//! - Asks the core engine for a recommended stack and simulates it
//! - Optionally asks an LLM for a short plain-language summary
//!
//! # Architecture
//!
//! The agent follows a constrained loop:
//! 1. **Interpretation** (`interpreter`) - request text + profile → `CosmeticGoal`
//! 2. **Guardrail** (`guardrails`) - degrade medical requests to a cosmetic-only answer
//! 3. **Recommend + Simulate** (`cosden_core::engine`) - deterministic rule table and effect fold
//! 4. **Plan Assembly** (`planner`) - JSON-ready `CosmeticPlan`, audit events, optional summary
//!
//! # Key Types
//!
//! - `CosmeticPlannerAgent` - Main orchestrator (see `planner` module)
//! - `LlmClient` - Narrow completion capability, never required
//! - `HttpLlmClient` - OpenAI/Anthropic/Ollama adapter built from `LlmConfig`
//! - `CosmeticGuardrail` - Medical-language screen
//!
//! # Safety Principle
//!
//! The LLM is strictly a narrator. It NEVER picks products, effects, or age
//! eligibility. Those are deterministic decisions made by the core engine.

pub mod guardrails;
pub mod interpreter;
pub mod llm;
pub mod planner;
pub mod profile;
pub mod providers;

pub use guardrails::{CosmeticGuardrail, GuardrailDecision};
pub use interpreter::GoalInterpreter;
pub use llm::LlmClient;
pub use planner::{CosmeticPlan, CosmeticPlannerAgent};
pub use profile::CosmeticUserProfile;
pub use providers::HttpLlmClient;
