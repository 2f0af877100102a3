use std::sync::Arc;

use cosden_core::audit::{AuditCategory, AuditEvent, AuditOutcome, AuditSink};
use cosden_core::config::PlannerConfig;
use cosden_core::domain::effect::ToneShift;
use cosden_core::domain::goal::CosmeticGoal;
use cosden_core::domain::product::ProductCode;
use cosden_core::domain::simulation::SimulationResult;
use cosden_core::domain::stack::ProductStack;
use cosden_core::engine::rules::{RecommendationEngine, RuleTableRecommender};
use cosden_core::engine::CosDenEngine;
use cosden_core::errors::DomainError;
use serde::Serialize;
use uuid::Uuid;

use crate::guardrails::{CosmeticGuardrail, GuardrailDecision};
use crate::interpreter::GoalInterpreter;
use crate::llm::LlmClient;
use crate::profile::CosmeticUserProfile;

pub const PLAN_VERSION: &str = "1.0";
pub const LEGAL_DISCLAIMER: &str = "This plan is cosmetic-only. It does not diagnose, treat, or prevent any disease or condition. For medical or dental questions, consult a licensed professional.";

const ACTOR: &str = "cosden-planner";
const DEFAULT_SUMMARY_TOKENS: usize = 256;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanUser {
    pub age_years: u32,
    pub age_group: String,
    pub tone_preference: Option<ToneShift>,
    pub sensitivity_flag: bool,
    pub event_time_hours: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanProduct {
    pub code: ProductCode,
    pub name: String,
    pub series: String,
    pub intensity_level: u8,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendedStack {
    pub codes: Vec<ProductCode>,
    pub products: Vec<PlanProduct>,
}

impl From<&ProductStack> for RecommendedStack {
    fn from(stack: &ProductStack) -> Self {
        Self {
            codes: stack.codes(),
            products: stack
                .products()
                .iter()
                .map(|product| PlanProduct {
                    code: product.code.clone(),
                    name: product.name.clone(),
                    series: product.series.as_str().to_string(),
                    intensity_level: product.intensity_level,
                    description: product.description.clone(),
                })
                .collect(),
        }
    }
}

/// Structured, cosmetic-only answer to one planning request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CosmeticPlan {
    pub version: String,
    pub cosmetic_only: bool,
    pub raw_request: String,
    pub user: PlanUser,
    pub interpreted_goal: CosmeticGoal,
    pub recommended_stack: RecommendedStack,
    pub simulation: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardrail_notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_summary: Option<String>,
    pub legal_disclaimer: String,
    #[serde(skip)]
    correlation_id: String,
}

impl CosmeticPlan {
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Interprets a request, asks the engine for a stack, simulates it and
/// packages the outcome. Works fully without an LLM client.
pub struct CosmeticPlannerAgent<R = RuleTableRecommender> {
    engine: CosDenEngine<R>,
    interpreter: GoalInterpreter,
    guardrail: CosmeticGuardrail,
    llm_client: Option<Box<dyn LlmClient>>,
    summary_max_tokens: usize,
    audit_sink: Option<Arc<dyn AuditSink>>,
}

impl<R: RecommendationEngine> CosmeticPlannerAgent<R> {
    pub fn new(engine: CosDenEngine<R>) -> Self {
        Self {
            engine,
            interpreter: GoalInterpreter::default(),
            guardrail: CosmeticGuardrail::default(),
            llm_client: None,
            summary_max_tokens: DEFAULT_SUMMARY_TOKENS,
            audit_sink: None,
        }
    }

    pub fn with_planner_config(mut self, planner: PlannerConfig) -> Self {
        self.interpreter = GoalInterpreter::new(planner);
        self
    }

    pub fn with_guardrail(mut self, guardrail: CosmeticGuardrail) -> Self {
        self.guardrail = guardrail;
        self
    }

    pub fn with_llm_client(mut self, client: Box<dyn LlmClient>, max_tokens: usize) -> Self {
        self.llm_client = Some(client);
        self.summary_max_tokens = max_tokens;
        self
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit_sink = Some(sink);
        self
    }

    pub fn engine(&self) -> &CosDenEngine<R> {
        &self.engine
    }

    pub fn plan_for_request(
        &self,
        user: &CosmeticUserProfile,
        request_text: &str,
    ) -> Result<CosmeticPlan, DomainError> {
        let correlation_id = Uuid::new_v4().to_string();
        let goal = self.interpreter.interpret(user, request_text);

        let guardrail_notice = match self.guardrail.evaluate(request_text) {
            GuardrailDecision::Allow => None,
            GuardrailDecision::Degrade { reason_code, user_message, fallback_path, matched_terms } => {
                tracing::info!(
                    event_name = "planner.guardrail.degraded",
                    correlation_id = %correlation_id,
                    reason_code,
                    fallback_path,
                    "request degraded to cosmetic-only plan"
                );
                self.emit(
                    AuditEvent::new(
                        &correlation_id,
                        "planner.guardrail.degraded",
                        AuditCategory::Guardrail,
                        ACTOR,
                        AuditOutcome::Rejected,
                    )
                    .with_metadata("reason_code", reason_code)
                    .with_metadata("matched_terms", matched_terms.join(",")),
                );
                Some(user_message)
            }
        };

        let stack = self
            .engine
            .recommend_stack_for_goal(user.age_profile, user.age_years, &goal)
            .map_err(|error| {
                self.fail(
                    &correlation_id,
                    "planner.recommendation.failed",
                    AuditCategory::Recommendation,
                    error,
                )
            })?;
        self.emit(
            AuditEvent::new(
                &correlation_id,
                "planner.recommendation.computed",
                AuditCategory::Recommendation,
                ACTOR,
                AuditOutcome::Success,
            )
            .with_metadata("goal_type", goal.goal_type.as_str())
            .with_metadata("age_group", user.age_profile.group.as_str())
            .with_stack_codes(&stack.codes()),
        );

        let simulation = self
            .engine
            .simulate_stack(&stack, user.age_profile, user.age_years)
            .map_err(|error| {
                self.fail(
                    &correlation_id,
                    "planner.simulation.rejected",
                    AuditCategory::Simulation,
                    error,
                )
            })?;
        self.emit(
            AuditEvent::new(
                &correlation_id,
                "planner.simulation.completed",
                AuditCategory::Simulation,
                ACTOR,
                AuditOutcome::Success,
            )
            .with_metadata("summary", simulation.aggregated_effect().summary()),
        );

        let assistant_summary = self.summarize(&correlation_id, request_text, &goal, &simulation);

        tracing::info!(
            event_name = "planner.plan.completed",
            correlation_id = %correlation_id,
            goal_type = %goal.goal_type,
            age_group = %user.age_profile.group,
            codes = %join_codes(simulation.stack_codes()),
            guardrail_degraded = guardrail_notice.is_some(),
            "cosmetic plan assembled"
        );

        Ok(CosmeticPlan {
            version: PLAN_VERSION.to_string(),
            cosmetic_only: true,
            raw_request: request_text.to_string(),
            user: PlanUser {
                age_years: user.age_years,
                age_group: user.age_profile.group.as_str().to_string(),
                tone_preference: user.tone_preference,
                sensitivity_flag: user.sensitivity_flag,
                event_time_hours: user.event_time_hours,
                notes: user.notes.clone(),
            },
            interpreted_goal: goal,
            recommended_stack: RecommendedStack::from(&stack),
            simulation,
            guardrail_notice,
            assistant_summary,
            legal_disclaimer: LEGAL_DISCLAIMER.to_string(),
            correlation_id,
        })
    }

    fn summarize(
        &self,
        correlation_id: &str,
        request_text: &str,
        goal: &CosmeticGoal,
        simulation: &SimulationResult,
    ) -> Option<String> {
        let client = self.llm_client.as_ref()?;
        let prompt = format!(
            "Summarize this cosmetic-only plan for the user in two friendly sentences. \
             Do not give medical or dental advice.\n\
             Request: {request_text}\n\
             Goal: {}\n\
             {}",
            goal.goal_type,
            simulation.describe()
        );

        match client.complete(&prompt, self.summary_max_tokens) {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(
                    event_name = "planner.llm.fallback",
                    correlation_id = %correlation_id,
                    error = %error,
                    "llm summary unavailable; returning rule-based plan"
                );
                None
            }
        }
    }

    fn fail(
        &self,
        correlation_id: &str,
        event_type: &str,
        category: AuditCategory,
        error: DomainError,
    ) -> DomainError {
        tracing::info!(
            event_name = event_type,
            correlation_id = %correlation_id,
            error_class = error.error_class(),
            error = %error,
            "planning aborted"
        );
        self.emit(
            AuditEvent::new(correlation_id, event_type, category, ACTOR, AuditOutcome::Failed)
                .with_domain_error(&error),
        );
        error
    }

    fn emit(&self, event: AuditEvent) {
        if let Some(sink) = &self.audit_sink {
            sink.emit(event);
        }
    }
}

fn join_codes(codes: &[ProductCode]) -> String {
    codes.iter().map(ProductCode::as_str).collect::<Vec<_>>().join(",")
}
