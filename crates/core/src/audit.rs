use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::ProductCode;
use crate::errors::DomainError;

/// Pipeline stage that produced an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditCategory {
    Guardrail,
    Recommendation,
    Simulation,
}

impl AuditCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guardrail => "guardrail",
            Self::Recommendation => "recommendation",
            Self::Simulation => "simulation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOutcome {
    Success,
    Rejected,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub event_id: String,
    pub correlation_id: String,
    pub event_type: String,
    pub category: AuditCategory,
    pub actor: String,
    pub outcome: AuditOutcome,
    pub metadata: BTreeMap<String, String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn new(
        correlation_id: impl Into<String>,
        event_type: impl Into<String>,
        category: AuditCategory,
        actor: impl Into<String>,
        outcome: AuditOutcome,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            correlation_id: correlation_id.into(),
            event_type: event_type.into(),
            category,
            actor: actor.into(),
            outcome,
            metadata: BTreeMap::new(),
            occurred_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Records an ordered stack as `codes`, comma-joined.
    pub fn with_stack_codes(self, codes: &[ProductCode]) -> Self {
        let joined = codes.iter().map(ProductCode::as_str).collect::<Vec<_>>().join(",");
        self.with_metadata("codes", joined)
    }

    /// Records `error_class` and the rendered message of a rejected stack.
    pub fn with_domain_error(self, error: &DomainError) -> Self {
        self.with_metadata("error_class", error.error_class()).with_metadata("error", error.to_string())
    }
}

pub trait AuditSink: Send + Sync {
    fn emit(&self, event: AuditEvent);
}

#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AuditSink for InMemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
