const MEDICAL_TERMS: &[&str] =
    &["pain", "cavity", "bleeding", "infection", "diagnose", "treat", "cure", "swollen", "abscess"];

/// Inflections accepted after a medical term.
const TERM_SUFFIXES: &[&str] = &["", "s", "d", "es", "ed", "ing", "ment", "ments", "ful"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardrailDecision {
    Allow,
    Degrade {
        reason_code: &'static str,
        user_message: String,
        fallback_path: &'static str,
        matched_terms: Vec<String>,
    },
}

impl GuardrailDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Degrade { user_message, .. } => Some(user_message),
        }
    }
}

/// Screens request text for medical or diagnostic language.
///
/// Such requests are never answered medically; the planner still returns a
/// cosmetic-only plan and attaches the degrade notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosmeticGuardrail {
    medical_terms: Vec<String>,
}

impl Default for CosmeticGuardrail {
    fn default() -> Self {
        Self { medical_terms: MEDICAL_TERMS.iter().map(|term| term.to_string()).collect() }
    }
}

impl CosmeticGuardrail {
    pub fn with_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            medical_terms: terms.into_iter().map(|term| term.into().to_ascii_lowercase()).collect(),
        }
    }

    pub fn evaluate(&self, request_text: &str) -> GuardrailDecision {
        let tokens = tokenize(&request_text.to_ascii_lowercase());
        let matched_terms = self
            .medical_terms
            .iter()
            .filter(|term| tokens.iter().any(|token| token_matches(token, term)))
            .cloned()
            .collect::<Vec<_>>();

        if matched_terms.is_empty() {
            return GuardrailDecision::Allow;
        }

        GuardrailDecision::Degrade {
            reason_code: "medical_language_detected",
            user_message: format!(
                "I can only help with cosmetic appearance. Mentions of {} need a licensed dental professional; here is a cosmetic-only plan instead.",
                matched_terms.join(", ")
            ),
            fallback_path: "cosmetic_only_plan",
            matched_terms,
        }
    }
}

fn token_matches(token: &str, term: &str) -> bool {
    if term == "cavity" && token == "cavities" {
        return true;
    }
    token
        .strip_prefix(term)
        .map(|rest| TERM_SUFFIXES.contains(&rest))
        .unwrap_or(false)
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}
