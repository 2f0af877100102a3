use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::effect::ProductEffect;
use crate::domain::product::ProductCode;

pub const COSMETIC_DISCLAIMER: &str =
    "(This is a cosmetic-only simulation, not a diagnosis or treatment.)";

/// Aggregated, explainable outcome of simulating one stack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    stack_codes: Vec<ProductCode>,
    aggregated_effect: ProductEffect,
    notes: Vec<String>,
    #[serde(deserialize_with = "cosmetic_only_flag")]
    cosmetic_only: bool,
}

impl SimulationResult {
    pub(crate) fn new(
        stack_codes: Vec<ProductCode>,
        aggregated_effect: ProductEffect,
        notes: Vec<String>,
    ) -> Self {
        Self { stack_codes, aggregated_effect, notes, cosmetic_only: true }
    }

    pub fn stack_codes(&self) -> &[ProductCode] {
        &self.stack_codes
    }

    pub fn aggregated_effect(&self) -> &ProductEffect {
        &self.aggregated_effect
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn cosmetic_only(&self) -> bool {
        self.cosmetic_only
    }

    pub fn describe(&self) -> String {
        let effect = &self.aggregated_effect;
        let codes = self.stack_codes.iter().map(ProductCode::as_str).collect::<Vec<_>>();
        let tone = effect.tone_shift.map(|tone| tone.as_str()).unwrap_or("no tone shift");
        let notes = if self.notes.is_empty() {
            "No additional notes.".to_string()
        } else {
            self.notes.join("\n  - ")
        };

        format!(
            "Stack: {}\n- Brightness delta: {:+.2}\n- Gloss delta: {:+.2}\n- Opalescence delta: {:+.2}\n- Tone shift: {}\nNotes:\n  - {}\n{}",
            codes.join(", "),
            effect.brightness_delta,
            effect.gloss_delta,
            effect.opalescence_delta,
            tone,
            notes,
            COSMETIC_DISCLAIMER,
        )
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn cosmetic_only_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    if bool::deserialize(deserializer)? {
        Ok(true)
    } else {
        Err(D::Error::custom("simulation results are always cosmetic-only"))
    }
}
