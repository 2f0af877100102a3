use cosden_core::domain::age::AgeProfile;
use cosden_core::domain::effect::ToneShift;
use serde::Serialize;

/// Lightweight, non-medical profile used for planning.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CosmeticUserProfile {
    pub age_years: u32,
    pub age_profile: AgeProfile,
    pub tone_preference: Option<ToneShift>,
    /// Biases the planner toward shorter, gentler stacks.
    pub sensitivity_flag: bool,
    /// Hours until the moment the user wants to look best. `None` means general use.
    pub event_time_hours: Option<u32>,
    pub notes: Option<String>,
}

impl CosmeticUserProfile {
    pub fn from_age(age_years: u32) -> Self {
        Self {
            age_years,
            age_profile: AgeProfile::from_age(age_years),
            tone_preference: None,
            sensitivity_flag: false,
            event_time_hours: None,
            notes: None,
        }
    }

    pub fn with_tone(mut self, tone: ToneShift) -> Self {
        self.tone_preference = Some(tone);
        self
    }

    pub fn with_sensitivity(mut self, sensitive: bool) -> Self {
        self.sensitivity_flag = sensitive;
        self
    }

    pub fn with_event_hours(mut self, hours: u32) -> Self {
        self.event_time_hours = Some(hours);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
