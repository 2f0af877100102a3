use std::fmt;

use serde::{Deserialize, Serialize};

const TEEN_MIN_AGE: u32 = 13;
const ADULT_MIN_AGE: u32 = 18;
const SENIOR_MIN_AGE: u32 = 65;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Kids,
    Teens,
    Adults,
    Seniors,
}

impl AgeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kids => "kids",
            Self::Teens => "teens",
            Self::Adults => "adults",
            Self::Seniors => "seniors",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kids" => Some(Self::Kids),
            "teens" => Some(Self::Teens),
            "adults" => Some(Self::Adults),
            "seniors" => Some(Self::Seniors),
            _ => None,
        }
    }

    /// Groups allowed the full-intensity event stack.
    pub fn is_grown(&self) -> bool {
        matches!(self, Self::Adults | Self::Seniors)
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse age bucket derived from a numeric age.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeProfile {
    pub group: AgeGroup,
}

impl AgeProfile {
    pub fn new(group: AgeGroup) -> Self {
        Self { group }
    }

    pub fn from_age(age_years: u32) -> Self {
        let group = if age_years < TEEN_MIN_AGE {
            AgeGroup::Kids
        } else if age_years < ADULT_MIN_AGE {
            AgeGroup::Teens
        } else if age_years < SENIOR_MIN_AGE {
            AgeGroup::Adults
        } else {
            AgeGroup::Seniors
        };
        Self { group }
    }
}
