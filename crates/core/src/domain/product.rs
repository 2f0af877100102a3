use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::effect::ProductEffect;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCode(pub String);

impl ProductCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductCode {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ProductCode {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Product family. The letter is also the first character of every code in the series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProductSeries {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
}

impl ProductSeries {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::G => "G",
            Self::H => "H",
            Self::I => "I",
            Self::J => "J",
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::A => "whitening gels",
            Self::B => "resin infiltrants",
            Self::C => "daily polish",
            Self::D => "mineral trays",
            Self::E => "overlay films",
            Self::F => "event boosters",
            Self::G => "tone tuners",
            Self::H => "opal tuners",
            Self::I => "protective coatings",
            Self::J => "cosmetic veneer films",
        }
    }
}

impl fmt::Display for ProductSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub code: ProductCode,
    pub name: String,
    pub series: ProductSeries,
    pub description: String,
    #[serde(default)]
    pub effect: ProductEffect,
    #[serde(default = "default_age_min")]
    pub age_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_max: Option<u32>,
    #[serde(default = "default_intensity_level")]
    pub intensity_level: u8,
}

fn default_age_min() -> u32 {
    13
}

fn default_intensity_level() -> u8 {
    1
}

impl Product {
    pub fn is_allowed_for_age(&self, age_years: u32) -> bool {
        crate::engine::gate::is_allowed(self, age_years)
    }
}
