use std::path::PathBuf;

use thiserror::Error;

use crate::domain::product::ProductCode;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown product code: {code}")]
    UnknownProduct { code: ProductCode },
    #[error("product {code} is not allowed for age {age_years}")]
    AgeGate { code: ProductCode, age_years: u32 },
}

impl DomainError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::UnknownProduct { .. } => "unknown_product",
            Self::AgeGate { .. } => "age_gate",
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate product code in catalog: {code}")]
    DuplicateCode { code: ProductCode },
    #[error("product {code} has intensity level {level}; expected 1..=3")]
    IntensityOutOfRange { code: ProductCode, level: u8 },
    #[error("product {code} has age_max {age_max} below age_min {age_min}")]
    InvertedAgeRange { code: ProductCode, age_min: u32, age_max: u32 },
    #[error("product code cannot be empty")]
    EmptyCode,
    #[error("could not read catalog file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}
