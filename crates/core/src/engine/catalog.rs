use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::effect::{ProductEffect, ToneShift};
use crate::domain::product::{Product, ProductCode, ProductSeries};
use crate::engine::gate;
use crate::errors::CatalogError;

/// Read-only mapping from product code to product, built once per load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: BTreeMap<ProductCode, Arc<Product>>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut indexed = BTreeMap::new();
        for product in products {
            validate_product(&product)?;
            let code = product.code.clone();
            if indexed.insert(code.clone(), Arc::new(product)).is_some() {
                return Err(CatalogError::DuplicateCode { code });
            }
        }
        Ok(Self { products: indexed })
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let file = toml::from_str::<CatalogFile>(raw)?;
        Self::new(file.products)
    }

    pub fn load_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| CatalogError::ReadFile { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&raw)
    }

    pub fn find(&self, code: &ProductCode) -> Option<&Arc<Product>> {
        self.products.get(code)
    }

    pub fn products(&self) -> impl Iterator<Item = &Arc<Product>> {
        self.products.values()
    }

    /// Products that pass the age gate for `age_years`, keyed by code.
    pub fn allowed_for_age(&self, age_years: u32) -> BTreeMap<&ProductCode, &Arc<Product>> {
        self.products
            .iter()
            .filter(|(_, product)| gate::is_allowed(product, age_years))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<Product>,
}

fn validate_product(product: &Product) -> Result<(), CatalogError> {
    if product.code.as_str().trim().is_empty() {
        return Err(CatalogError::EmptyCode);
    }
    if !(1..=3).contains(&product.intensity_level) {
        return Err(CatalogError::IntensityOutOfRange {
            code: product.code.clone(),
            level: product.intensity_level,
        });
    }
    if let Some(age_max) = product.age_max {
        if age_max < product.age_min {
            return Err(CatalogError::InvertedAgeRange {
                code: product.code.clone(),
                age_min: product.age_min,
                age_max,
            });
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn product(
    code: &str,
    name: &str,
    series: ProductSeries,
    description: &str,
    effect: ProductEffect,
    age_min: u32,
    age_max: Option<u32>,
    intensity_level: u8,
) -> Product {
    Product {
        code: ProductCode::new(code),
        name: name.to_string(),
        series,
        description: description.to_string(),
        effect,
        age_min,
        age_max,
        intensity_level,
    }
}

/// Built-in A–J catalog used when no catalog file is configured.
pub fn default_products() -> Vec<Product> {
    use ProductSeries::*;
    use ToneShift::*;

    vec![
        product(
            "A1",
            "BrightStart",
            A,
            "Low-concentration whitening gel for a first, gentle brightening cycle.",
            ProductEffect::new(0.8, 0.1, 0.0, Some(Neutral)),
            16,
            None,
            1,
        ),
        product(
            "A2",
            "BrightCore Max",
            A,
            "High-intensity whitening gel for adults preparing for an event.",
            ProductEffect::new(1.5, 0.2, 0.0, Some(Cool)),
            18,
            None,
            3,
        ),
        product(
            "B1",
            "ClearBlend",
            B,
            "Resin infiltrant that evens out the look of chalky surface spots.",
            ProductEffect::new(0.3, 0.1, 0.2, None),
            18,
            None,
            2,
        ),
        product(
            "C1",
            "DailyPolish",
            C,
            "Everyday polishing paste that lifts surface gloss.",
            ProductEffect::new(0.2, 0.4, 0.0, None),
            5,
            None,
            1,
        ),
        product(
            "C2",
            "GlossPolish Plus",
            C,
            "Fine-grit polish with a stronger gloss finish.",
            ProductEffect::new(0.3, 0.7, 0.0, None),
            12,
            None,
            2,
        ),
        product(
            "D1",
            "MineralTray Comfort",
            D,
            "Overnight mineral tray for a smooth, comfortable surface feel.",
            ProductEffect::new(0.1, 0.1, 0.1, None),
            6,
            None,
            1,
        ),
        product(
            "E1",
            "PearlFilm Overlay",
            E,
            "Peel-off overlay film adding pearl depth and shine.",
            ProductEffect::new(0.4, 0.5, 0.3, Some(Neutral)),
            8,
            None,
            1,
        ),
        product(
            "E2",
            "SparkleFilm Junior",
            E,
            "Playful overlay film sized for younger smiles.",
            ProductEffect::new(0.2, 0.3, 0.1, None),
            6,
            Some(12),
            1,
        ),
        product(
            "F1",
            "EventBoost Cool",
            F,
            "Same-day booster with a crisp, cool-white finish.",
            ProductEffect::new(0.6, 0.3, 0.0, Some(Cool)),
            16,
            None,
            2,
        ),
        product(
            "G1",
            "ToneTune Warm",
            G,
            "Tone tuner that shifts the perceived shade toward warm ivory.",
            ProductEffect::new(0.0, 0.1, 0.0, Some(Warm)),
            16,
            None,
            1,
        ),
        product(
            "H1",
            "OpalTune",
            H,
            "Opal tuner deepening the translucent edge effect.",
            ProductEffect::new(0.0, 0.1, 0.4, None),
            16,
            None,
            1,
        ),
        product(
            "I1",
            "ShieldCoat",
            I,
            "Clear protective coating that keeps the polished look longer.",
            ProductEffect::new(0.0, 0.2, 0.0, None),
            5,
            None,
            1,
        ),
        product(
            "J1",
            "VeneerFilm Studio",
            J,
            "Removable cosmetic veneer film for camera-ready events.",
            ProductEffect::new(1.0, 0.6, 0.2, Some(Neutral)),
            18,
            None,
            3,
        ),
    ]
}

pub fn build_default_catalog() -> Catalog {
    let products = default_products()
        .into_iter()
        .map(|product| (product.code.clone(), Arc::new(product)))
        .collect();
    Catalog { products }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{build_default_catalog, default_products, Catalog};
    use crate::domain::effect::ToneShift;
    use crate::domain::product::{ProductCode, ProductSeries};
    use crate::errors::CatalogError;

    #[test]
    fn default_catalog_is_valid_and_covers_every_series() {
        let validated = Catalog::new(default_products()).expect("default catalog must validate");
        assert_eq!(validated, build_default_catalog());

        let series = validated.products().map(|product| product.series).collect::<BTreeSet<_>>();
        assert_eq!(series.len(), 10);
        assert_eq!(series.first(), Some(&ProductSeries::A));
        assert_eq!(series.last(), Some(&ProductSeries::J));
    }

    #[test]
    fn default_catalog_keeps_whitening_away_from_children() {
        let catalog = build_default_catalog();
        let allowed = catalog.allowed_for_age(10);

        assert!(allowed.keys().all(|code| !code.as_str().starts_with('A')));
        assert!(allowed.contains_key(&ProductCode::new("C1")));
        assert!(allowed.contains_key(&ProductCode::new("E1")));
        assert!(!allowed.contains_key(&ProductCode::new("C2")));
    }

    #[test]
    fn booster_f1_is_cool() {
        let catalog = build_default_catalog();
        let f1 = catalog.find(&ProductCode::new("F1")).expect("F1 present");
        assert_eq!(f1.effect.tone_shift, Some(ToneShift::Cool));
    }

    #[test]
    fn new_rejects_duplicate_codes() {
        let mut products = default_products();
        products.push(products[0].clone());

        let error = Catalog::new(products).expect_err("duplicate must be rejected");
        assert!(matches!(error, CatalogError::DuplicateCode { ref code } if code.as_str() == "A1"));
    }

    #[test]
    fn new_rejects_out_of_range_intensity_and_inverted_ages() {
        let mut intense = default_products();
        intense[0].intensity_level = 4;
        assert!(matches!(Catalog::new(intense), Err(CatalogError::IntensityOutOfRange { .. })));

        let mut inverted = default_products();
        inverted[0].age_max = Some(3);
        assert!(matches!(Catalog::new(inverted), Err(CatalogError::InvertedAgeRange { .. })));
    }

    #[test]
    fn toml_catalog_applies_field_defaults() {
        let catalog = Catalog::from_toml_str(
            r#"
[[products]]
code = "C9"
name = "TestPolish"
series = "C"
description = "polish used in tests"

[products.effect]
gloss_delta = 0.5
tone_shift = "warm"
"#,
        )
        .expect("catalog parses");

        let product = catalog.find(&ProductCode::new("C9")).expect("C9 present");
        assert_eq!(product.age_min, 13);
        assert_eq!(product.intensity_level, 1);
        assert_eq!(product.effect.brightness_delta, 0.0);
        assert_eq!(product.effect.tone_shift, Some(ToneShift::Warm));
    }

    #[test]
    fn load_file_reports_missing_path() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let error = Catalog::load_file(&dir.path().join("missing.toml")).expect_err("missing file");
        assert!(matches!(error, CatalogError::ReadFile { .. }));
    }
}
