use cosden_core::config::LoadOptions;
use serde::Serialize;

use crate::commands::{load_config, load_engine, to_data, CommandResult};

#[derive(Debug, Serialize)]
struct CatalogEntry {
    code: String,
    name: String,
    series: &'static str,
    category: &'static str,
    age_min: u32,
    age_max: Option<u32>,
    intensity_level: u8,
    description: String,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("catalog", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let engine = match load_engine("catalog", &config) {
        Ok(engine) => engine,
        Err(failure) => return failure,
    };

    let entries = engine
        .list_products()
        .iter()
        .map(|product| CatalogEntry {
            code: product.code.to_string(),
            name: product.name.clone(),
            series: product.series.as_str(),
            category: product.series.category(),
            age_min: product.age_min,
            age_max: product.age_max,
            intensity_level: product.intensity_level,
            description: product.description.clone(),
        })
        .collect::<Vec<_>>();

    CommandResult::success_with_data(
        "catalog",
        format!("{} products in catalog", entries.len()),
        to_data(&entries),
    )
}
