use crate::domain::product::Product;

/// Per-product age eligibility: inclusive `age_min`, optional inclusive `age_max`.
pub fn is_allowed(product: &Product, age_years: u32) -> bool {
    if age_years < product.age_min {
        return false;
    }
    if let Some(age_max) = product.age_max {
        if age_years > age_max {
            return false;
        }
    }
    true
}
