use std::sync::Arc;

use crate::domain::product::{Product, ProductCode};

/// Ordered products applied together. Order decides which tone shift wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductStack {
    products: Vec<Arc<Product>>,
}

impl ProductStack {
    pub fn new(products: Vec<Arc<Product>>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn codes(&self) -> Vec<ProductCode> {
        self.products.iter().map(|product| product.code.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
