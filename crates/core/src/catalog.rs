use crate::domain::product::{Product, ProductId};
use crate::errors::DomainError;

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products in menu order. Names must be non-empty
    /// and unique (case-insensitive); mention lookup relies on both.
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        for (index, product) in products.iter().enumerate() {
            if product.name.trim().is_empty() {
                return Err(DomainError::InvariantViolation(format!(
                    "catalog product `{}` has an empty name",
                    product.id
                )));
            }
            if product.unit_price.is_sign_negative() {
                return Err(DomainError::InvariantViolation(format!(
                    "catalog product `{}` has a negative unit price",
                    product.id
                )));
            }
            let duplicate = products[..index].iter().any(|earlier| {
                earlier.id == product.id || earlier.name.eq_ignore_ascii_case(&product.name)
            });
            if duplicate {
                return Err(DomainError::InvariantViolation(format!(
                    "catalog product `{}` duplicates an earlier entry",
                    product.id
                )));
            }
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    /// First product (in catalog order) whose name appears as a
    /// case-insensitive substring of the text. First match wins.
    pub fn find_by_mention(&self, text: &str) -> Option<&Product> {
        let haystack = text.to_lowercase();
        self.products.iter().find(|product| haystack.contains(&product.name.to_lowercase()))
    }

    /// Decrement one product's stock. The guard keeps stock from ever going
    /// negative; a violation past the guard is a contract bug.
    pub fn deduct(&mut self, product_id: &ProductId, quantity: u32) -> Result<u32, DomainError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| &product.id == product_id)
            .ok_or_else(|| DomainError::UnknownProduct(product_id.clone()))?;

        if quantity > product.stock {
            return Err(DomainError::InsufficientStock {
                product_id: product.id.clone(),
                requested: quantity,
                available: product.stock,
            });
        }

        debug_assert!(product.stock >= quantity);
        product.stock = product.stock.saturating_sub(quantity);
        Ok(product.stock)
    }
}
