use serde::{Deserialize, Serialize};

use northwind_core::{DomainError, DomainResult, Entity, Money, entity_id};
use northwind_parties::SupplierId;

use crate::category::CategoryId;

entity_id!(
    /// Product identifier (`Products.ProductID`).
    ProductId,
    "ProductId"
);

/// Read model: Product.
///
/// Every product belongs to exactly one category and one supplier; both
/// references are required. The unit price is optional in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category_id: CategoryId,
    supplier_id: SupplierId,
    unit_price: Option<Money>,
    discontinued: bool,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category_id: CategoryId,
        supplier_id: SupplierId,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }

        Ok(Self {
            id,
            name,
            category_id,
            supplier_id,
            unit_price: None,
            discontinued: false,
        })
    }

    pub fn with_unit_price(mut self, unit_price: Option<Money>) -> Self {
        self.unit_price = unit_price;
        self
    }

    pub fn with_discontinued(mut self, discontinued: bool) -> Self {
        self.discontinued = discontinued;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn unit_price(&self) -> Option<Money> {
        self.unit_price
    }

    pub fn is_discontinued(&self) -> bool {
        self.discontinued
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
