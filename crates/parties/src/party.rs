use serde::{Deserialize, Serialize};

use northwind_core::{DomainError, DomainResult, Entity, entity_id};

entity_id!(
    /// Customer identifier (`Customers.CustomerID`).
    CustomerId,
    "CustomerId"
);

entity_id!(
    /// Supplier identifier (`Suppliers.SupplierID`).
    SupplierId,
    "SupplierId"
);

fn require_company_name(name: String) -> DomainResult<String> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("company name cannot be empty"));
    }
    Ok(name)
}

/// Read model: Customer.
///
/// Orders reference their customer by id; the country is optional in the
/// source data and is reported as its own group when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    company_name: String,
    country: Option<String>,
}

impl Customer {
    pub fn new(id: CustomerId, company_name: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            id,
            company_name: require_company_name(company_name.into())?,
            country: None,
        })
    }

    /// Blank countries are normalized to `None`.
    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Read model: Supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    company_name: String,
    country: Option<String>,
}

impl Supplier {
    pub fn new(id: SupplierId, company_name: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            id,
            company_name: require_company_name(company_name.into())?,
            country: None,
        })
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_blank_country_is_unknown() {
        let customer = Customer::new(CustomerId(1), "Alfreds Futterkiste")
            .unwrap()
            .with_country(Some("  ".to_string()));
        assert_eq!(customer.country(), None);

        let customer = customer.with_country(Some("Germany".to_string()));
        assert_eq!(customer.country(), Some("Germany"));
    }

    #[test]
    fn customer_rejects_empty_company_name() {
        let err = Customer::new(CustomerId(1), "   ").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for empty company name"),
        }
    }

    #[test]
    fn supplier_exposes_identity_and_name() {
        let supplier = Supplier::new(SupplierId(7), "Pavlova, Ltd.")
            .unwrap()
            .with_country(Some("Australia".to_string()));

        assert_eq!(supplier.id(), SupplierId(7));
        assert_eq!(supplier.company_name(), "Pavlova, Ltd.");
        assert_eq!(supplier.country(), Some("Australia"));
    }
}
