use std::sync::Arc;

use async_trait::async_trait;

use northwind_core::Entity;
use northwind_parties::{Customer, Employee, Supplier};
use northwind_products::{Category, Product};
use northwind_sales::Order;

use super::store::{DataStore, StoreSession};
use crate::error::{StoreError, StoreResult};

/// Arena of read models, one vector per table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub employees: Vec<Employee>,
    pub orders: Vec<Order>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_supplier(mut self, supplier: Supplier) -> Self {
        self.suppliers.push(supplier);
        self
    }

    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customers.push(customer);
        self
    }

    pub fn with_employee(mut self, employee: Employee) -> Self {
        self.employees.push(employee);
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }
}

fn sorted_by_id<T>(items: &[T]) -> Vec<T>
where
    T: Entity + Clone,
{
    let mut out = items.to_vec();
    out.sort_by_key(|item| item.id());
    out
}

/// In-memory store for tests/dev.
///
/// Sessions share an immutable snapshot of the dataset. A store built with
/// [`InMemoryStore::unavailable`] refuses every session, which is how tests
/// exercise store-failure propagation.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    data: Option<Arc<Dataset>>,
}

impl InMemoryStore {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            data: Some(Arc::new(dataset)),
        }
    }

    pub fn unavailable() -> Self {
        Self { data: None }
    }
}

#[async_trait]
impl DataStore for InMemoryStore {
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>> {
        let data = self
            .data
            .clone()
            .ok_or_else(|| StoreError::unavailable("in-memory store is offline"))?;
        Ok(Box::new(InMemorySession { data }))
    }
}

struct InMemorySession {
    data: Arc<Dataset>,
}

#[async_trait]
impl StoreSession for InMemorySession {
    async fn categories(&mut self) -> StoreResult<Vec<Category>> {
        Ok(sorted_by_id(&self.data.categories))
    }

    async fn products(&mut self) -> StoreResult<Vec<Product>> {
        Ok(sorted_by_id(&self.data.products))
    }

    async fn suppliers(&mut self) -> StoreResult<Vec<Supplier>> {
        Ok(sorted_by_id(&self.data.suppliers))
    }

    async fn customers(&mut self) -> StoreResult<Vec<Customer>> {
        Ok(sorted_by_id(&self.data.customers))
    }

    async fn employees(&mut self) -> StoreResult<Vec<Employee>> {
        Ok(sorted_by_id(&self.data.employees))
    }

    async fn orders(&mut self) -> StoreResult<Vec<Order>> {
        Ok(sorted_by_id(&self.data.orders))
    }
}
