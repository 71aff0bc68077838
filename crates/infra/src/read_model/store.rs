use std::sync::Arc;

use async_trait::async_trait;

use northwind_parties::{Customer, Employee, Supplier};
use northwind_products::{Category, Product};
use northwind_sales::Order;

use crate::error::StoreResult;

/// Source of read-only store sessions.
///
/// A report section opens exactly one session, runs its queries one after the
/// other and drops it. Whatever the session holds (a pooled connection, a
/// snapshot) is released on drop, including when a query fails half way.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>>;
}

#[async_trait]
impl<S> DataStore for Arc<S>
where
    S: DataStore + ?Sized,
{
    async fn session(&self) -> StoreResult<Box<dyn StoreSession>> {
        (**self).session().await
    }
}

/// One scoped conversation with the store.
///
/// Every fetch returns the full collection ordered by primary key.
/// Relationships are carried as foreign ids on the child rows
/// (`Product::category_id`, `Order::customer_id`, ...); orders come back with
/// their detail lines attached.
#[async_trait]
pub trait StoreSession: Send {
    async fn categories(&mut self) -> StoreResult<Vec<Category>>;
    async fn products(&mut self) -> StoreResult<Vec<Product>>;
    async fn suppliers(&mut self) -> StoreResult<Vec<Supplier>>;
    async fn customers(&mut self) -> StoreResult<Vec<Customer>>;
    async fn employees(&mut self) -> StoreResult<Vec<Employee>>;
    async fn orders(&mut self) -> StoreResult<Vec<Order>>;
}
