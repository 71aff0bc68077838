//! Sales domain module: orders and their line items.
//!
//! Orders are read models keyed by integer id. Each order owns its detail
//! lines; the customer and employee are referenced by id only.

pub mod order;

pub use order::{Discount, Order, OrderDetail, OrderId};
