//! Products domain module: the catalog read models.
//!
//! Products and categories as the statistics engine consumes them, read-only
//! and keyed by integer id (no IO, no storage).

pub mod category;
pub mod product;

pub use category::{Category, CategoryId};
pub use product::{Product, ProductId};
