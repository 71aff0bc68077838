//! `northwind-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the Northwind read
//! models (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use value_object::{Money, ValueObject};
