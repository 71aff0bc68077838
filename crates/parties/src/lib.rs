//! Parties domain module: the people and companies Northwind deals with.
//!
//! Customers and suppliers (external business partners) plus employees, as
//! read models with no IO and no storage.

pub mod employee;
pub mod party;

pub use employee::{Employee, EmployeeId};
pub use party::{Customer, CustomerId, Supplier, SupplierId};
