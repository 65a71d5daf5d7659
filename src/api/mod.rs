//! HTTP API of the catalog service.

pub mod catalog;
pub mod health;
