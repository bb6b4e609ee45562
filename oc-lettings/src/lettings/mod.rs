//! Rental properties and their addresses.

pub mod admin;
pub mod models;
pub mod routes;
pub mod service;
