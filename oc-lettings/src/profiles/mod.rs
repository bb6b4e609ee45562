//! Public profiles of site accounts.

pub mod admin;
pub mod models;
pub mod routes;
pub mod service;
