//! Per-customer recipient lists for one notification stream.

pub mod model;
pub mod repository;
pub mod rest;
pub mod schema;
pub mod service;
