//! Food-ordering storefront and admin console backed by a remote REST API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware_layer;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod validation;
pub mod views;
