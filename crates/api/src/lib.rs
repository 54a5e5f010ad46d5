//! aiview API server library.
//!
//! Exposes the building blocks (config, state, envelope emission, response
//! templates, validation middleware, routes) so integration tests and the
//! binary entrypoint can both access them.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
pub mod template;
