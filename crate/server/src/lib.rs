//! Warden authorizer server
//!
//! The service shell around the [`warden_authorizer`] decision core:
//! configuration, JWKS fetching and caching, the HTTP endpoint the API
//! gateway invokes, and logging. The core stays pure; everything that
//! talks to the outside world lives here.

pub mod config;
pub mod error;
pub mod jwks;
pub mod result;
pub mod routes;
pub mod start_server;
pub mod telemetry;

#[cfg(test)]
mod tests;
