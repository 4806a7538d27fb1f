//! Affordability scoring for open-banking tenant checks.
//!
//! The [`workflows::affordability`] module holds the pure scoring engine. Everything around it
//! (configuration, telemetry, import adapters, the check lifecycle and its HTTP router) is the
//! plumbing a service needs to feed the engine and keep its output.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
