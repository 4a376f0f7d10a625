//! modoos - study-group recruitment backend
//!
//! # Architecture
//! - `api`: HTTP handlers, middleware and JWT handling
//! - `services`: auth, email, member and recruit business logic plus the token store
//! - `storage`: SeaORM backend, domain models and slice pagination
//! - `config`: static configuration (TOML + environment)
//! - `runtime`: service wiring and the HTTP server
//! - `system`: logging and shutdown signals

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
