//! Infrastructure layer modules
//!
//! This module contains shared infrastructure components:
//! - `auth`: JWT authentication and role-based capabilities
//! - `config`: Application configuration and settings
//! - `error`: Unified error types
//! - `metrics`: Prometheus metrics helpers
//! - `postgres`: PostgreSQL connection pool and schema bootstrap

pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
