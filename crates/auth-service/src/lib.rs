//! LexHub Authentication Service Library
//!
//! This library provides credential verification and session-token issuance
//! for the LexHub legal-services platform. The presentation layer consumes
//! it through a single HTTP contract (`POST /api/login`).
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Cryptographic operations (password encryption, session tokens)
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Data models
//! - `repositories` - Account store access layer
//! - `routes` - HTTP route table
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
