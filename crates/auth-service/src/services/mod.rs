//! Business logic layer.

pub mod login_service;
pub mod signup_service;
