//! Account store access layer.

pub mod accounts;
