//! Core entity definitions for the roster service.
//!
//! This crate defines the domain types shared between the HTTP layer and
//! the storage layer: the user record itself plus the input and page types
//! that travel through the service.

mod user;

pub use user::*;
