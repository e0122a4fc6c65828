//! Portal use-case services.
//!
//! # Responsibility
//! - Compose repositories into the portal's external operations.
//! - Keep hosts (CLI, UI bindings) decoupled from store and table details.

pub mod portal_service;
pub mod targeting;
