//! Version conflict detection core: domain model, policies and services.
pub mod domain;
pub mod policies;
pub mod services;
