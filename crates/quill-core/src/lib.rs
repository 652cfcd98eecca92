//! # Quill Core
//!
//! The domain layer of the Quill blog platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, the visibility/ownership policies, validation, and the service
//! orchestration over storage ports.

pub mod config;
pub mod domain;
pub mod error;
pub mod page;
pub mod policy;
pub mod ports;
pub mod services;
pub mod validate;

pub use config::SiteConfig;
pub use error::DomainError;
pub use policy::Viewer;
