//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic. This layer handles configuration, filesystem layout and
//! component wiring.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`factory`] - Component factory functions
//! - [`paths`] - Default locations under `~/.quantfolio/`

pub mod config;
pub mod factory;
pub mod paths;
