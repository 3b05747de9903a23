//! tfplug - provider-side building blocks for Terraform providers in Rust
//!
//! Holds the pieces a provider implements against: attribute state,
//! diagnostics, schemas with validators and plan modifiers, and the
//! `Provider` / `Resource` / `DataSource` traits. Serving them over the
//! plugin protocol is left to the host.

// Core modules
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod data_source;
pub mod provider;
pub mod resource;

// Helper modules
pub mod plan;
pub mod plan_modifier;
pub mod validator;

// Re-exports for convenience
pub use data_source::DataSource;
pub use error::{Result, TfplugError};
pub use plan::{plan_resource_change, PlanAction, PlannedChange};
pub use plan_modifier::{PlanModifier, RequiresReplaceIfChanged, UseStateForUnknown};
pub use provider::Provider;
pub use resource::{ReadOutcome, Resource};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{Diagnostic, Diagnostics, State};
