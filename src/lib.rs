//! Settings resolution for multi-project, multi-environment deployments.
//!
//! A single catalog declares every setting once, with a value per canonical
//! environment (`Dev`, `QA`, `Staging`, `Live`), a fallback `default`, and
//! optional per-project overrides. Setgen validates the catalog, fills the
//! gaps, and answers "what is setting S for project P in environment E?".
//!
//! ```ignore
//! let catalog = Setgen::builder()
//!     .catalog("settings.toml")
//!     .load()?;
//! let timeout = catalog.resolve("Timeout", "Web", "UAT")?;
//! ```
//!
//! # Catalog format
//!
//! ```toml
//! [[projects]]
//! name = "Web"
//! directory = "apps"
//!
//! [[environments]]
//! name = "UAT"
//! target = "staging"
//!
//! [[settings]]
//! name = "Timeout"
//! default = "30"
//! aliases = { UAT = "45" }
//!
//! [[settings.projects]]
//! name = "Web"
//! dev = "5"
//! ```
//!
//! # Resolution
//!
//! Lookups consult the project's override first and fall back to the global
//! record when the override has no value for the environment. Within one
//! value set:
//!
//! - a canonical environment reads its slot;
//! - an alias reads its own value if one was given, else its target's slot.
//!
//! `default` is copied into every absent canonical slot while the catalog is
//! built, and an override without its own `default` inherits the global one
//! first. Explicit values always win over the default, including the empty
//! string. Absence is reported as `None`, never as `""`.
//!
//! An override of a setting that declares a `default` inherits it, so every
//! canonical slot of that override is filled and explicit global slots are
//! only reached for settings without a default.
//!
//! # Generated artifacts
//!
//! `generate` writes `Settings.{env}.Config` files per project and
//! environment, and the C# accessor classes declared by `[settings_class]`
//! and `[static_class]`. It also reports the service definition names and
//! service configuration pairs for cloud projects.
//!
//! # Options
//!
//! The tool's own options (catalog path, output directory, strict mode) are
//! layered with [confique](https://docs.rs/confique): builder values, then
//! `SETGEN_*` environment variables, then `setgen.toml`, then compiled
//! defaults. See [`config::GeneratorConfig`].
//!
//! # Strict mode
//!
//! On by default. Unknown catalog keys fail the load with the file path, key
//! and line number:
//!
//! ```text
//! Unknown key 'settings.1.dve' in settings.toml (line 10)
//! ```
//!
//! With `.strict(false)` they are logged through `tracing` and ignored.
//!
//! # Clap adapter
//!
//! The `cli` module (behind the `clap` feature, on by default) provides the
//! [`Cli`] parser used by the `setgen` binary. It converts arguments into an
//! [`Action`] so the core never depends on clap.

pub mod accessors;
pub mod azure;
pub mod catalog;
pub mod config;
pub mod defaults;
pub mod emit;
pub mod environment;
pub mod error;
pub mod ops;
pub mod overrides;
pub mod project;
pub mod record;
pub mod resolve;
pub mod source;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Setgen, SetgenBuilder};
pub use catalog::{Catalog, CatalogInput};
#[cfg(feature = "clap")]
pub use cli::{Cli, Command};
pub use environment::{AliasTable, Environment, EnvironmentAlias, EnvironmentName};
pub use error::SetgenError;
pub use ops::RunResult;
pub use overrides::OverrideTable;
pub use project::{Project, ProjectName};
pub use record::{Scope, SettingMeta, SettingRecord, ValueSet};
pub use types::Action;
