//! Clap adapter for the `setgen` binary.
//!
//! Compiled only with the `clap` feature (on by default). The only bridges to
//! the core are [`Cli::into_action()`], which converts parsed arguments into
//! an [`Action`], and [`Cli::configure()`], which applies the global flags to
//! a [`SetgenBuilder`]. Everything else flows through the clap-free builder.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::builder::SetgenBuilder;
use crate::types::Action;

/// Generate per-project, per-environment settings files from one catalog.
#[derive(Debug, Parser)]
#[command(name = "setgen", version)]
pub struct Cli {
    /// Path to the settings catalog (default: settings.toml).
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Directory generated files are written under (default: current directory).
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Warn about unknown catalog keys instead of failing.
    #[arg(long, global = true)]
    pub lenient: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Write every environment file (the default).
    Generate,
    /// Print the resolved value of one setting.
    Get {
        /// Setting name.
        setting: String,
        /// Project to resolve for.
        #[arg(long, short)]
        project: String,
        /// Environment or alias name.
        #[arg(long = "env", short)]
        environment: String,
    },
    /// Print every setting resolved for a project and environment.
    List {
        #[arg(long, short)]
        project: String,
        #[arg(long = "env", short)]
        environment: String,
    },
}

impl Cli {
    /// Apply the global flags to a builder. Unset flags leave lower layers in charge.
    pub fn configure(&self, mut builder: SetgenBuilder) -> SetgenBuilder {
        if let Some(catalog) = &self.catalog {
            builder = builder.catalog(catalog);
        }
        if let Some(output) = &self.output {
            builder = builder.output_dir(output);
        }
        if self.lenient {
            builder = builder.strict(false);
        }
        builder
    }

    pub fn into_action(self) -> Action {
        match self.command {
            None | Some(Command::Generate) => Action::Generate,
            Some(Command::Get {
                setting,
                project,
                environment,
            }) => Action::Get {
                setting,
                project,
                environment,
            },
            Some(Command::List {
                project,
                environment,
            }) => Action::List {
                project,
                environment,
            },
        }
    }
}
