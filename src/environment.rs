//! Canonical deployment environments and the alias table that maps
//! user-declared environment names onto them.
//!
//! Canonical names (`Dev`, `Qa`, `Staging`, `Live`) are matched
//! case-insensitively. Alias names are user tokens that also end up in
//! generated file names, so they are matched exactly as declared.

use std::fmt;
use std::str::FromStr;

use crate::error::SetgenError;

/// One of the four fixed deployment tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Dev,
    Qa,
    Staging,
    Live,
}

impl Environment {
    /// All canonical environments, in the order files are emitted.
    pub const ALL: [Environment; 4] = [
        Environment::Dev,
        Environment::Qa,
        Environment::Staging,
        Environment::Live,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "Dev",
            Environment::Qa => "Qa",
            Environment::Staging => "Staging",
            Environment::Live => "Live",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = SetgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SetgenError::UnknownEnvironment(s.to_string()))
    }
}

/// A globally declared alias: a named lens onto one canonical environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentAlias {
    pub name: String,
    pub target: Environment,
}

/// A requested environment name, classified against the alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentName<'a> {
    Canonical(Environment),
    Alias(&'a EnvironmentAlias),
}

/// Declared aliases, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: Vec<EnvironmentAlias>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alias. Names must be unique and must not shadow a
    /// canonical environment.
    pub fn register(&mut self, name: &str, target: Environment) -> Result<(), SetgenError> {
        if self.is_canonical(name) {
            return Err(SetgenError::ConfigurationError(format!(
                "environment alias '{name}' collides with a canonical environment"
            )));
        }
        if self.get(name).is_some() {
            return Err(SetgenError::ConfigurationError(format!(
                "environment alias '{name}' is declared more than once"
            )));
        }
        self.aliases.push(EnvironmentAlias {
            name: name.to_string(),
            target,
        });
        Ok(())
    }

    pub fn is_canonical(&self, name: &str) -> bool {
        name.parse::<Environment>().is_ok()
    }

    /// Exact-name lookup of a registered alias.
    pub fn get(&self, name: &str) -> Option<&EnvironmentAlias> {
        self.aliases.iter().find(|alias| alias.name == name)
    }

    pub fn classify(&self, name: &str) -> Result<EnvironmentName<'_>, SetgenError> {
        if let Ok(env) = name.parse::<Environment>() {
            return Ok(EnvironmentName::Canonical(env));
        }
        self.get(name)
            .map(EnvironmentName::Alias)
            .ok_or_else(|| SetgenError::UnknownEnvironment(name.to_string()))
    }

    pub fn resolve_alias_to_canonical(&self, name: &str) -> Result<Environment, SetgenError> {
        Ok(match self.classify(name)? {
            EnvironmentName::Canonical(env) => env,
            EnvironmentName::Alias(alias) => alias.target,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvironmentAlias> {
        self.aliases.iter()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
