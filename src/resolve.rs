//! Value resolution: the effective value of one setting for one project in
//! one environment.
//!
//! Operates on already-propagated records with no I/O and no mutation, so
//! any number of calls may run concurrently over a shared catalog. Steps:
//!
//! 1. Classify the environment name (canonical or declared alias)
//! 2. If the project overrides the setting, resolve against the override
//! 3. If that yields nothing, resolve against the global record
//!
//! Against a single record, a canonical name reads its slot directly. An
//! alias reads the record's own alias value, falling back to the slot of
//! the alias target.

use crate::environment::{AliasTable, EnvironmentName};
use crate::error::SetgenError;
use crate::overrides::OverrideTable;
use crate::record::{SettingRecord, ValueSet};

/// Resolve `environment` against one value set, without any cross-record
/// fallback.
///
/// `setting` is only used to name the record in errors.
pub fn resolve_in<'a>(
    values: &'a ValueSet,
    setting: &str,
    aliases: &AliasTable,
    environment: &str,
) -> Result<Option<&'a str>, SetgenError> {
    match aliases.classify(environment)? {
        EnvironmentName::Canonical(env) => Ok(values.get(env)),
        EnvironmentName::Alias(alias) => {
            let slot = values
                .alias(&alias.name)
                .ok_or_else(|| SetgenError::UnknownEnvironmentAlias {
                    alias: alias.name.clone(),
                    setting: setting.to_string(),
                })?;
            match &slot.value {
                Some(value) => Ok(Some(value.as_str())),
                None => Ok(values.get(alias.target)),
            }
        }
    }
}

/// Resolve a setting for a project: project override first, then the
/// global record.
pub fn resolve<'a>(
    setting: &'a SettingRecord,
    overrides: &'a OverrideTable,
    aliases: &AliasTable,
    project: &str,
    environment: &str,
) -> Result<Option<&'a str>, SetgenError> {
    if let Some(project_values) = overrides.get(&setting.name, project)
        && let Some(value) = resolve_in(project_values, &setting.name, aliases, environment)?
    {
        return Ok(Some(value));
    }
    resolve_in(&setting.values, &setting.name, aliases, environment)
}
