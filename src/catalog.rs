//! The normalized, read-only settings catalog.
//!
//! [`Catalog::build`] takes loader output ([`CatalogInput`]) and does
//! everything that has to happen before the first resolution:
//!
//! 1. Deduplicate projects (case-insensitive) and require at least one
//! 2. Register environment aliases and cloud mappings
//! 3. Give every setting and override one slot per declared alias
//! 4. Propagate defaults: global records first, then overrides (which first
//!    inherit their parent's default). An override of a setting with a
//!    default therefore has every canonical slot filled, and never falls
//!    through to an explicit global slot.
//! 5. Index overrides by `(setting, project)`, rejecting duplicates
//!
//! After that the catalog is never mutated, and all resolution goes through
//! shared references.

use std::collections::{HashMap, HashSet};

use crate::accessors::AccessorClass;
use crate::azure::{CloudMappings, CloudTarget};
use crate::defaults::{inherit_default, propagate_defaults};
use crate::environment::{AliasTable, Environment};
use crate::error::SetgenError;
use crate::overrides::OverrideTable;
use crate::project::{Project, ProjectName};
use crate::record::{AliasValue, Scope, SettingRecord, ValueSet};
use crate::resolve;

/// An alias declaration as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasInput {
    pub name: String,
    pub target: String,
}

/// A cloud mapping declaration as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudMappingInput {
    pub environment: String,
    pub target: String,
}

/// One setting and its project overrides, before normalization.
///
/// Alias slots only need to list the aliases given explicitly; the rest are
/// added as empty slots during [`Catalog::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingInput {
    pub record: SettingRecord,
    /// Value sets scoped with [`Scope::Project`].
    pub overrides: Vec<ValueSet>,
}

/// Everything the loader hands to [`Catalog::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogInput {
    pub projects: Vec<Project>,
    pub aliases: Vec<AliasInput>,
    pub cloud_mappings: Vec<CloudMappingInput>,
    pub settings: Vec<SettingInput>,
    pub settings_class: Option<AccessorClass>,
    /// Requires `settings_class`.
    pub static_class: Option<AccessorClass>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    aliases: AliasTable,
    projects: Vec<Project>,
    settings: Vec<SettingRecord>,
    by_name: HashMap<String, usize>,
    overrides: OverrideTable,
    cloud: CloudMappings,
    settings_class: Option<AccessorClass>,
    static_class: Option<AccessorClass>,
}

impl Catalog {
    pub fn build(input: CatalogInput) -> Result<Self, SetgenError> {
        let projects = distinct_projects(input.projects)?;

        let mut aliases = AliasTable::new();
        for alias in &input.aliases {
            let target: Environment = alias.target.parse()?;
            aliases.register(&alias.name, target)?;
        }

        if input.static_class.is_some() && input.settings_class.is_none() {
            return Err(SetgenError::ConfigurationError(
                "the static class requires a settings class to be declared".into(),
            ));
        }

        let mut cloud = CloudMappings::default();
        for mapping in &input.cloud_mappings {
            let env: Environment = mapping.environment.parse()?;
            let target: CloudTarget = mapping.target.parse()?;
            cloud.map(target, env);
        }

        let known_projects: HashSet<&ProjectName> = projects.iter().map(|p| &p.name).collect();
        let mut settings = Vec::with_capacity(input.settings.len());
        let mut by_name = HashMap::new();
        let mut overrides = OverrideTable::new();

        for SettingInput { mut record, overrides: project_values } in input.settings {
            if by_name.contains_key(&record.name) {
                return Err(SetgenError::ConfigurationError(format!(
                    "setting '{}' is declared more than once",
                    record.name
                )));
            }
            if record.meta.is_list()
                && record
                    .meta
                    .delimiter
                    .as_deref()
                    .is_none_or(|d| d.trim().is_empty())
            {
                return Err(SetgenError::ConfigurationError(format!(
                    "no delimiter specified for list setting '{}'",
                    record.name
                )));
            }

            record.values.scope = Scope::Global;
            fill_alias_slots(&mut record.values, &aliases, &record.name)?;
            propagate_defaults(&mut record.values);

            for mut values in project_values {
                let Scope::Project(project) = &values.scope else {
                    return Err(SetgenError::ConfigurationError(format!(
                        "override for setting '{}' has no project scope",
                        record.name
                    )));
                };
                if !known_projects.contains(project) {
                    return Err(SetgenError::ConfigurationError(format!(
                        "setting '{}' overrides undeclared project '{project}'",
                        record.name
                    )));
                }
                fill_alias_slots(&mut values, &aliases, &record.name)?;
                inherit_default(&mut values, record.values.default.as_deref());
                propagate_defaults(&mut values);
                overrides.insert(&record.name, values)?;
            }

            by_name.insert(record.name.clone(), settings.len());
            settings.push(record);
        }

        tracing::debug!(
            settings = settings.len(),
            overrides = overrides.len(),
            projects = projects.len(),
            aliases = aliases.len(),
            "catalog normalized"
        );

        Ok(Self {
            aliases,
            projects,
            settings,
            by_name,
            overrides,
            cloud,
            settings_class: input.settings_class,
            static_class: input.static_class,
        })
    }

    /// Settings in catalog order.
    pub fn settings(&self) -> &[SettingRecord] {
        &self.settings
    }

    pub fn setting(&self, name: &str) -> Option<&SettingRecord> {
        self.by_name.get(name).map(|&i| &self.settings[i])
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        let name = ProjectName::new(name);
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn overrides(&self) -> &OverrideTable {
        &self.overrides
    }

    pub fn overrides_for<'a>(&'a self, setting: &'a str) -> impl Iterator<Item = &'a ValueSet> + 'a {
        self.overrides.for_setting(setting)
    }

    pub fn cloud_mappings(&self) -> &CloudMappings {
        &self.cloud
    }

    pub fn settings_class(&self) -> Option<&AccessorClass> {
        self.settings_class.as_ref()
    }

    pub fn static_class(&self) -> Option<&AccessorClass> {
        self.static_class.as_ref()
    }

    /// Resolve a setting by name for a project and environment (canonical
    /// name or declared alias).
    pub fn resolve(
        &self,
        setting: &str,
        project: &str,
        environment: &str,
    ) -> Result<Option<&str>, SetgenError> {
        let record = self
            .setting(setting)
            .ok_or_else(|| SetgenError::UnknownSetting(setting.to_string()))?;
        self.resolve_record(record, project, environment)
    }

    pub fn resolve_record<'a>(
        &'a self,
        record: &'a SettingRecord,
        project: &str,
        environment: &str,
    ) -> Result<Option<&'a str>, SetgenError> {
        resolve::resolve(record, &self.overrides, &self.aliases, project, environment)
    }
}

fn distinct_projects(projects: Vec<Project>) -> Result<Vec<Project>, SetgenError> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::with_capacity(projects.len());
    for project in projects {
        if seen.insert(project.name.clone()) {
            distinct.push(project);
        } else {
            tracing::debug!(project = %project.name, "ignoring repeated project declaration");
        }
    }
    if distinct.is_empty() {
        return Err(SetgenError::ConfigurationError(
            "no projects have been declared in the catalog".into(),
        ));
    }
    Ok(distinct)
}

/// Rebuild `values.aliases` with exactly one slot per declared alias, in
/// declaration order, keeping explicitly given values.
fn fill_alias_slots(
    values: &mut ValueSet,
    aliases: &AliasTable,
    setting: &str,
) -> Result<(), SetgenError> {
    if let Some(stray) = values.aliases.iter().find(|slot| aliases.get(&slot.name).is_none()) {
        return Err(SetgenError::UnknownEnvironmentAlias {
            alias: stray.name.clone(),
            setting: setting.to_string(),
        });
    }
    let given = std::mem::take(&mut values.aliases);
    values.aliases = aliases
        .iter()
        .map(|alias| AliasValue {
            name: alias.name.clone(),
            value: given
                .iter()
                .find(|slot| slot.name == alias.name)
                .and_then(|slot| slot.value.clone()),
        })
        .collect();
    Ok(())
}
