//! Catalog loading: TOML text → raw entries → [`CatalogInput`] → [`Catalog`].
//!
//! Raw entries mirror the document with every attribute optional, so that a
//! missing required attribute is reported as
//! [`SetgenError::MissingRequiredAttribute`] with the line of the offending
//! entry instead of a generic deserialization error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::accessors::{AccessorClass, AccessorKind};
use crate::catalog::{AliasInput, Catalog, CatalogInput, CloudMappingInput, SettingInput};
use crate::error::SetgenError;
use crate::project::{Project, ProjectName};
use crate::record::{AliasValue, Scope, SettingMeta, SettingRecord, ValueSet};
use crate::validate;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    /// Environment alias declarations.
    #[serde(default)]
    pub environments: Vec<AliasEntry>,
    #[serde(default)]
    pub azure: Vec<CloudMappingEntry>,
    #[serde(default)]
    pub settings: Vec<SettingEntry>,
    pub settings_class: Option<AccessorClassEntry>,
    pub static_class: Option<AccessorClassEntry>,
}

/// `[settings_class]` / `[static_class]`.
#[derive(Debug, Default, Deserialize)]
pub struct AccessorClassEntry {
    pub directory: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub exclude_azure: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectEntry {
    pub name: Option<String>,
    pub directory: Option<String>,
    pub azure_project: Option<String>,
    pub azure_directory: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AliasEntry {
    pub name: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloudMappingEntry {
    pub environment: Option<String>,
    pub target: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingEntry {
    pub name: Option<String>,
    pub dev: Option<String>,
    pub qa: Option<String>,
    pub staging: Option<String>,
    pub live: Option<String>,
    pub default: Option<String>,
    /// Explicit alias values, keyed by the declared alias name.
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(rename = "type")]
    pub value_type: Option<String>,
    pub delimiter: Option<String>,
    pub autogen: Option<bool>,
    pub azure_exclude: Option<bool>,
    pub azure_definition_exclude: Option<bool>,
    /// Project overrides (`[[settings.projects]]`).
    #[serde(default)]
    pub projects: Vec<OverrideEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverrideEntry {
    /// Project name.
    pub name: Option<String>,
    pub dev: Option<String>,
    pub qa: Option<String>,
    pub staging: Option<String>,
    pub live: Option<String>,
    pub default: Option<String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Read and load a catalog file.
pub fn load_catalog(path: &Path, strict: bool) -> Result<Catalog, SetgenError> {
    let content = std::fs::read_to_string(path).map_err(|e| SetgenError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_catalog(&content, path, strict)
}

/// Load a catalog from already-read text. `path` is only used in errors.
pub fn parse_catalog(content: &str, path: &Path, strict: bool) -> Result<Catalog, SetgenError> {
    let document = parse_document(content, path, strict)?;
    let input = into_input(document, content, path)?;
    Catalog::build(input)
}

/// Deserialize the document, rejecting unknown keys in strict mode and
/// logging them otherwise.
pub fn parse_document(
    content: &str,
    path: &Path,
    strict: bool,
) -> Result<CatalogDocument, SetgenError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let document: CatalogDocument = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(validate::normalize_key(&ignored_path.to_string()));
    })
    .map_err(|e| SetgenError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(document);
    }
    if strict {
        return Err(validate::unknown_keys_error(content, path, unknown_keys));
    }
    for key in &unknown_keys {
        tracing::warn!(
            key = %key,
            line = validate::find_key_line(content, key),
            path = %path.display(),
            "ignoring unknown catalog key"
        );
    }
    Ok(document)
}

/// Check required attributes and convert raw entries into catalog input.
pub fn into_input(
    document: CatalogDocument,
    content: &str,
    path: &Path,
) -> Result<CatalogInput, SetgenError> {
    let required = Required { content, path };

    let mut projects = Vec::with_capacity(document.projects.len());
    for (i, entry) in document.projects.into_iter().enumerate() {
        let section = format!("projects.{i}");
        let name = required.get(entry.name, "projects", "name", &section)?;
        let mut project = Project::new(&name);
        project.directory = entry.directory.unwrap_or_default();
        project.azure_project = entry.azure_project;
        project.azure_directory = entry.azure_directory.unwrap_or_default();
        projects.push(project);
    }

    let mut aliases = Vec::with_capacity(document.environments.len());
    for (i, entry) in document.environments.into_iter().enumerate() {
        let section = format!("environments.{i}");
        aliases.push(AliasInput {
            name: required.get(entry.name, "environments", "name", &section)?,
            target: required.get(entry.target, "environments", "target", &section)?,
        });
    }

    let mut cloud_mappings = Vec::with_capacity(document.azure.len());
    for (i, entry) in document.azure.into_iter().enumerate() {
        let section = format!("azure.{i}");
        cloud_mappings.push(CloudMappingInput {
            environment: required.get(entry.environment, "azure", "environment", &section)?,
            target: required.get(entry.target, "azure", "target", &section)?,
        });
    }

    let mut settings = Vec::with_capacity(document.settings.len());
    for (i, entry) in document.settings.into_iter().enumerate() {
        let section = format!("settings.{i}");
        let name = required.get(entry.name, "settings", "name", &section)?;

        let mut overrides = Vec::with_capacity(entry.projects.len());
        for (j, project_entry) in entry.projects.into_iter().enumerate() {
            let project_section = format!("{section}.projects.{j}");
            let project = required.get(
                project_entry.name,
                "settings.projects",
                "name",
                &project_section,
            )?;
            overrides.push(ValueSet {
                scope: Scope::Project(ProjectName::new(&project)),
                dev: project_entry.dev,
                qa: project_entry.qa,
                staging: project_entry.staging,
                live: project_entry.live,
                default: project_entry.default,
                aliases: alias_values(project_entry.aliases),
            });
        }

        let defaults = SettingMeta::default();
        let meta = SettingMeta {
            value_type: entry
                .value_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(defaults.value_type),
            delimiter: entry.delimiter,
            autogenerate: entry.autogen.unwrap_or(defaults.autogenerate),
            azure_exclude: entry.azure_exclude.unwrap_or(defaults.azure_exclude),
            azure_definition_exclude: entry
                .azure_definition_exclude
                .unwrap_or(defaults.azure_definition_exclude),
        };

        settings.push(SettingInput {
            record: SettingRecord {
                name,
                values: ValueSet {
                    scope: Scope::Global,
                    dev: entry.dev,
                    qa: entry.qa,
                    staging: entry.staging,
                    live: entry.live,
                    default: entry.default,
                    aliases: alias_values(entry.aliases),
                },
                meta,
            },
            overrides,
        });
    }

    let settings_class = document
        .settings_class
        .map(|entry| required.accessor_class(entry, AccessorKind::Settings, "settings_class"))
        .transpose()?;
    let static_class = document
        .static_class
        .map(|entry| required.accessor_class(entry, AccessorKind::Static, "static_class"))
        .transpose()?;

    Ok(CatalogInput {
        projects,
        aliases,
        cloud_mappings,
        settings,
        settings_class,
        static_class,
    })
}

fn alias_values(aliases: BTreeMap<String, String>) -> Vec<AliasValue> {
    aliases
        .into_iter()
        .map(|(name, value)| AliasValue {
            name,
            value: Some(value),
        })
        .collect()
}

struct Required<'a> {
    content: &'a str,
    path: &'a Path,
}

impl Required<'_> {
    fn get(
        &self,
        value: Option<String>,
        entry: &str,
        attribute: &str,
        section: &str,
    ) -> Result<String, SetgenError> {
        value.ok_or_else(|| SetgenError::MissingRequiredAttribute {
            entry: entry.to_string(),
            attribute: attribute.to_string(),
            path: self.path.to_path_buf(),
            line: validate::section_line(self.content, section),
        })
    }

    fn accessor_class(
        &self,
        entry: AccessorClassEntry,
        kind: AccessorKind,
        section: &str,
    ) -> Result<AccessorClass, SetgenError> {
        let namespace = self.get(entry.namespace, section, "namespace", section)?;
        let mut class = AccessorClass::new(kind, &namespace, entry.name.as_deref());
        class.directory = entry.directory.unwrap_or_default();
        class.exclude_azure = entry.exclude_azure.unwrap_or_default();
        Ok(class)
    }
}
