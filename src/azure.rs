//! Name/value pairs for cloud service descriptors.
//!
//! A project with an `azure_project` is deployed as a cloud role. Its local
//! and cloud service configurations each take their values from one
//! canonical environment, chosen through the catalog's cloud mappings
//! (defaults: `Local` → Dev, `Cloud` → Live; the first mapping per target
//! wins). Its service definition declares the names of every setting not
//! excluded from it. Merging names and pairs into the descriptor documents
//! is left to the caller.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::environment::Environment;
use crate::error::SetgenError;
use crate::project::Project;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudTarget {
    Local,
    Cloud,
}

impl CloudTarget {
    pub const ALL: [CloudTarget; 2] = [CloudTarget::Local, CloudTarget::Cloud];

    pub fn as_str(self) -> &'static str {
        match self {
            CloudTarget::Local => "Local",
            CloudTarget::Cloud => "Cloud",
        }
    }

    /// Descriptor file the pairs for this target belong in.
    pub fn file_name(self) -> String {
        format!("ServiceConfiguration.{}.cscfg", self.as_str())
    }
}

impl fmt::Display for CloudTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudTarget {
    type Err = SetgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CloudTarget::ALL
            .into_iter()
            .find(|target| target.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SetgenError::ConfigurationError(format!(
                    "unknown cloud target '{s}' (expected Local or Cloud)"
                ))
            })
    }
}

/// Which canonical environment feeds each cloud target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloudMappings {
    local: Option<Environment>,
    cloud: Option<Environment>,
}

impl CloudMappings {
    /// Record a mapping unless the target is already mapped.
    pub fn map(&mut self, target: CloudTarget, env: Environment) {
        let slot = match target {
            CloudTarget::Local => &mut self.local,
            CloudTarget::Cloud => &mut self.cloud,
        };
        if slot.is_none() {
            *slot = Some(env);
        }
    }

    pub fn environment(&self, target: CloudTarget) -> Environment {
        match target {
            CloudTarget::Local => self.local.unwrap_or(Environment::Dev),
            CloudTarget::Cloud => self.cloud.unwrap_or(Environment::Live),
        }
    }
}

/// Resolved pairs for one project's service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfiguration {
    pub project: String,
    pub target: CloudTarget,
    pub environment: Environment,
    /// `{azure_directory}/{azure_project}/ServiceConfiguration.{target}.cscfg`
    pub path: PathBuf,
    pub settings: Vec<(String, String)>,
}

/// Setting names declared in one project's service definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub project: String,
    /// `{azure_directory}/{azure_project}/ServiceDefinition.csdef`
    pub path: PathBuf,
    pub settings: Vec<String>,
}

pub const DEFINITION_FILE: &str = "ServiceDefinition.csdef";

/// Projects deployed as cloud roles, in catalog order.
pub fn cloud_projects(catalog: &Catalog) -> impl Iterator<Item = &Project> {
    catalog
        .projects()
        .iter()
        .filter(|p| p.azure_project.as_deref().is_some_and(|name| !name.trim().is_empty()))
}

/// Setting names for the service definition: everything not excluded by
/// either cloud exclusion flag.
pub fn definition_settings(catalog: &Catalog) -> Vec<&str> {
    catalog
        .settings()
        .iter()
        .filter(|s| !s.meta.azure_exclude && !s.meta.azure_definition_exclude)
        .map(|s| s.name.as_str())
        .collect()
}

/// Resolved `(name, value)` pairs for a project's service configuration.
///
/// Settings flagged `azure_exclude` and settings with no value are left out.
pub fn service_settings(
    catalog: &Catalog,
    project: &str,
    target: CloudTarget,
) -> Result<Vec<(String, String)>, SetgenError> {
    let env = catalog.cloud_mappings().environment(target);
    let mut pairs = Vec::new();
    for record in catalog.settings() {
        if record.meta.azure_exclude {
            continue;
        }
        if let Some(value) = catalog.resolve_record(record, project, env.as_str())? {
            pairs.push((record.name.clone(), value.to_string()));
        }
    }
    Ok(pairs)
}

/// Service definitions for every cloud project.
pub fn service_definitions(catalog: &Catalog) -> Vec<ServiceDefinition> {
    let names: Vec<String> = definition_settings(catalog)
        .into_iter()
        .map(str::to_string)
        .collect();
    cloud_projects(catalog)
        .filter_map(|project| {
            let azure_project = project.azure_project.as_deref()?;
            Some(ServiceDefinition {
                project: project.name.to_string(),
                path: PathBuf::from(&project.azure_directory)
                    .join(azure_project)
                    .join(DEFINITION_FILE),
                settings: names.clone(),
            })
        })
        .collect()
}

/// Service configurations for every cloud project and target.
pub fn service_configurations(catalog: &Catalog) -> Result<Vec<ServiceConfiguration>, SetgenError> {
    let mut configurations = Vec::new();
    for project in cloud_projects(catalog) {
        let Some(azure_project) = project.azure_project.as_deref() else {
            continue;
        };
        let dir = PathBuf::from(&project.azure_directory).join(azure_project);
        for target in CloudTarget::ALL {
            configurations.push(ServiceConfiguration {
                project: project.name.to_string(),
                target,
                environment: catalog.cloud_mappings().environment(target),
                path: dir.join(target.file_name()),
                settings: service_settings(catalog, project.name.as_str(), target)?,
            });
        }
    }
    Ok(configurations)
}
