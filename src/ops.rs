//! Generator operations: generation, single-value lookup, listing, and the
//! `RunResult` enum that callers use to display results.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::accessors;
use crate::azure::{self, ServiceConfiguration, ServiceDefinition};
use crate::catalog::Catalog;
use crate::emit;
use crate::error::SetgenError;

/// Result of an operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum RunResult {
    /// Environment and accessor files written, cloud settings computed.
    Generated {
        files: Vec<PathBuf>,
        accessors: Vec<PathBuf>,
        definitions: Vec<ServiceDefinition>,
        services: Vec<ServiceConfiguration>,
    },
    /// One resolved value. `None` means nothing is configured.
    Value {
        setting: String,
        value: Option<String>,
    },
    /// Every setting resolved for one project and environment, in catalog order.
    Listing { entries: Vec<(String, Option<String>)> },
}

const NOT_SET: &str = "<not set>";

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunResult::Generated {
                files,
                accessors,
                definitions,
                services,
            } => {
                writeln!(f, "Wrote {} environment files", files.len())?;
                for path in files {
                    writeln!(f, "  {}", path.display())?;
                }
                for path in accessors {
                    writeln!(f, "Wrote accessor class {}", path.display())?;
                }
                for definition in definitions {
                    writeln!(
                        f,
                        "Definition settings for {} belong in {}",
                        definition.project,
                        definition.path.display()
                    )?;
                    for name in &definition.settings {
                        writeln!(f, "  {name}")?;
                    }
                }
                for service in services {
                    writeln!(
                        f,
                        "{} settings for {} ({} values) belong in {}",
                        service.target,
                        service.project,
                        service.environment,
                        service.path.display()
                    )?;
                    for (name, value) in &service.settings {
                        writeln!(f, "  {name} = {value}")?;
                    }
                }
                Ok(())
            }
            RunResult::Value { setting, value } => {
                write!(f, "{setting} = {}", value.as_deref().unwrap_or(NOT_SET))
            }
            RunResult::Listing { entries } => {
                for (i, (name, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{name} = {}", value.as_deref().unwrap_or(NOT_SET))?;
                }
                Ok(())
            }
        }
    }
}

/// Render everything, then write the environment files under `output_dir`.
pub fn generate(catalog: &Catalog, output_dir: &Path) -> Result<RunResult, SetgenError> {
    let files = emit::environment_files(catalog)?;
    let classes = accessors::accessor_files(catalog)?;
    let definitions = azure::service_definitions(catalog);
    let services = azure::service_configurations(catalog)?;
    let written = emit::write_environment_files(&files, output_dir)?;
    let accessors = accessors::write_accessor_files(&classes, output_dir)?;
    tracing::info!(
        files = written.len(),
        accessors = accessors.len(),
        definitions = definitions.len(),
        services = services.len(),
        "generation finished"
    );
    Ok(RunResult::Generated {
        files: written,
        accessors,
        definitions,
        services,
    })
}

pub fn get_value(
    catalog: &Catalog,
    setting: &str,
    project: &str,
    environment: &str,
) -> Result<RunResult, SetgenError> {
    let value = catalog.resolve(setting, project, environment)?;
    Ok(RunResult::Value {
        setting: setting.to_string(),
        value: value.map(str::to_string),
    })
}

pub fn list_values(
    catalog: &Catalog,
    project: &str,
    environment: &str,
) -> Result<RunResult, SetgenError> {
    let entries = catalog
        .settings()
        .iter()
        .map(|record| {
            let value = catalog.resolve_record(record, project, environment)?;
            Ok((record.name.clone(), value.map(str::to_string)))
        })
        .collect::<Result<Vec<_>, SetgenError>>()?;
    Ok(RunResult::Listing { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::{AccessorClass, AccessorKind};
    use crate::fixtures::test::sample_input;

    fn catalog() -> Catalog {
        Catalog::build(sample_input()).unwrap()
    }

    #[test]
    fn get_resolves_override() {
        let result = get_value(&catalog(), "Timeout", "Foo", "dev").unwrap();
        assert_eq!(
            result,
            RunResult::Value {
                setting: "Timeout".into(),
                value: Some("5".into()),
            }
        );
        assert_eq!(result.to_string(), "Timeout = 5");
    }

    #[test]
    fn get_absent_displays_not_set() {
        let result = get_value(&catalog(), "Feature", "Foo", "Dev").unwrap();
        assert_eq!(result.to_string(), "Feature = <not set>");
    }

    #[test]
    fn get_unknown_setting() {
        let result = get_value(&catalog(), "Nope", "Foo", "Dev");
        assert!(matches!(result, Err(SetgenError::UnknownSetting(_))));
    }

    #[test]
    fn list_in_catalog_order() {
        let result = list_values(&catalog(), "Bar", "UAT").unwrap();
        match &result {
            RunResult::Listing { entries } => {
                let names: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(names, ["Timeout", "Feature", "Switch", "Retries", "Empty"]);
            }
            other => panic!("Expected Listing, got {other:?}"),
        }
        assert_eq!(
            result.to_string(),
            "Timeout = 30\nFeature = on\nSwitch = off\nRetries = 3\nEmpty = <not set>"
        );
    }

    #[test]
    fn list_unknown_environment_fails() {
        let result = list_values(&catalog(), "Bar", "Prod");
        assert!(matches!(result, Err(SetgenError::UnknownEnvironment(_))));
    }

    #[test]
    fn generate_writes_files_and_reports_services() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate(&catalog(), dir.path()).unwrap();
        match &result {
            RunResult::Generated {
                files,
                accessors,
                definitions,
                services,
            } => {
                assert_eq!(files.len(), 10);
                assert!(files.iter().all(|p| p.exists()));
                assert!(accessors.is_empty());
                assert_eq!(definitions.len(), 1);
                assert_eq!(services.len(), 2);
            }
            other => panic!("Expected Generated, got {other:?}"),
        }
        let display = result.to_string();
        assert!(display.starts_with("Wrote 10 environment files"));
        assert!(display.contains("Local settings for Foo (Dev values)"));
        assert!(display.contains(
            "Definition settings for Foo belong in cloud/Foo.Cloud/ServiceDefinition.csdef\n  Timeout\n"
        ));
    }

    #[test]
    fn generate_writes_declared_accessor_classes() {
        let dir = tempfile::tempdir().unwrap();
        let mut input = sample_input();
        input.settings_class = Some(AccessorClass::new(AccessorKind::Settings, "Acme.Config", None));
        input.static_class = Some(AccessorClass::new(AccessorKind::Static, "Acme.App", None));
        let catalog = Catalog::build(input).unwrap();
        let result = generate(&catalog, dir.path()).unwrap();
        match &result {
            RunResult::Generated { accessors, .. } => {
                assert_eq!(
                    accessors,
                    &vec![
                        dir.path().join("Settings.cs"),
                        dir.path().join("ConfigurationManager.cs"),
                    ]
                );
            }
            other => panic!("Expected Generated, got {other:?}"),
        }
        let settings = std::fs::read_to_string(dir.path().join("Settings.cs")).unwrap();
        assert!(settings.contains("public static string Timeout = \"Timeout\";"));
        assert!(result.to_string().contains("Wrote accessor class"));
    }
}
