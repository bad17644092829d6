#[cfg(test)]
pub mod test {
    use crate::catalog::{AliasInput, CatalogInput, SettingInput};
    use crate::environment::Environment;
    use crate::project::{Project, ProjectName};
    use crate::record::{Scope, SettingRecord, ValueSet};

    pub fn setting(name: &str, values: ValueSet) -> SettingRecord {
        SettingRecord::new(name, values)
    }

    pub fn project_values(project: &str) -> ValueSet {
        ValueSet::new(Scope::Project(ProjectName::new(project)))
    }

    fn global() -> ValueSet {
        ValueSet::new(Scope::Global)
    }

    /// Two projects (`Foo` is a cloud role), one alias (`UAT` → Staging) and
    /// five settings covering defaults, overrides, alias fallback and empty
    /// values.
    pub fn sample_input() -> CatalogInput {
        let mut foo = Project::new("Foo");
        foo.directory = "apps".into();
        foo.azure_project = Some("Foo.Cloud".into());
        foo.azure_directory = "cloud".into();

        CatalogInput {
            projects: vec![foo, Project::new("Bar")],
            aliases: vec![AliasInput {
                name: "UAT".into(),
                target: "staging".into(),
            }],
            cloud_mappings: vec![],
            settings: vec![
                SettingInput {
                    record: setting("Timeout", global().with_default("30")),
                    overrides: vec![project_values("Foo").with(Environment::Dev, "5")],
                },
                SettingInput {
                    record: setting("Feature", global().with(Environment::Staging, "on")),
                    overrides: vec![],
                },
                SettingInput {
                    record: setting(
                        "Switch",
                        global()
                            .with(Environment::Staging, "on")
                            .with_alias("UAT", Some("off")),
                    ),
                    overrides: vec![],
                },
                SettingInput {
                    record: setting("Retries", global().with_default("3")),
                    overrides: vec![],
                },
                SettingInput {
                    record: setting("Empty", global().with(Environment::Dev, "")),
                    overrides: vec![],
                },
            ],
            settings_class: None,
            static_class: None,
        }
    }

    pub const SAMPLE_TOML: &str = r#"[[projects]]
name = "Foo"
directory = "apps"
azure_project = "Foo.Cloud"
azure_directory = "cloud"

[[projects]]
name = "Bar"

[[environments]]
name = "UAT"
target = "staging"

[[settings]]
name = "Timeout"
default = "30"

[[settings.projects]]
name = "Foo"
dev = "5"

[[settings]]
name = "Feature"
staging = "on"

[[settings]]
name = "Switch"
staging = "on"
aliases = { UAT = "off" }

[[settings]]
name = "Retries"
default = "3"

[[settings]]
name = "Empty"
dev = ""
"#;
}
