use std::path::PathBuf;

use toml::Value;

use crate::catalog::Catalog;
use crate::config::{GeneratorConfig, OptionsInput, resolve_options};
use crate::error::SetgenError;
use crate::ops::{self, RunResult};
use crate::source;
use crate::types::Action;

/// Entry point for a generation run.
pub struct Setgen;

impl Setgen {
    pub fn builder() -> SetgenBuilder {
        SetgenBuilder::new()
    }
}

/// Builder for loading a catalog and running [`Action`]s against it.
///
/// Values set here take precedence over `SETGEN_*` environment variables and
/// the options file (see [`config`](crate::config)).
pub struct SetgenBuilder {
    catalog: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    strict: Option<bool>,
    options_file: Option<PathBuf>,
    env_enabled: bool,
}

impl SetgenBuilder {
    fn new() -> Self {
        Self {
            catalog: None,
            output_dir: None,
            strict: None,
            options_file: Some(PathBuf::from("setgen.toml")),
            env_enabled: true,
        }
    }

    /// Path to the settings catalog (default: `settings.toml`).
    pub fn catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog = Some(path.into());
        self
    }

    /// Directory generated files are written under (default: `.`).
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in the catalog produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = Some(strict);
        self
    }

    /// Override the options file location (default: `setgen.toml`).
    pub fn options_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.options_file = Some(path.into());
        self
    }

    /// Do not read an options file.
    pub fn no_options_file(mut self) -> Self {
        self.options_file = None;
        self
    }

    /// Ignore `SETGEN_*` environment variables.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Resolve the effective generator options through all layers.
    pub fn options(&self) -> Result<GeneratorConfig, SetgenError> {
        let mut overrides = Vec::new();
        if let Some(catalog) = &self.catalog {
            overrides.push(("catalog", path_value("catalog", catalog)?));
        }
        if let Some(output_dir) = &self.output_dir {
            overrides.push(("output_dir", path_value("output_dir", output_dir)?));
        }
        if let Some(strict) = self.strict {
            overrides.push(("strict", Value::Boolean(strict)));
        }
        resolve_options(OptionsInput {
            overrides,
            file: self.options_file.as_deref(),
            env: self.env_enabled,
        })
    }

    /// Load, validate and normalize the catalog.
    pub fn load(&self) -> Result<Catalog, SetgenError> {
        let options = self.options()?;
        self.load_with(&options)
    }

    fn load_with(&self, options: &GeneratorConfig) -> Result<Catalog, SetgenError> {
        tracing::info!(catalog = %options.catalog.display(), strict = options.strict, "loading catalog");
        let catalog = source::load_catalog(&options.catalog, options.strict)?;
        tracing::info!(
            settings = catalog.settings().len(),
            projects = catalog.projects().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Handle an [`Action`] and print the result to stdout.
    pub fn handle_and_print(self, action: &Action) -> Result<(), SetgenError> {
        let result = self.handle(action)?;
        println!("{result}");
        Ok(())
    }

    /// Handle an [`Action`] (generate / get / list).
    pub fn handle(self, action: &Action) -> Result<RunResult, SetgenError> {
        let options = self.options()?;
        let catalog = self.load_with(&options)?;
        match action {
            Action::Generate => ops::generate(&catalog, &options.output_dir),
            Action::Get {
                setting,
                project,
                environment,
            } => ops::get_value(&catalog, setting, project, environment),
            Action::List {
                project,
                environment,
            } => ops::list_values(&catalog, project, environment),
        }
    }
}

/// Options travel through TOML values, which only hold UTF-8.
fn path_value(key: &str, path: &std::path::Path) -> Result<Value, SetgenError> {
    path.to_str()
        .map(|s| Value::String(s.to_string()))
        .ok_or_else(|| SetgenError::InvalidValue {
            key: key.to_string(),
            reason: format!("path {} is not valid UTF-8", path.display()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::SAMPLE_TOML;
    use std::path::Path;

    fn builder_for(dir: &Path) -> SetgenBuilder {
        let catalog = dir.join("settings.toml");
        std::fs::write(&catalog, SAMPLE_TOML).unwrap();
        Setgen::builder()
            .no_env()
            .no_options_file()
            .catalog(catalog)
            .output_dir(dir.join("out"))
    }

    #[test]
    fn builder_values_reach_options() {
        let options = Setgen::builder()
            .no_env()
            .no_options_file()
            .catalog("conf/catalog.toml")
            .strict(false)
            .options()
            .unwrap();
        assert_eq!(options.catalog, PathBuf::from("conf/catalog.toml"));
        assert!(!options.strict);
        assert_eq!(options.output_dir, PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let catalog = PathBuf::from(OsStr::from_bytes(b"cat\xffalog.toml"));
        let result = Setgen::builder()
            .no_env()
            .no_options_file()
            .catalog(catalog)
            .options();
        match result {
            Err(SetgenError::InvalidValue { key, .. }) => assert_eq!(key, "catalog"),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn options_file_supplies_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("catalog.toml");
        std::fs::write(&catalog, SAMPLE_TOML).unwrap();
        let options_file = dir.path().join("setgen.toml");
        std::fs::write(
            &options_file,
            format!("catalog = {:?}\n", catalog.to_string_lossy()),
        )
        .unwrap();
        let loaded = Setgen::builder()
            .no_env()
            .options_file(&options_file)
            .load()
            .unwrap();
        assert_eq!(loaded.settings().len(), 5);
    }

    #[test]
    fn load_reads_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = builder_for(dir.path()).load().unwrap();
        assert_eq!(catalog.resolve("Timeout", "Foo", "Dev").unwrap(), Some("5"));
    }

    #[test]
    fn handle_get() {
        let dir = tempfile::tempdir().unwrap();
        let result = builder_for(dir.path())
            .handle(&Action::Get {
                setting: "Switch".into(),
                project: "Bar".into(),
                environment: "UAT".into(),
            })
            .unwrap();
        assert_eq!(result.to_string(), "Switch = off");
    }

    #[test]
    fn handle_generate_writes_under_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        builder_for(dir.path()).handle(&Action::Generate).unwrap();
        let dev = dir.path().join("out/apps/Foo/Settings.Dev.Config");
        let content = std::fs::read_to_string(dev).unwrap();
        assert!(content.contains(r#"key="Timeout" value="5""#));
        assert!(dir.path().join("out/Bar/Settings.UAT.Config").exists());
    }

    #[test]
    fn missing_catalog_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Setgen::builder()
            .no_env()
            .no_options_file()
            .catalog(dir.path().join("absent.toml"))
            .load();
        assert!(matches!(result, Err(SetgenError::IoError { .. })));
    }

    #[test]
    fn failed_resolution_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = dir.path().join("settings.toml");
        // Undeclared project override makes the catalog invalid before any write.
        std::fs::write(
            &catalog,
            "[[projects]]\nname = \"Web\"\n\n[[settings]]\nname = \"A\"\n\n[[settings.projects]]\nname = \"Ghost\"\n",
        )
        .unwrap();
        let result = Setgen::builder()
            .no_env()
            .no_options_file()
            .catalog(&catalog)
            .output_dir(dir.path().join("out"))
            .handle(&Action::Generate);
        assert!(matches!(result, Err(SetgenError::ConfigurationError(_))));
        assert!(!dir.path().join("out").exists());
    }
}
