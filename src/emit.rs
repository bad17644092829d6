//! Environment settings files: one `<appSettings>` document per project and
//! environment.
//!
//! Every project gets `Settings.{Dev,Qa,Staging,Live}.Config` plus one
//! `Settings.{alias}.Config` per declared alias, under
//! `{directory}/{project}/`. A setting with no resolved value is left out of
//! the file; a setting resolved to the empty string is written with
//! `value=""`.
//!
//! All files are rendered in memory first, so a resolution error aborts the
//! run before anything is written.

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::environment::Environment;
use crate::error::SetgenError;
use crate::project::Project;

/// A rendered settings file, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFile {
    pub project: String,
    pub environment: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Environment names a project gets files for: canonical first, then
/// aliases in declaration order.
pub fn environment_names(catalog: &Catalog) -> Vec<String> {
    Environment::ALL
        .iter()
        .map(|env| env.as_str().to_string())
        .chain(catalog.aliases().iter().map(|alias| alias.name.clone()))
        .collect()
}

pub fn file_path(project: &Project, environment: &str) -> PathBuf {
    PathBuf::from(&project.directory)
        .join(project.name.as_str())
        .join(format!("Settings.{environment}.Config"))
}

/// Render every environment file for every project.
pub fn environment_files(catalog: &Catalog) -> Result<Vec<EnvironmentFile>, SetgenError> {
    let environments = environment_names(catalog);
    let mut files = Vec::with_capacity(catalog.projects().len() * environments.len());

    for project in catalog.projects() {
        for environment in &environments {
            let mut entries = Vec::new();
            for record in catalog.settings() {
                if let Some(value) =
                    catalog.resolve_record(record, project.name.as_str(), environment)?
                {
                    entries.push((record.name.as_str(), value));
                }
            }
            files.push(EnvironmentFile {
                project: project.name.to_string(),
                environment: environment.clone(),
                path: file_path(project, environment),
                contents: render_app_settings(&entries),
            });
        }
    }
    Ok(files)
}

/// Write rendered files under `root`, creating directories as needed.
/// Returns the paths written.
pub fn write_environment_files(
    files: &[EnvironmentFile],
    root: &Path,
) -> Result<Vec<PathBuf>, SetgenError> {
    files
        .iter()
        .map(|file| write_file(root, &file.path, &file.contents))
        .collect()
}

/// Write one generated file at `root/relative`, creating its directory.
pub fn write_file(root: &Path, relative: &Path, contents: &str) -> Result<PathBuf, SetgenError> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SetgenError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(&path, contents).map_err(|e| SetgenError::IoError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "wrote generated file");
    Ok(path)
}

/// Render an `<appSettings>` document with two-space indentation.
pub fn render_app_settings(entries: &[(&str, &str)]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<appSettings>\n");
    for (key, value) in entries {
        out.push_str(&format!(
            "  <add key=\"{}\" value=\"{}\" />\n",
            escape_attribute(key),
            escape_attribute(value)
        ));
    }
    out.push_str("</appSettings>\n");
    out
}

fn escape_attribute(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            '\t' => escaped.push_str("&#x9;"),
            other => escaped.push(other),
        }
    }
    escaped
}
