//! Typed accessor classes for consuming .NET projects.
//!
//! Two optional C# sources are generated from the catalog:
//!
//! - the **settings class** declares one typed `Setting<T>` field per
//!   setting (or a plain name constant for `string` settings), including the
//!   parse logic for nullable and `list<T>` types;
//! - the **static class** exposes one read-only property per setting that
//!   looks the value up through the settings class at run time.
//!
//! Settings with `autogen = false` are left out of both. The static class
//! refers to the settings class, so it can only be declared alongside it.

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::error::SetgenError;
use crate::record::SettingRecord;

const INDENT: &str = "    ";

/// Which of the two accessor classes a declaration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Settings,
    Static,
}

impl AccessorKind {
    pub fn default_file_name(self) -> &'static str {
        match self {
            AccessorKind::Settings => "Settings.cs",
            AccessorKind::Static => "ConfigurationManager.cs",
        }
    }
}

/// Where and how to emit one accessor class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorClass {
    pub kind: AccessorKind,
    /// Output directory, relative to the output root.
    pub directory: String,
    /// File name, always ending in `.cs`.
    pub file_name: String,
    pub namespace: String,
    /// Static class only: skip the cloud role settings source.
    pub exclude_azure: bool,
}

impl AccessorClass {
    pub fn new(kind: AccessorKind, namespace: &str, file_name: Option<&str>) -> Self {
        let mut file_name = file_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(kind.default_file_name())
            .to_string();
        if !file_name.ends_with(".cs") {
            file_name.push_str(".cs");
        }
        Self {
            kind,
            directory: String::new(),
            file_name,
            namespace: namespace.to_string(),
            exclude_azure: false,
        }
    }

    /// `Settings.cs` → `Settings`, with the first letter capitalised.
    pub fn class_name(&self) -> String {
        capitalise_first(self.file_name.trim_end_matches(".cs"))
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.directory).join(&self.file_name)
    }
}

/// A rendered accessor source file, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorFile {
    pub kind: AccessorKind,
    pub path: PathBuf,
    pub contents: String,
}

/// Render every accessor class the catalog declares.
pub fn accessor_files(catalog: &Catalog) -> Result<Vec<AccessorFile>, SetgenError> {
    let mut files = Vec::new();
    let settings_class = catalog.settings_class();
    if let Some(class) = settings_class {
        files.push(AccessorFile {
            kind: AccessorKind::Settings,
            path: class.path(),
            contents: render_settings_class(catalog.settings(), class),
        });
    }
    if let Some(static_class) = catalog.static_class() {
        let class = settings_class.ok_or_else(|| {
            SetgenError::ConfigurationError(
                "the static class requires a settings class to be declared".into(),
            )
        })?;
        files.push(AccessorFile {
            kind: AccessorKind::Static,
            path: static_class.path(),
            contents: render_static_class(catalog.settings(), static_class, class),
        });
    }
    Ok(files)
}

/// Write rendered accessor files under `root`. Returns the paths written.
pub fn write_accessor_files(
    files: &[AccessorFile],
    root: &Path,
) -> Result<Vec<PathBuf>, SetgenError> {
    files
        .iter()
        .map(|file| crate::emit::write_file(root, &file.path, &file.contents))
        .collect()
}

/// Property name for a setting: `:` and `.` removed, first letter capitalised.
pub fn property_name(setting: &str) -> String {
    let stripped: String = setting.chars().filter(|c| *c != ':' && *c != '.').collect();
    capitalise_first(&stripped)
}

pub fn render_settings_class(settings: &[SettingRecord], class: &AccessorClass) -> String {
    let mut out = String::new();
    for using in [
        "System",
        "System.Collections.Generic",
        "System.Linq",
        "System.Text",
        "Entelect.Settings",
    ] {
        out.push_str(&format!("using {using};\n"));
    }
    out.push_str(&format!("namespace {}\n{{\n", class.namespace));
    out.push_str(&format!(
        "{INDENT}public static partial class {}\n{INDENT}{{\n",
        class.class_name()
    ));
    for record in settings.iter().filter(|s| s.meta.autogenerate) {
        out.push_str(&setting_field(record));
    }
    out.push_str(&format!("{INDENT}}}\n}}\n"));
    out
}

pub fn render_static_class(
    settings: &[SettingRecord],
    class: &AccessorClass,
    settings_class: &AccessorClass,
) -> String {
    let i2 = INDENT.repeat(2);
    let i3 = INDENT.repeat(3);
    let i4 = INDENT.repeat(4);
    let name = class.class_name();

    let mut out = String::new();
    for using in ["System", "System.Collections.Generic", "System.Linq", "Entelect.Settings"] {
        out.push_str(&format!("using {using};\n"));
    }
    if !class.exclude_azure {
        out.push_str("using Entelect.Azure;\n");
        out.push_str("using Microsoft.WindowsAzure.ServiceRuntime;\n");
    }
    out.push_str(&format!("using {};\n", settings_class.namespace));
    out.push_str(&format!("namespace {}\n{{\n", class.namespace));
    out.push_str(&format!("{INDENT}public static partial class {name}\n{INDENT}{{\n"));
    out.push_str(&format!("{i2}public static ISettingsSource Settings {{ get; set; }}\n\n"));

    out.push_str(&format!("{i2}static {name}()\n{i2}{{\n"));
    if class.exclude_azure {
        out.push_str(&format!("{i3}Settings = new AppSettingsSettingsSource();\n"));
    } else {
        out.push_str(&format!("{i3}bool useAzureSettings;\n"));
        out.push_str(&format!("{i3}try\n{i3}{{\n"));
        out.push_str(&format!("{i4}useAzureSettings = RoleEnvironment.IsAvailable;\n"));
        out.push_str(&format!("{i3}}}\n{i3}catch\n{i3}{{\n"));
        out.push_str(&format!("{i4}useAzureSettings = false;\n"));
        out.push_str(&format!("{i3}}}\n"));
        out.push_str(&format!(
            "{i3}Settings = useAzureSettings ? (ISettingsSource) new AzureSettingsSource() : new AppSettingsSettingsSource();\n"
        ));
    }
    out.push_str(&format!("{i2}}}\n\n"));

    out.push_str(&format!(
        "{i2}public static DeploymentEnvironment Environment {{ get {{ return Settings.Environment; }} }}\n\n"
    ));
    out.push_str(&format!("{i2}private static string GetSetting(string settingName)\n{i2}{{\n"));
    out.push_str(&format!("{i3}return Settings.GetSetting(settingName);\n{i2}}}\n\n"));
    out.push_str(&format!("{i2}public static T GetSetting<T>(Setting<T> setting)\n{i2}{{\n"));
    out.push_str(&format!("{i3}return Settings.GetSetting(setting);\n{i2}}}\n\n"));

    let holder = settings_class.class_name();
    for record in settings.iter().filter(|s| s.meta.autogenerate) {
        let property = property_name(&record.name);
        out.push_str(&format!(
            "{i2}public static {} {property} {{ get {{ return GetSetting({holder}.{property}); }} }}\n\n",
            record.meta.value_type
        ));
    }
    out.push_str(&format!("{INDENT}}}\n}}\n"));
    out
}

/// One field of the settings class.
fn setting_field(record: &SettingRecord) -> String {
    let i2 = INDENT.repeat(2);
    let ty = record.meta.value_type.as_str();
    let property = property_name(&record.name);
    let key = string_literal(&record.name);

    if ty.eq_ignore_ascii_case("string") {
        return format!("{i2}public static string {property} = {key};\n");
    }

    let head = format!("{i2}public static Setting<{ty}> {property} = new Setting<{ty}>(x =>");

    if record.meta.is_list() {
        let inner = list_item_type(ty);
        let delimiter = string_literal(record.meta.delimiter.as_deref().unwrap_or_default());
        let split = format!(
            "x.GetSetting({key}).Split(new[] {{ {delimiter} }}, StringSplitOptions.RemoveEmptyEntries)"
        );
        if inner.eq_ignore_ascii_case("string") {
            return format!("{head} new {ty}({split}));\n");
        }
        if let Some(base) = nullable_base(inner) {
            let i3 = INDENT.repeat(3);
            let i4 = INDENT.repeat(4);
            let i5 = INDENT.repeat(5);
            let mut out = format!("{head} {{\n");
            out.push_str(&format!("{i3}string[] values = {split};\n"));
            out.push_str(&format!("{i3}{ty} results = new {ty}();\n"));
            out.push_str(&format!("{i3}foreach (string value in values)\n{i3}{{\n"));
            out.push_str(&format!(
                "{i4}if (string.IsNullOrWhiteSpace(value) || value.Equals(\"null\", StringComparison.OrdinalIgnoreCase))\n{i4}{{\n"
            ));
            out.push_str(&format!("{i5}results.Add(null);\n{i5}continue;\n{i4}}}\n"));
            out.push_str(&format!("{i4}{base} parsed;\n"));
            out.push_str(&format!("{i4}if (!{base}.TryParse(value, out parsed))\n"));
            out.push_str(&format!("{i5}{}\n", conversion_error(ty)));
            out.push_str(&format!("{i4}results.Add(parsed);\n{i3}}}\n"));
            out.push_str(&format!("{i3}return results;\n{i2}}});\n"));
            return out;
        }
        return format!("{head} new {ty}({split}.Select({inner}.Parse)));\n");
    }

    if let Some(base) = nullable_base(ty) {
        let i3 = INDENT.repeat(3);
        let i4 = INDENT.repeat(4);
        let mut out = format!("{head} {{\n");
        out.push_str(&format!("{i3}string value = x.GetSetting({key});\n"));
        out.push_str(&format!(
            "{i3}if (string.IsNullOrWhiteSpace(value) || value.Equals(\"null\", StringComparison.OrdinalIgnoreCase))\n"
        ));
        out.push_str(&format!("{i4}return null;\n"));
        out.push_str(&format!("{i3}{base} parsed;\n"));
        out.push_str(&format!("{i3}if ({base}.TryParse(value, out parsed))\n"));
        out.push_str(&format!("{i4}return parsed;\n"));
        out.push_str(&format!("{i3}{}\n", conversion_error(ty)));
        out.push_str(&format!("{i2}}});\n"));
        return out;
    }

    format!("{head} {ty}.Parse(x.GetSetting({key})));\n")
}

/// `list<int?>` → `int?`. Only called for types that start with `list<`.
fn list_item_type(ty: &str) -> &str {
    let inner = ty.get(5..).unwrap_or_default();
    inner.strip_suffix('>').unwrap_or(inner).trim()
}

/// Base type of a nullable value type: `int?` or `Nullable<int>` → `int`.
fn nullable_base(ty: &str) -> Option<&str> {
    if let Some(base) = ty.strip_suffix('?') {
        return Some(base.trim());
    }
    let prefix = ty.get(..9)?;
    if prefix.eq_ignore_ascii_case("nullable<") {
        return ty[9..].strip_suffix('>').map(str::trim);
    }
    None
}

fn conversion_error(ty: &str) -> String {
    format!(
        "throw new ArgumentException(string.Format(\"Value '{{0}}' could not be converted to type '{ty}'\", value));"
    )
}

fn string_literal(raw: &str) -> String {
    let mut literal = String::with_capacity(raw.len() + 2);
    literal.push('"');
    for c in raw.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            other => literal.push(other),
        }
    }
    literal.push('"');
    literal
}

fn capitalise_first(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogInput;
    use crate::fixtures::test::{sample_input, setting};
    use crate::record::{Scope, ValueSet};

    fn typed(name: &str, ty: &str, delimiter: Option<&str>) -> SettingRecord {
        let mut record = setting(name, ValueSet::new(Scope::Global));
        record.meta.value_type = ty.into();
        record.meta.delimiter = delimiter.map(str::to_string);
        record
    }

    fn settings_class() -> AccessorClass {
        AccessorClass::new(AccessorKind::Settings, "Acme.Config", None)
    }

    fn with_classes(static_class: bool) -> CatalogInput {
        let mut input = sample_input();
        let mut settings = settings_class();
        settings.directory = "generated".into();
        input.settings_class = Some(settings);
        if static_class {
            input.static_class = Some(AccessorClass::new(
                AccessorKind::Static,
                "Acme.App",
                Some("AppSettings"),
            ));
        }
        input
    }

    #[test]
    fn file_name_gets_extension_and_default() {
        assert_eq!(settings_class().file_name, "Settings.cs");
        let named = AccessorClass::new(AccessorKind::Static, "N", Some("appConfig"));
        assert_eq!(named.file_name, "appConfig.cs");
        assert_eq!(named.class_name(), "AppConfig");
        let fallback = AccessorClass::new(AccessorKind::Static, "N", None);
        assert_eq!(fallback.file_name, "ConfigurationManager.cs");
    }

    #[test]
    fn property_names_drop_separators() {
        assert_eq!(property_name("smtp:host.name"), "Smtphostname");
        assert_eq!(property_name("timeout"), "Timeout");
        assert_eq!(property_name(""), "");
    }

    #[test]
    fn string_setting_is_a_name_constant() {
        let field = setting_field(&typed("Api.Url", "String", None));
        assert_eq!(field, "        public static string ApiUrl = \"Api.Url\";\n");
    }

    #[test]
    fn plain_type_uses_parse() {
        let field = setting_field(&typed("Timeout", "int", None));
        assert_eq!(
            field,
            "        public static Setting<int> Timeout = new Setting<int>(x => int.Parse(x.GetSetting(\"Timeout\")));\n"
        );
    }

    #[test]
    fn nullable_type_returns_null_for_blank() {
        for ty in ["int?", "Nullable<int>"] {
            let field = setting_field(&typed("Port", ty, None));
            assert!(field.contains("string value = x.GetSetting(\"Port\");"), "{ty}");
            assert!(field.contains("return null;"), "{ty}");
            assert!(field.contains("if (int.TryParse(value, out parsed))"), "{ty}");
            assert!(field.ends_with("        });\n"), "{ty}");
        }
    }

    #[test]
    fn string_list_splits_on_delimiter() {
        let field = setting_field(&typed("Hosts", "List<string>", Some(";")));
        assert!(field.contains(
            "new List<string>(x.GetSetting(\"Hosts\").Split(new[] { \";\" }, StringSplitOptions.RemoveEmptyEntries))"
        ));
    }

    #[test]
    fn typed_list_parses_each_item() {
        let field = setting_field(&typed("Ports", "list<int>", Some(",")));
        assert!(field.contains("new[] { \",\" }"));
        assert!(field.ends_with(".Select(int.Parse)));\n"));
    }

    #[test]
    fn nullable_list_keeps_null_items() {
        let field = setting_field(&typed("Limits", "list<int?>", Some("|")));
        assert!(field.contains("results.Add(null);"));
        assert!(field.contains("continue;"));
        assert!(field.contains("if (!int.TryParse(value, out parsed))"));
        assert!(field.contains("return results;"));
    }

    #[test]
    fn names_are_escaped_in_literals() {
        let field = setting_field(&typed("Quote\"d", "string", None));
        assert!(field.contains("= \"Quote\\\"d\";"));
    }

    #[test]
    fn settings_class_skips_non_generated_settings() {
        let hidden = {
            let mut record = typed("Hidden", "int", None);
            record.meta.autogenerate = false;
            record
        };
        let source = render_settings_class(
            &[typed("Timeout", "int", None), hidden],
            &settings_class(),
        );
        assert!(source.starts_with("using System;\n"));
        assert!(source.contains("namespace Acme.Config\n{\n    public static partial class Settings\n    {\n"));
        assert!(source.contains("Timeout"));
        assert!(!source.contains("Hidden"));
        assert!(source.ends_with("    }\n}\n"));
    }

    #[test]
    fn static_class_delegates_to_settings_class() {
        let static_class = AccessorClass::new(AccessorKind::Static, "Acme.App", None);
        let source = render_static_class(
            &[typed("Timeout", "int", None)],
            &static_class,
            &settings_class(),
        );
        assert!(source.contains("using Acme.Config;\n"));
        assert!(source.contains("public static partial class ConfigurationManager"));
        assert!(source.contains("RoleEnvironment.IsAvailable"));
        assert!(source.contains(
            "public static int Timeout { get { return GetSetting(Settings.Timeout); } }"
        ));
    }

    #[test]
    fn static_class_without_cloud_source() {
        let mut static_class = AccessorClass::new(AccessorKind::Static, "Acme.App", None);
        static_class.exclude_azure = true;
        let source = render_static_class(&[], &static_class, &settings_class());
        assert!(!source.contains("Microsoft.WindowsAzure"));
        assert!(source.contains("Settings = new AppSettingsSettingsSource();"));
    }

    #[test]
    fn no_declared_classes_no_files() {
        let catalog = Catalog::build(sample_input()).unwrap();
        assert!(accessor_files(&catalog).unwrap().is_empty());
    }

    #[test]
    fn declared_classes_render_in_order() {
        let catalog = Catalog::build(with_classes(true)).unwrap();
        let files = accessor_files(&catalog).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, PathBuf::from("generated/Settings.cs"));
        assert_eq!(files[1].path, PathBuf::from("AppSettings.cs"));
        assert!(files[1].contents.contains("GetSetting(Settings.Retries)"));
    }

    #[test]
    fn static_class_alone_rejected_at_build() {
        let mut input = sample_input();
        input.static_class = Some(AccessorClass::new(AccessorKind::Static, "Acme.App", None));
        let err = Catalog::build(input).unwrap_err();
        assert!(matches!(err, SetgenError::ConfigurationError(_)));
    }

    #[test]
    fn write_places_files_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::build(with_classes(false)).unwrap();
        let files = accessor_files(&catalog).unwrap();
        let written = write_accessor_files(&files, dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("generated/Settings.cs")]);
        let source = std::fs::read_to_string(&written[0]).unwrap();
        assert!(source.contains("public static string Feature = \"Feature\";"));
    }
}
