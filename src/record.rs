//! Normalized setting values.
//!
//! A global setting and a project override have the same shape: four
//! canonical slots, a default, and one slot per declared alias. Both are a
//! [`ValueSet`]; the [`Scope`] tag tells them apart.
//!
//! Every slot is an `Option<String>`. `None` means "nothing configured" and
//! triggers fallback; `Some("")` is a configured empty value and never does.

use crate::environment::Environment;
use crate::project::ProjectName;

/// Whether a [`ValueSet`] is the global definition or a project override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Project(ProjectName),
}

/// The per-record value of one declared environment alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasValue {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet {
    pub scope: Scope,
    pub dev: Option<String>,
    pub qa: Option<String>,
    pub staging: Option<String>,
    pub live: Option<String>,
    pub default: Option<String>,
    pub aliases: Vec<AliasValue>,
}

impl ValueSet {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            dev: None,
            qa: None,
            staging: None,
            live: None,
            default: None,
            aliases: Vec::new(),
        }
    }

    /// Value of a canonical slot.
    pub fn get(&self, env: Environment) -> Option<&str> {
        match env {
            Environment::Dev => self.dev.as_deref(),
            Environment::Qa => self.qa.as_deref(),
            Environment::Staging => self.staging.as_deref(),
            Environment::Live => self.live.as_deref(),
        }
    }

    pub fn slot_mut(&mut self, env: Environment) -> &mut Option<String> {
        match env {
            Environment::Dev => &mut self.dev,
            Environment::Qa => &mut self.qa,
            Environment::Staging => &mut self.staging,
            Environment::Live => &mut self.live,
        }
    }

    /// Exact-name lookup of this record's slot for an alias.
    pub fn alias(&self, name: &str) -> Option<&AliasValue> {
        self.aliases.iter().find(|slot| slot.name == name)
    }

    pub fn with(mut self, env: Environment, value: &str) -> Self {
        *self.slot_mut(env) = Some(value.to_string());
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn with_alias(mut self, name: &str, value: Option<&str>) -> Self {
        self.aliases.push(AliasValue {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
        self
    }
}

/// Emission-only metadata. Resolution never reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingMeta {
    /// Declared value type, e.g. `string`, `int?`, `list<int>`.
    pub value_type: String,
    /// Separator for `list<...>` types.
    pub delimiter: Option<String>,
    pub autogenerate: bool,
    /// Leave out of cloud service configurations and definitions.
    pub azure_exclude: bool,
    /// Leave out of the cloud service definition only.
    pub azure_definition_exclude: bool,
}

impl Default for SettingMeta {
    fn default() -> Self {
        Self {
            value_type: "string".into(),
            delimiter: None,
            autogenerate: true,
            azure_exclude: false,
            azure_definition_exclude: false,
        }
    }
}

impl SettingMeta {
    pub fn is_list(&self) -> bool {
        self.value_type
            .get(..5)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("list<"))
    }
}

/// The global definition of one named setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingRecord {
    pub name: String,
    pub values: ValueSet,
    pub meta: SettingMeta,
}

impl SettingRecord {
    pub fn new(name: &str, values: ValueSet) -> Self {
        Self {
            name: name.to_string(),
            values,
            meta: SettingMeta::default(),
        }
    }
}
