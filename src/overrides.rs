//! Project overrides keyed by `(setting name, project name)`.
//!
//! Setting names compare exactly; project names compare case-insensitively
//! through [`ProjectName`]. A pair may be declared once.

use std::collections::HashMap;

use crate::error::SetgenError;
use crate::project::ProjectName;
use crate::record::{Scope, ValueSet};

#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    by_key: HashMap<(String, ProjectName), ValueSet>,
    order: Vec<(String, ProjectName)>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an override. The value set must carry a project scope.
    pub fn insert(&mut self, setting: &str, values: ValueSet) -> Result<(), SetgenError> {
        let Scope::Project(project) = &values.scope else {
            return Err(SetgenError::ConfigurationError(format!(
                "override for setting '{setting}' has no project scope"
            )));
        };
        let key = (setting.to_string(), project.clone());
        if self.by_key.contains_key(&key) {
            return Err(SetgenError::DuplicateOverride {
                setting: setting.to_string(),
                project: project.to_string(),
            });
        }
        self.order.push(key.clone());
        self.by_key.insert(key, values);
        Ok(())
    }

    pub fn get(&self, setting: &str, project: &str) -> Option<&ValueSet> {
        self.by_key
            .get(&(setting.to_string(), ProjectName::new(project)))
    }

    /// Overrides declared for one setting, in declaration order.
    pub fn for_setting<'a>(&'a self, setting: &'a str) -> impl Iterator<Item = &'a ValueSet> + 'a {
        self.order
            .iter()
            .filter(move |(name, _)| name == setting)
            .filter_map(|key| self.by_key.get(key))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
