use std::fmt;
use std::hash::{Hash, Hasher};

/// A project name. Equality and hashing ignore ASCII case, so `Web` and
/// `WEB` name the same project.
#[derive(Debug, Clone)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for ProjectName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for ProjectName {}

impl Hash for ProjectName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A consuming project. The directory hints only matter to emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: ProjectName,
    /// Parent directory of the project folder (`""` for the working directory).
    pub directory: String,
    /// Cloud service project, if the project is deployed as a cloud role.
    pub azure_project: Option<String>,
    pub azure_directory: String,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            name: ProjectName::new(name),
            directory: String::new(),
            azure_project: None,
            azure_directory: String::new(),
        }
    }
}
