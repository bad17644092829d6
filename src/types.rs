/// A generator operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write every environment file and compute the cloud service settings.
    Generate,
    /// Resolve one setting for a project and environment.
    Get {
        setting: String,
        project: String,
        environment: String,
    },
    /// Resolve every setting for a project and environment.
    List {
        project: String,
        environment: String,
    },
}
