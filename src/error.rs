/// Errors surfaced by the sync engine and its collaborators.
///
/// `FetchFailed` is always caught at the engine boundary and downgraded to
/// "status unknown" for the affected channels; it never aborts a refresh
/// cycle. `Config` is fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Status fetch failed for {scope}: {cause}")]
    FetchFailed { scope: String, cause: String },

    #[error("Unknown preference '{0}'")]
    UnknownPreference(String),
}
