use thiserror::Error;

/// Failures the core can report to the boundary layer. Nothing in here is
/// transient, so nothing is ever retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("a project named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("project name cannot be empty")]
    EmptyName,
    #[error("project \"{0}\" is already running")]
    AlreadyRunning(String),
    #[error("project \"{0}\" isn't running")]
    NotRunning(String),
    #[error("no project matching \"{0}\" was found")]
    NotFound(String),
    #[error("multiple projects match \"{0}\"")]
    Ambiguous(String),
}
