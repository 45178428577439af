use crate::runtime::RuntimeError;

/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the bot core can
/// decide which failures are rendered to the user and which are propagated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("container runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("messaging error: {0}")]
    Messaging(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
