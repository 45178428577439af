//! Container runtime port.
//!
//! The Docker adapter lives in `dockbot-docker`; the bot only sees this trait.

use async_trait::async_trait;

/// Number of id characters shown to users and carried in callback tokens.
pub const SHORT_ID_LEN: usize = 12;

/// Point-in-time snapshot of a container as reported by the runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub short_id: String,
    pub name: String,
    pub state: String,
}

impl Container {
    pub fn new(id: impl Into<String>, name: impl Into<String>, state: impl Into<String>) -> Self {
        let id = id.into();
        let short_id = short_id(&id);
        Self {
            id,
            short_id,
            name: name.into(),
            state: state.into(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Abbreviated form of a container id.
pub fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("cannot connect to container runtime: {0}")]
    Connection(String),

    /// Carries the runtime's own message, e.g. `No such container: web`.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Api(String),
}

pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Synchronous-per-call facade over a container runtime. No caching, no retries.
///
/// `id` arguments accept a full id, a short id or a container name.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// All currently running containers.
    async fn list_containers(&self) -> RuntimeResult<Vec<Container>>;

    async fn stop_container(&self, id: &str) -> RuntimeResult<()>;

    /// Not bound to any chat command yet.
    async fn restart_container(&self, id: &str) -> RuntimeResult<()>;

    /// Not bound to any chat command yet.
    async fn container_name(&self, id: &str) -> RuntimeResult<String>;
}
