//! Docker Engine adapter (bollard).
//!
//! Implements the `dockbot-core` ContainerRuntime port. The daemon resolves full
//! ids, short ids and names itself; we inspect first so a missing container is
//! reported as `NotFound` rather than as a failed stop.

use async_trait::async_trait;
use bollard::{
    container::{
        InspectContainerOptions, ListContainersOptions, RestartContainerOptions,
        StopContainerOptions,
    },
    models::{ContainerInspectResponse, ContainerSummary},
    Docker,
};
use tracing::debug;

use dockbot_core::runtime::{short_id, Container, ContainerRuntime, RuntimeError, RuntimeResult};

/// Grace period before the daemon kills a container (Docker CLI default).
const STOP_TIMEOUT_SECS: i64 = 10;

#[derive(Clone, Debug)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using `DOCKER_HOST` or the platform's default socket.
    pub fn connect() -> RuntimeResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;
        Ok(Self { docker })
    }

    /// Look the container up by id, short id or name.
    async fn resolve(&self, id: &str) -> RuntimeResult<ContainerInspectResponse> {
        self.docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(map_err)
    }

    async fn resolve_id(&self, id: &str) -> RuntimeResult<String> {
        let inspected = self.resolve(id).await?;
        Ok(inspected.id.unwrap_or_else(|| id.to_string()))
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self) -> RuntimeResult<Vec<Container>> {
        let summaries = self
            .docker
            .list_containers(Some(ListContainersOptions::<String> {
                all: false,
                ..Default::default()
            }))
            .await
            .map_err(map_err)?;

        Ok(summaries.into_iter().map(container_from_summary).collect())
    }

    async fn stop_container(&self, id: &str) -> RuntimeResult<()> {
        let full_id = self.resolve_id(id).await?;
        debug!(container = %id, full_id = %full_id, "stopping container");
        self.docker
            .stop_container(
                &full_id,
                Some(StopContainerOptions {
                    t: STOP_TIMEOUT_SECS,
                }),
            )
            .await
            .map_err(map_err)
    }

    async fn restart_container(&self, id: &str) -> RuntimeResult<()> {
        let full_id = self.resolve_id(id).await?;
        debug!(container = %id, full_id = %full_id, "restarting container");
        self.docker
            .restart_container(
                &full_id,
                Some(RestartContainerOptions {
                    t: STOP_TIMEOUT_SECS as isize,
                }),
            )
            .await
            .map_err(map_err)
    }

    async fn container_name(&self, id: &str) -> RuntimeResult<String> {
        let inspected = self.resolve(id).await?;
        Ok(inspected
            .name
            .as_deref()
            .map(display_name)
            .unwrap_or_else(|| short_id(inspected.id.as_deref().unwrap_or(id))))
    }
}

/// Docker reports names with a leading `/`.
fn display_name(raw: &str) -> String {
    raw.trim_start_matches('/').to_string()
}

fn container_from_summary(s: ContainerSummary) -> Container {
    let id = s.id.unwrap_or_default();
    let name = s
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|n| display_name(n))
        .unwrap_or_else(|| short_id(&id));
    let state = s.state.unwrap_or_default();
    Container::new(id, name, state)
}

fn map_err(e: bollard::errors::Error) -> RuntimeError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => RuntimeError::NotFound(message),
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => RuntimeError::Api(format!("{status_code}: {message}")),
        other => RuntimeError::Api(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "9c3f2b1a7d4e5f60718293a4b5c6d7e8f9012345678901234567890abcdef12";

    #[test]
    fn summary_maps_name_without_slash() {
        let c = container_from_summary(ContainerSummary {
            id: Some(ID.to_string()),
            names: Some(vec!["/web".to_string(), "/alias".to_string()]),
            state: Some("running".to_string()),
            ..Default::default()
        });
        assert_eq!(c.id, ID);
        assert_eq!(c.short_id, "9c3f2b1a7d4e");
        assert_eq!(c.name, "web");
        assert!(c.is_running());
    }

    #[test]
    fn summary_without_names_falls_back_to_short_id() {
        let c = container_from_summary(ContainerSummary {
            id: Some(ID.to_string()),
            names: None,
            ..Default::default()
        });
        assert_eq!(c.name, "9c3f2b1a7d4e");
        assert_eq!(c.state, "");
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let err = map_err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message: "No such container: web".to_string(),
        });
        assert!(matches!(err, RuntimeError::NotFound(_)));
        assert_eq!(err.to_string(), "No such container: web");
    }

    #[test]
    fn other_server_errors_map_to_api() {
        let err = map_err(bollard::errors::Error::DockerResponseServerError {
            status_code: 500,
            message: "driver failed".to_string(),
        });
        assert!(matches!(err, RuntimeError::Api(_)));
        assert_eq!(err.to_string(), "500: driver failed");
    }

    #[test]
    fn display_name_strips_leading_slash() {
        assert_eq!(display_name("/db"), "db");
        assert_eq!(display_name("db"), "db");
    }
}
