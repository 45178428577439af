use std::sync::Arc;

use dockbot_core::{config::Config, runtime::ContainerRuntime};
use dockbot_docker::DockerRuntime;

#[tokio::main]
async fn main() -> Result<(), dockbot_core::Error> {
    dockbot_core::logging::init("dockbot")?;

    let cfg = Arc::new(Config::load()?);

    let runtime: Arc<dyn ContainerRuntime> = Arc::new(DockerRuntime::connect()?);

    dockbot_telegram::router::run(cfg, runtime)
        .await
        .map_err(|e| dockbot_core::Error::External(format!("telegram bot failed: {e:#}")))?;

    Ok(())
}
