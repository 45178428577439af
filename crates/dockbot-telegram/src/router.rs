use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use teloxide::{
    dispatching::Dispatcher,
    dptree,
    prelude::*,
    update_listeners::{webhooks, UpdateListener},
};
use tracing::{error, info};

use dockbot_core::{
    bot::ContainerBot,
    config::{Config, DeliveryMode},
    messaging::port::MessagingPort,
    runtime::ContainerRuntime,
};

use crate::handlers;
use crate::TelegramMessenger;

/// Shared, read-only state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<ContainerBot>,
}

/// Register handlers and serve updates until the process exits.
pub async fn run(cfg: Arc<Config>, runtime: Arc<dyn ContainerRuntime>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_token.clone());

    if let Ok(me) = bot.get_me().await {
        info!("dockbot started: @{}", me.username());
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState {
        bot: Arc::new(ContainerBot::new(runtime, messenger)),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .build();

    match &cfg.delivery {
        DeliveryMode::Polling => {
            info!("Starting bot with Polling");
            dispatcher.dispatch().await;
        }
        DeliveryMode::Webhook { port, .. } => {
            let (registered_url, options) = webhook_options(&cfg.delivery)?;
            let addr = options.address;

            info!("Starting bot with Webhook on port {port}");
            let (mut listener, stop_flag, app) = webhooks::axum_no_setup(options);

            let server = axum::Server::try_bind(&addr)
                .with_context(|| format!("failed to bind webhook listener on {addr}"))?;
            let stop_token = listener.stop_token();
            tokio::spawn(async move {
                if let Err(e) = server
                    .serve(app.into_make_service())
                    .with_graceful_shutdown(stop_flag)
                    .await
                {
                    error!("webhook server error: {e}");
                    stop_token.stop();
                }
            });

            bot.set_webhook(registered_url.clone())
                .await
                .with_context(|| format!("failed to register webhook {registered_url}"))?;

            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
    }

    Ok(())
}

/// URL registered with Telegram, and listener options serving the root path.
///
/// The served path stays `/` even when `PUBLIC_URL` carries a path prefix, since
/// a reverse proxy in front of the bot strips it.
fn webhook_options(delivery: &DeliveryMode) -> anyhow::Result<(reqwest::Url, webhooks::Options)> {
    let DeliveryMode::Webhook { port, .. } = delivery else {
        anyhow::bail!("webhook options requested in polling mode");
    };
    let url = delivery
        .webhook_url()
        .context("webhook mode without a webhook url")?;
    let registered = reqwest::Url::parse(&url)
        .with_context(|| format!("PUBLIC_URL is not a valid url: {url}"))?;

    let mut served = registered.clone();
    served.set_path("/");
    served.set_query(None);

    let addr = SocketAddr::from(([0, 0, 0, 0], *port));
    Ok((registered, webhooks::Options::new(addr, served)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn delivery(vars: &[(&str, &str)]) -> DeliveryMode {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
            .unwrap()
            .delivery
    }

    #[test]
    fn webhook_serves_root_path_behind_prefixed_public_url() {
        let delivery = delivery(&[
            ("TELEGRAM_TOKEN", "t"),
            ("USE_WEBHOOK", "true"),
            ("PUBLIC_URL", "https://example.com/dockbot"),
        ]);

        let (registered, options) = webhook_options(&delivery).unwrap();
        assert_eq!(registered.as_str(), "https://example.com/dockbot/");
        assert_eq!(options.url.path(), "/");
        assert_eq!(options.address, SocketAddr::from(([0, 0, 0, 0], 8443)));
    }

    #[test]
    fn webhook_with_bare_public_url() {
        let delivery = delivery(&[
            ("TELEGRAM_TOKEN", "t"),
            ("USE_WEBHOOK", "true"),
            ("PUBLIC_URL", "https://example.com"),
            ("PORT", "9000"),
        ]);

        let (registered, options) = webhook_options(&delivery).unwrap();
        assert_eq!(registered.as_str(), "https://example.com/");
        assert_eq!(options.url.path(), "/");
        assert_eq!(options.address.port(), 9000);
    }

    #[test]
    fn invalid_public_url_is_rejected() {
        let delivery = DeliveryMode::Webhook {
            public_url: "not a url".to_string(),
            port: 8443,
        };
        assert!(webhook_options(&delivery).is_err());
        assert!(webhook_options(&DeliveryMode::Polling).is_err());
    }
}
