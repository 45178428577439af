use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_WEBHOOK_PORT: u16 = 8443;

/// How Telegram updates reach the bot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryMode {
    /// The bot pulls updates itself; no listening port.
    Polling,
    /// Telegram pushes updates to `<public_url>/`, served on `0.0.0.0:<port>`.
    Webhook { public_url: String, port: u16 },
}

impl DeliveryMode {
    /// URL registered with Telegram as the delivery target.
    pub fn webhook_url(&self) -> Option<String> {
        match self {
            DeliveryMode::Polling => None,
            DeliveryMode::Webhook { public_url, .. } => Some(format!("{public_url}/")),
        }
    }
}

/// Typed configuration, read from the process environment.
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_token: String,
    pub delivery: DeliveryMode,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(env_str)
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_token = lookup("TELEGRAM_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config(
                "Telegram bot token not found. Please set the TELEGRAM_TOKEN environment variable."
                    .to_string(),
            )
        })?;

        let use_webhook = lookup("USE_WEBHOOK")
            .map(|s| s.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let port = match lookup("PORT").and_then(non_empty) {
            None => DEFAULT_WEBHOOK_PORT,
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("PORT must be a valid port number, got {raw:?}"))
            })?,
        };

        let delivery = if use_webhook {
            let public_url = lookup("PUBLIC_URL").and_then(non_empty).ok_or_else(|| {
                Error::Config(
                    "PUBLIC_URL environment variable is required when USE_WEBHOOK=true"
                        .to_string(),
                )
            })?;
            DeliveryMode::Webhook {
                public_url: public_url.trim().trim_end_matches('/').to_string(),
                port,
            }
        } else {
            DeliveryMode::Polling
        };

        Ok(Self {
            telegram_token: telegram_token.trim().to_string(),
            delivery,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, unquote(v.trim()));
    }
}

fn unquote(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn missing_token_is_fatal() {
        let err = load(&[("USE_WEBHOOK", "false")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));

        let err = load(&[("TELEGRAM_TOKEN", "   ")]).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_TOKEN"));
    }

    #[test]
    fn defaults_to_polling() {
        let cfg = load(&[("TELEGRAM_TOKEN", "123:abc")]).unwrap();
        assert_eq!(cfg.telegram_token, "123:abc");
        assert_eq!(cfg.delivery, DeliveryMode::Polling);
        assert_eq!(cfg.delivery.webhook_url(), None);
    }

    #[test]
    fn webhook_without_public_url_is_fatal() {
        let err = load(&[("TELEGRAM_TOKEN", "t"), ("USE_WEBHOOK", "true")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("PUBLIC_URL"));
    }

    #[test]
    fn webhook_mode_uses_default_port_and_root_path() {
        let cfg = load(&[
            ("TELEGRAM_TOKEN", "t"),
            ("USE_WEBHOOK", "TRUE"),
            ("PUBLIC_URL", "https://bot.example.com/"),
        ])
        .unwrap();
        assert_eq!(
            cfg.delivery,
            DeliveryMode::Webhook {
                public_url: "https://bot.example.com".to_string(),
                port: DEFAULT_WEBHOOK_PORT,
            }
        );
        assert_eq!(
            cfg.delivery.webhook_url().as_deref(),
            Some("https://bot.example.com/")
        );
    }

    #[test]
    fn only_literal_true_enables_webhook() {
        for v in ["1", "yes", "on", "false", ""] {
            let cfg = load(&[("TELEGRAM_TOKEN", "t"), ("USE_WEBHOOK", v)]).unwrap();
            assert_eq!(cfg.delivery, DeliveryMode::Polling, "USE_WEBHOOK={v}");
        }
    }

    #[test]
    fn port_is_parsed_and_validated() {
        let cfg = load(&[
            ("TELEGRAM_TOKEN", "t"),
            ("USE_WEBHOOK", "true"),
            ("PUBLIC_URL", "https://x.example"),
            ("PORT", "9000"),
        ])
        .unwrap();
        assert!(matches!(cfg.delivery, DeliveryMode::Webhook { port: 9000, .. }));

        let err = load(&[("TELEGRAM_TOKEN", "t"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn unquote_strips_matching_quotes_only() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("'abc'"), "abc");
        assert_eq!(unquote("\"abc'"), "\"abc'");
        assert_eq!(unquote("abc"), "abc");
    }
}
