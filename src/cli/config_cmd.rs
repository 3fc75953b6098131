//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::media::Duration;
use crate::domain::provider::ProviderId;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if is_secret(key) {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
    presenter.output(&value);

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = display_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(validation_error(
            key,
            format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        ))
    }
}

fn validation_error(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

fn is_secret(key: &str) -> bool {
    key.ends_with("api_key")
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "provider" => {
            let provider = value
                .parse::<ProviderId>()
                .map_err(|e| validation_error(key, e.to_string()))?;
            config.provider = Some(provider.to_string());
        }
        "groq_api_key" => config.groq_api_key = Some(value.to_string()),
        "assemblyai_api_key" => config.assemblyai_api_key = Some(value.to_string()),
        "gemini_api_key" => config.gemini_api_key = Some(value.to_string()),
        "max_segment_mb" => config.max_segment_mb = Some(parse_positive(key, value)?),
        "bitrate_kbps" => {
            let kbps = parse_positive(key, value)?;
            let kbps = u32::try_from(kbps).map_err(|_| validation_error(key, "Value is too large"))?;
            config.bitrate_kbps = Some(kbps);
        }
        "max_attempts" => {
            let attempts = parse_positive(key, value)?;
            let attempts =
                u32::try_from(attempts).map_err(|_| validation_error(key, "Value is too large"))?;
            config.max_attempts = Some(attempts);
        }
        "backoff_base" | "request_timeout" => {
            let duration = value
                .parse::<Duration>()
                .map_err(|e| validation_error(key, e.to_string()))?;
            let normalized = Some(duration.to_string());
            if key == "backoff_base" {
                config.backoff_base = normalized;
            } else {
                config.request_timeout = normalized;
            }
        }
        "work_dir" => config.work_dir = Some(value.to_string()),
        _ => return Err(validation_error(key, "Unknown key")),
    }
    Ok(())
}

/// Value as shown by `get` and `list`, with API keys masked
fn display_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "provider" => config.provider.clone(),
        "groq_api_key" => config.groq_api_key.as_deref().map(mask_api_key),
        "assemblyai_api_key" => config.assemblyai_api_key.as_deref().map(mask_api_key),
        "gemini_api_key" => config.gemini_api_key.as_deref().map(mask_api_key),
        "max_segment_mb" => config.max_segment_mb.map(|v| v.to_string()),
        "bitrate_kbps" => config.bitrate_kbps.map(|v| v.to_string()),
        "max_attempts" => config.max_attempts.map(|v| v.to_string()),
        "backoff_base" => config.backoff_base.clone(),
        "request_timeout" => config.request_timeout.clone(),
        "work_dir" => config.work_dir.clone(),
        _ => None,
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(validation_error(key, "Value must be a positive integer")),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
