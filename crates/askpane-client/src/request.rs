//! Outbound conversation request body

use askpane_core::Config;
use rand::Rng;
use serde::{Deserialize, Serialize};

const USERNAME_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FALLBACK_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub message: MessageBody,
    pub blocking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_tools_validation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody {
    pub content: String,
    pub mentions: Vec<Mention>,
    pub context: MessageContext,
}

/// Agent the message is addressed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    pub configuration_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    pub username: String,
    pub timezone: String,
}

/// Build the body that creates a blocking conversation for `message`
pub fn build_request_body(message: &str, config: &Config) -> RequestBody {
    let agent_id = config.agent_id.trim();
    let mentions = if agent_id.is_empty() {
        Vec::new()
    } else {
        vec![Mention {
            configuration_id: agent_id.to_string(),
        }]
    };

    let username = match config.user_context.username.trim() {
        "" => generate_username(),
        name => name.to_string(),
    };
    let timezone = match config.user_context.timezone.trim() {
        "" => default_timezone(),
        tz => tz.to_string(),
    };

    let title = Some(config.request_config.title.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    RequestBody {
        message: MessageBody {
            content: message.to_string(),
            mentions,
            context: MessageContext { username, timezone },
        },
        blocking: true,
        title,
        skip_tools_validation: config.request_config.skip_tools_validation.then_some(true),
    }
}

/// Pseudo-unique `user-xxxxxxxx` name for unconfigured users
pub fn generate_username() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| USERNAME_ALPHABET[rng.gen_range(0..USERNAME_ALPHABET.len())] as char)
        .collect();
    format!("user-{}", suffix)
}

/// IANA name of the local timezone: `TZ`, then the system zone, then UTC
pub fn default_timezone() -> String {
    if let Some(tz) = std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim_start_matches(':').trim().to_string())
        .filter(|tz| !tz.is_empty())
    {
        return tz;
    }

    if let Ok(content) = std::fs::read_to_string("/etc/timezone") {
        let tz = content.trim();
        if !tz.is_empty() {
            return tz.to_string();
        }
    }

    std::fs::read_link("/etc/localtime")
        .ok()
        .and_then(|target| {
            let target = target.to_string_lossy().into_owned();
            target
                .split_once("zoneinfo/")
                .map(|(_, zone)| zone.to_string())
        })
        .filter(|zone| !zone.is_empty())
        .unwrap_or_else(|| FALLBACK_TIMEZONE.to_string())
}
