//! Environment variables recognized by the patcher.
//!
//! Every variable the patch step reacts to is enumerated here and read
//! exactly once into an immutable [`PatchEnv`]. No ambient lookups inside
//! the patch logic; tests construct the struct literally.
//!
//! | Env | Effect |
//! |-----|--------|
//! | `OPENCLAW_GATEWAY_TOKEN` | inject the gateway auth token |
//! | `OPENCLAW_ALLOW_INSECURE_AUTH` | permit an unauthenticated gateway |
//! | `TELEGRAM_BOT_TOKEN` | replace the telegram channel block |
//! | `DISCORD_BOT_TOKEN` | replace the discord channel block |
//! | `SLACK_BOT_TOKEN` + `SLACK_APP_TOKEN` | replace the slack channel block |
//! | `OPENCLAW_MODEL` | `provider/model-id` default-model override |
//! | `CLOUDFLARE_ACCOUNT_ID` | override endpoint: account id |
//! | `CLOUDFLARE_GATEWAY_ID` | override endpoint: AI-gateway id (optional) |
//! | `CLOUDFLARE_API_TOKEN` | override credential |

/// Immutable snapshot of every environment variable the patcher consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchEnv {
    pub gateway_token: Option<String>,
    pub allow_insecure_auth: bool,
    pub telegram_bot_token: Option<String>,
    pub discord_bot_token: Option<String>,
    pub slack_bot_token: Option<String>,
    pub slack_app_token: Option<String>,
    /// Combined `provider/model-id` value.
    pub model_override: Option<String>,
    pub cloudflare_account_id: Option<String>,
    pub cloudflare_gateway_id: Option<String>,
    pub cloudflare_api_token: Option<String>,
}

impl PatchEnv {
    /// Read the process environment once. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            gateway_token: env_opt("OPENCLAW_GATEWAY_TOKEN"),
            allow_insecure_auth: env_bool("OPENCLAW_ALLOW_INSECURE_AUTH"),
            telegram_bot_token: env_opt("TELEGRAM_BOT_TOKEN"),
            discord_bot_token: env_opt("DISCORD_BOT_TOKEN"),
            slack_bot_token: env_opt("SLACK_BOT_TOKEN"),
            slack_app_token: env_opt("SLACK_APP_TOKEN"),
            model_override: env_opt("OPENCLAW_MODEL"),
            cloudflare_account_id: env_opt("CLOUDFLARE_ACCOUNT_ID"),
            cloudflare_gateway_id: env_opt("CLOUDFLARE_GATEWAY_ID"),
            cloudflare_api_token: env_opt("CLOUDFLARE_API_TOKEN"),
        }
    }

    /// True when an auth token was supplied. Also drives the gateway argv.
    pub fn token_supplied(&self) -> bool {
        self.gateway_token.is_some()
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool(name: &str) -> bool {
    env_opt(name)
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}
