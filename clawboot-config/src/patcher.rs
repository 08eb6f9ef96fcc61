//! Environment patch over the configuration document.
//!
//! Runs exactly once per boot, after restoration and any onboarding have
//! produced (or left absent) the document. Three rule classes:
//!
//! 1. Deployment invariants (port, bind mode, trusted proxies): written
//!    unconditionally, never inherited from a stale backup.
//! 2. Credentials: injected only when supplied; channel blocks are
//!    **replaced**, not merged, so stale keys from older backups cannot
//!    leak into strict downstream validation.
//! 3. Model-provider override: optional, skipped with a warning when its
//!    supporting variables are missing.

use serde_json::json;

use crate::document::Document;
use crate::env::PatchEnv;

/// Gateway port inside the container. A deployment invariant, not a user
/// preference.
pub const GATEWAY_PORT: u16 = 18789;
const GATEWAY_BIND: &str = "lan";
const TRUSTED_PROXIES: [&str; 2] = ["127.0.0.1", "::1"];

const GATEWAY_ENDPOINT: &str = "https://gateway.ai.cloudflare.com/v1";
const ACCOUNT_ENDPOINT: &str = "https://api.cloudflare.com/client/v4/accounts";

/// Apply the full environment patch to `doc`. Pure transformation; the
/// caller persists the result.
pub fn patch(doc: &mut Document, env: &PatchEnv) {
    apply_network_invariants(doc);
    apply_auth(doc, env);
    apply_channels(doc, env);
    apply_model_override(doc, env);
}

fn apply_network_invariants(doc: &mut Document) {
    doc.set(&["gateway", "port"], json!(GATEWAY_PORT));
    doc.set(&["gateway", "bind"], json!(GATEWAY_BIND));
    doc.set(&["gateway", "trustedProxies"], json!(TRUSTED_PROXIES));
}

fn apply_auth(doc: &mut Document, env: &PatchEnv) {
    if let Some(token) = &env.gateway_token {
        doc.set(&["gateway", "auth", "token"], json!(token));
        tracing::debug!("injected gateway auth token from environment");
    }
    if env.allow_insecure_auth {
        doc.set(&["gateway", "auth", "allowUnauthenticated"], json!(true));
        tracing::warn!("insecure auth permitted via OPENCLAW_ALLOW_INSECURE_AUTH");
    }
}

fn apply_channels(doc: &mut Document, env: &PatchEnv) {
    if let Some(token) = &env.telegram_bot_token {
        doc.set(
            &["channels", "telegram"],
            json!({ "enabled": true, "botToken": token }),
        );
        tracing::info!("configured telegram channel from environment");
    }

    if let Some(token) = &env.discord_bot_token {
        doc.set(
            &["channels", "discord"],
            json!({ "enabled": true, "token": token }),
        );
        tracing::info!("configured discord channel from environment");
    }

    match (&env.slack_bot_token, &env.slack_app_token) {
        (Some(bot), Some(app)) => {
            doc.set(
                &["channels", "slack"],
                json!({ "enabled": true, "botToken": bot, "appToken": app }),
            );
            tracing::info!("configured slack channel from environment");
        }
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!(
                "slack needs both SLACK_BOT_TOKEN and SLACK_APP_TOKEN; leaving channel untouched"
            );
        }
        (None, None) => {}
    }
}

/// `OPENCLAW_MODEL=provider/model-id` injects a provider entry and makes it
/// the default model. Two endpoint conventions: with a gateway id the URL
/// goes through the AI gateway, otherwise straight to the account API.
fn apply_model_override(doc: &mut Document, env: &PatchEnv) {
    let Some(combined) = &env.model_override else {
        return;
    };
    let Some((provider, model_id)) = combined.split_once('/') else {
        tracing::warn!(value = %combined, "OPENCLAW_MODEL is not provider/model-id; skipping override");
        return;
    };
    let (Some(account), Some(api_token)) =
        (&env.cloudflare_account_id, &env.cloudflare_api_token)
    else {
        tracing::warn!(
            "model override needs CLOUDFLARE_ACCOUNT_ID and CLOUDFLARE_API_TOKEN; skipping"
        );
        return;
    };

    let base_url = match &env.cloudflare_gateway_id {
        Some(gateway) => format!("{GATEWAY_ENDPOINT}/{account}/{gateway}/compat"),
        None => format!("{ACCOUNT_ENDPOINT}/{account}/ai/v1"),
    };

    doc.set(
        &["models", "providers", provider],
        json!({
            "baseUrl": base_url,
            "apiKey": api_token,
            "api": "openai-compat",
            "models": [model_id],
        }),
    );
    doc.set(&["agent", "model"], json!(combined));
    tracing::info!(provider, model = model_id, "installed model-provider override");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
