// Credential resolution. A configured persistent token is used as-is; when
// none is configured the one-time interactive authorisation flow runs:
// print the authorisation URL, read the code from the terminal, exchange
// it at the provider's token endpoint.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use dialoguer::Input;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::config::AppConfig;

/// Base URL of the provider's authorisation service.
const AUTH_BASE_URL: &str = "https://auth.cumulus-storage.example";

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
}

/// Produce the access token for this run. Returns `None` when no token is
/// configured and the interactive flow could not produce one; the caller
/// treats that as fatal for the whole run.
pub fn resolve_access_token(config: &AppConfig) -> Option<String> {
    match &config.access_token {
        Some(token) if !token.trim().is_empty() => Some(token.clone()),
        _ => match authorise(config) {
            Ok(token) => Some(token),
            Err(e) => {
                eprintln!("Authorisation failed: {e:#}");
                None
            }
        },
    }
}

fn authorize_url(app_key: &str) -> String {
    format!("{AUTH_BASE_URL}/oauth2/authorize?client_id={app_key}&response_type=code")
}

/// Interactive one-time authorisation: the user opens the printed URL,
/// approves the app, and pastes the code back into the terminal.
fn authorise(config: &AppConfig) -> Result<String> {
    println!("Go to: {}", authorize_url(&config.app_key));

    let code: String = Input::new()
        .with_prompt("Authorisation code")
        .interact_text()
        .context("Could not read authorisation code from input")?;

    exchange_code(config, code.trim())
}

/// Exchange an authorisation code for a persistent access token. The app
/// credentials travel as HTTP Basic, per the provider's token endpoint.
fn exchange_code(config: &AppConfig, code: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(config.app_name.clone())
        .build()
        .context("Failed to build HTTP client")?;

    let credentials = BASE64.encode(format!("{}:{}", config.app_key, config.app_secret));
    let url = format!("{AUTH_BASE_URL}/oauth2/token");
    let res = client
        .post(&url)
        .header(AUTHORIZATION, format!("Basic {credentials}"))
        .form(&[("grant_type", "authorization_code"), ("code", code)])
        .send()
        .context("Failed to send token exchange request")?;
    if !res.status().is_success() {
        let status = res.status();
        let txt = res.text().unwrap_or_else(|_| "".into());
        anyhow::bail!("Token exchange rejected: {} - {}", status, txt);
    }
    let token: TokenResponse = res.json().context("Parsing token response json")?;
    Ok(token.access_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(token: Option<&str>) -> AppConfig {
        AppConfig {
            app_key: "key".into(),
            app_secret: "secret".into(),
            app_name: "demo".into(),
            locale: "en_US".into(),
            access_token: token.map(str::to_owned),
        }
    }

    #[test]
    fn configured_token_is_used_as_is() {
        let config = test_config(Some("persistent-token"));
        assert_eq!(
            resolve_access_token(&config),
            Some("persistent-token".to_string())
        );
    }

    #[test]
    fn authorize_url_carries_the_app_key() {
        let url = authorize_url("abc123");
        assert!(url.contains("client_id=abc123"));
        assert!(url.contains("response_type=code"));
    }
}
