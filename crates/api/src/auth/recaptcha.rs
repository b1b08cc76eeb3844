//! reCAPTCHA token verification against Google's `siteverify` endpoint.
//!
//! Verification only runs when a secret is configured; without one every
//! request passes.

use serde::Deserialize;

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, thiserror::Error)]
pub enum RecaptchaError {
    #[error("reCAPTCHA token is required")]
    MissingToken,

    #[error("reCAPTCHA verification failed")]
    Rejected { error_codes: Vec<String> },

    /// The verification service could not be reached or answered garbage.
    #[error("reCAPTCHA request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Verify `token` when `secret` is set.
pub async fn verify(
    client: &reqwest::Client,
    secret: Option<&str>,
    token: Option<&str>,
) -> Result<(), RecaptchaError> {
    let Some(secret) = secret else {
        return Ok(());
    };
    let token = token
        .filter(|t| !t.trim().is_empty())
        .ok_or(RecaptchaError::MissingToken)?;

    let response: SiteVerifyResponse = client
        .post(SITEVERIFY_URL)
        .form(&[("secret", secret), ("response", token)])
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    check(response)
}

fn check(response: SiteVerifyResponse) -> Result<(), RecaptchaError> {
    if response.success {
        return Ok(());
    }
    tracing::info!(error_codes = ?response.error_codes, "reCAPTCHA rejected token");
    Err(RecaptchaError::Rejected {
        error_codes: response.error_codes,
    })
}
