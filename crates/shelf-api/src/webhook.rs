//! `POST /webhook/inventory-update` and HMAC signature verification.
//!
//! The signature covers the raw request body, so the body is taken as bytes
//! and verified before any JSON parsing happens.

use axum::{
  Json,
  extract::State,
  http::HeaderMap,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use shelf_core::{
  Error as CoreError,
  source::ProductSource,
  store::ProductStore,
  sync::Reconciled,
  webhook::{InventoryEvent, apply_inventory_event},
};
use thiserror::Error;

use crate::{AppState, error::ApiError};

/// Header carrying the HMAC-SHA256 of the body.
pub const SIGNATURE_HEADER: &str = "x-shopify-hmac-sha256";

type HmacSha256 = Hmac<Sha256>;

// ─── Verification ────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
  #[error("no webhook secret is configured")]
  NotConfigured,

  #[error("signature header is missing")]
  Missing,

  #[error("signature header is neither hex nor base64")]
  Malformed,

  #[error("signature does not match body")]
  Mismatch,
}

/// Checks webhook signatures against a shared secret.
///
/// Without a secret every request is rejected.
#[derive(Clone)]
pub struct WebhookVerifier {
  secret: Option<Vec<u8>>,
}

impl WebhookVerifier {
  pub fn new(secret: impl Into<Vec<u8>>) -> Self { Self { secret: Some(secret.into()) } }

  pub fn disabled() -> Self { Self { secret: None } }

  pub fn is_enabled(&self) -> bool { self.secret.is_some() }

  /// Verify `signature` (hex or base64) against HMAC-SHA256 of `body`.
  /// The final comparison is constant-time.
  pub fn verify(&self, body: &[u8], signature: Option<&str>) -> Result<(), SignatureError> {
    let secret = self.secret.as_deref().ok_or(SignatureError::NotConfigured)?;
    let expected = decode_signature(signature.ok_or(SignatureError::Missing)?)?;

    // HMAC accepts keys of any length.
    let mut mac =
      HmacSha256::new_from_slice(secret).map_err(|_| SignatureError::NotConfigured)?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| SignatureError::Mismatch)
  }
}

impl std::fmt::Debug for WebhookVerifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WebhookVerifier")
      .field("enabled", &self.is_enabled())
      .finish()
  }
}

/// A SHA-256 digest is 64 hex characters; anything else is read as base64.
fn decode_signature(signature: &str) -> Result<Vec<u8>, SignatureError> {
  let signature = signature.trim();
  let looks_hex =
    signature.len() == 64 && signature.bytes().all(|b| b.is_ascii_hexdigit());

  if looks_hex {
    hex::decode(signature).map_err(|_| SignatureError::Malformed)
  } else {
    STANDARD.decode(signature).map_err(|_| SignatureError::Malformed)
  }
}

// ─── Handler ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
  pub status:     &'static str,
  pub message:    &'static str,
  pub product_id: String,
}

/// `POST /webhook/inventory-update`
pub async fn inventory_update<S, U>(
  State(state): State<AppState<S, U>>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError>
where
  S: ProductStore,
  U: ProductSource,
{
  let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
  if let Err(e) = state.webhook.verify(&body, signature) {
    tracing::warn!(reason = %e, "rejected webhook");
    return Err(ApiError::Unauthorized("Invalid signature".to_owned()));
  }

  let event =
    InventoryEvent::from_json(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let product_id = event.external_id.clone();

  let outcome = apply_inventory_event(state.store.as_ref(), event)
    .await
    .map_err(|e| match e {
      CoreError::InventoryOverflow { .. } => ApiError::BadRequest(e.to_string()),
      e => ApiError::internal("webhook", format!("Failed to process inventory update: {e}")),
    })?;

  let message = match outcome {
    Reconciled::Created(_) => "Product created",
    Reconciled::Updated(_) => "Product updated",
  };
  tracing::info!(
    product_id = %product_id,
    outcome = message,
    stock = ?outcome.product().stock_status(),
    "webhook applied"
  );

  Ok(Json(WebhookResponse { status: "success", message, product_id }))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sign_hex(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
  }

  fn sign_b64(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).unwrap();
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
  }

  const BODY: &[u8] = br#"{"id":"A","inventory_quantity":3}"#;

  #[test]
  fn accepts_hex_and_base64_signatures() {
    let v = WebhookVerifier::new("s3cret");
    assert_eq!(v.verify(BODY, Some(&sign_hex(b"s3cret", BODY))), Ok(()));
    assert_eq!(v.verify(BODY, Some(&sign_b64(b"s3cret", BODY))), Ok(()));
  }

  #[test]
  fn uppercase_hex_is_accepted() {
    let v = WebhookVerifier::new("s3cret");
    let sig = sign_hex(b"s3cret", BODY).to_uppercase();
    assert_eq!(v.verify(BODY, Some(&sig)), Ok(()));
  }

  #[test]
  fn tampered_body_is_a_mismatch() {
    let v = WebhookVerifier::new("s3cret");
    let sig = sign_hex(b"s3cret", BODY);
    let tampered = br#"{"id":"A","inventory_quantity":300}"#;
    assert_eq!(v.verify(tampered, Some(&sig)), Err(SignatureError::Mismatch));
  }

  #[test]
  fn wrong_secret_is_a_mismatch() {
    let v = WebhookVerifier::new("s3cret");
    let sig = sign_hex(b"other", BODY);
    assert_eq!(v.verify(BODY, Some(&sig)), Err(SignatureError::Mismatch));
  }

  #[test]
  fn missing_or_garbage_headers_are_rejected() {
    let v = WebhookVerifier::new("s3cret");
    assert_eq!(v.verify(BODY, None), Err(SignatureError::Missing));
    assert_eq!(v.verify(BODY, Some("not a signature!")), Err(SignatureError::Malformed));
  }

  #[test]
  fn disabled_verifier_rejects_everything() {
    let v = WebhookVerifier::disabled();
    assert!(!v.is_enabled());
    let sig = sign_hex(b"", BODY);
    assert_eq!(v.verify(BODY, Some(&sig)), Err(SignatureError::NotConfigured));
  }
}
