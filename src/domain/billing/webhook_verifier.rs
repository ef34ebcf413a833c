//! Stripe webhook signature verification.
//!
//! A delivery is authenticated by an HMAC-SHA256 over the exact raw
//! request bytes, keyed with the endpoint's signing secret, plus a
//! timestamp window that bounds replays. This runs before anything else
//! touches a delivery; a failure here must short-circuit the whole
//! request with no store access.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

/// Oldest delivery accepted, relative to now.
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Tolerated clock skew for timestamps ahead of now.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// The `Stripe-Signature` header, decomposed.
///
/// Wire format: `t=<unix seconds>,v1=<hex hmac>[,v0=<legacy hex hmac>]`,
/// with unknown schemes to be skipped rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Signing time the sender claims.
    pub timestamp: i64,
    /// Current-scheme HMAC, hex-decoded.
    pub v1_signature: Vec<u8>,
    /// Legacy-scheme HMAC, if the sender still includes one.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Decompose a header value.
    ///
    /// # Errors
    ///
    /// `WebhookError::ParseError` when a component is malformed or the
    /// timestamp/v1 parts are absent.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                "v0" => {
                    v0_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v0 signature hex".to_string())
                    })?);
                }
                _ => {
                    // Future signature schemes; skip.
                }
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        let v1_signature = v1_signature
            .ok_or_else(|| WebhookError::ParseError("missing v1 signature".to_string()))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
            v0_signature,
        })
    }
}

/// Authenticates webhook deliveries against the signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    /// Endpoint signing secret (`whsec_…`), from the Stripe dashboard.
    secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
        }
    }

    /// Authenticate a delivery and decode its event envelope.
    ///
    /// The signed message is `"{timestamp}.{raw body}"`, so `payload`
    /// must be the body bytes exactly as received; any re-encoding or
    /// pretty-printing upstream breaks the comparison. The timestamp is
    /// checked against the replay window before the HMAC is computed,
    /// and the comparison itself is constant-time.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` when the HMAC does not match
    /// - `TimestampOutOfRange` when the delivery is older than the window
    /// - `InvalidTimestamp` when the timestamp is ahead of the skew bound
    /// - `ParseError` when the header or the JSON body is malformed
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected_signature = self.compute_signature(header.timestamp, payload);
        if !constant_time_compare(&expected_signature, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        let event: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        Ok(event)
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let age = chrono::Utc::now().timestamp() - timestamp;

        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac = Hmac::<Sha256>::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts any key");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Constant-time equality so the comparison leaks nothing about how far
/// a forged signature got.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Hex-encoded HMAC-SHA256 over `"{timestamp}.{payload}"`, for signing
/// test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}
