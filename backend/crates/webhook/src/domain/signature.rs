//! Webhook authentication
//!
//! - Helius: `Authorization` header equals the shared token
//! - KYC provider: `X-Signature` is hex HMAC-SHA256 of the raw body
//! - Stripe: `Stripe-Signature: t=<unix>,v1=<hex>` over `"{t}.{body}"`

use platform::crypto::{constant_time_eq, verify_hmac_sha256_hex};

use crate::error::{WebhookError, WebhookResult};

/// Stripe's default tolerance
pub const STRIPE_TOLERANCE_SECS: i64 = 300;

pub fn verify_shared_token(expected: &str, presented: Option<&str>) -> WebhookResult<()> {
    let presented = presented.ok_or(WebhookError::InvalidSignature)?;
    if expected.is_empty() || !constant_time_eq(expected.as_bytes(), presented.trim().as_bytes()) {
        return Err(WebhookError::InvalidSignature);
    }
    Ok(())
}

pub fn verify_body_signature(secret: &str, body: &[u8], signature: Option<&str>) -> WebhookResult<()> {
    let signature = signature.ok_or(WebhookError::InvalidSignature)?;
    // "sha256=<hex>" も受け付ける
    let hex = signature.strip_prefix("sha256=").unwrap_or(signature);
    if !verify_hmac_sha256_hex(secret.as_bytes(), body, hex) {
        return Err(WebhookError::InvalidSignature);
    }
    Ok(())
}

/// Parsed `Stripe-Signature` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSignature {
    pub timestamp: i64,
    /// Every `v1` entry; several are sent while a secret is being rolled
    pub signatures: Vec<String>,
}

impl StripeSignature {
    pub fn parse(header: &str) -> Option<Self> {
        let mut timestamp = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = value.parse::<i64>().ok(),
                "v1" => signatures.push(value.to_string()),
                _ => {}
            }
        }
        let timestamp = timestamp?;
        (!signatures.is_empty()).then_some(Self {
            timestamp,
            signatures,
        })
    }

    pub fn verify(&self, secret: &str, body: &[u8], now: i64, tolerance_secs: i64) -> WebhookResult<()> {
        let mut signed = format!("{}.", self.timestamp).into_bytes();
        signed.extend_from_slice(body);

        if !self
            .signatures
            .iter()
            .any(|sig| verify_hmac_sha256_hex(secret.as_bytes(), &signed, sig))
        {
            return Err(WebhookError::InvalidSignature);
        }
        if (now - self.timestamp).abs() > tolerance_secs {
            return Err(WebhookError::StaleTimestamp);
        }
        Ok(())
    }
}

pub fn verify_stripe_signature(
    secret: &str,
    body: &[u8],
    header: Option<&str>,
    now: i64,
    tolerance_secs: i64,
) -> WebhookResult<()> {
    let header = header.ok_or(WebhookError::InvalidSignature)?;
    StripeSignature::parse(header)
        .ok_or(WebhookError::InvalidSignature)?
        .verify(secret, body, now, tolerance_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::crypto::{hex_encode, hmac_sha256};

    const SECRET: &str = "whsec_test";

    fn stripe_header(t: i64, body: &[u8]) -> String {
        let mut signed = format!("{t}.").into_bytes();
        signed.extend_from_slice(body);
        format!("t={t},v1={}", hex_encode(&hmac_sha256(SECRET.as_bytes(), &signed)))
    }

    #[test]
    fn test_shared_token() {
        assert!(verify_shared_token("helius-token", Some("helius-token")).is_ok());
        assert!(verify_shared_token("helius-token", Some("helius-tokem")).is_err());
        assert!(verify_shared_token("helius-token", None).is_err());
        assert!(verify_shared_token("", Some("")).is_err());
    }

    #[test]
    fn test_body_signature() {
        let body = br#"{"userId":"x","status":"approved"}"#;
        let sig = hex_encode(&hmac_sha256(b"kyc-secret", body));
        assert!(verify_body_signature("kyc-secret", body, Some(&sig)).is_ok());
        assert!(verify_body_signature("kyc-secret", body, Some(&format!("sha256={sig}"))).is_ok());
        assert!(verify_body_signature("other", body, Some(&sig)).is_err());
        assert!(verify_body_signature("kyc-secret", b"{}", Some(&sig)).is_err());
        assert!(verify_body_signature("kyc-secret", body, Some("zz")).is_err());
    }

    #[test]
    fn test_parse_stripe_header() {
        let parsed = StripeSignature::parse("t=1700000000,v1=abc,v0=old,v1=def").unwrap();
        assert_eq!(parsed.timestamp, 1_700_000_000);
        assert_eq!(parsed.signatures, vec!["abc", "def"]);

        assert!(StripeSignature::parse("v1=abc").is_none());
        assert!(StripeSignature::parse("t=1700000000").is_none());
        assert!(StripeSignature::parse("t=soon,v1=abc").is_none());
    }

    #[test]
    fn test_stripe_tolerance() {
        let body = br#"{"type":"payment_intent.succeeded"}"#;
        let t = 1_700_000_000;
        let header = stripe_header(t, body);

        assert!(verify_stripe_signature(SECRET, body, Some(&header), t + 300, 300).is_ok());
        assert!(matches!(
            verify_stripe_signature(SECRET, body, Some(&header), t + 301, 300),
            Err(WebhookError::StaleTimestamp)
        ));
        assert!(matches!(
            verify_stripe_signature(SECRET, b"{}", Some(&header), t, 300),
            Err(WebhookError::InvalidSignature)
        ));
        assert!(verify_stripe_signature(SECRET, body, None, t, 300).is_err());
    }
}
