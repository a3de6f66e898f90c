//! Provider-independent payment helpers.
//!
//! - Stripe webhook signature verification (`stripe-signature` header).
//! - Conversion of order totals into minor currency units.
//! - Mapping of MercadoPago payment statuses onto order outcomes.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age of a signed webhook timestamp, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Stripe event type that confirms a payment.
pub const STRIPE_PAYMENT_SUCCEEDED: &str = "payment_intent.succeeded";

/// Statement descriptor shown on the buyer's card statement.
pub const STATEMENT_DESCRIPTOR: &str = "Galería Mirta Aguilar";

/// History notes recorded on payment transitions.
pub const NOTE_PAYMENT_CONFIRMED: &str = "Pago confirmado";
pub const NOTE_STRIPE_WEBHOOK: &str = "Pago confirmado via Stripe webhook";
pub const NOTE_CHECKOUT_CREATED: &str = "Orden creada, esperando pago";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("Missing or malformed signature header")]
    MalformedHeader,

    #[error("Signature timestamp outside tolerance window")]
    Expired,

    #[error("Signature does not match payload")]
    Mismatch,
}

/// Convert an amount in major units to integer minor units (cents).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Compute the hex HMAC-SHA256 of `"{timestamp}.{payload}"`.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    hex::encode(signed_mac(secret, timestamp, payload).finalize().into_bytes())
}

/// Verify a `t=<unix>,v1=<hex>[,v1=<hex>...]` signature header.
///
/// Succeeds when any `v1` entry matches the expected signature and the
/// timestamp lies within [`SIGNATURE_TOLERANCE_SECS`] of `now`.
pub fn verify_webhook_signature(
    header: &str,
    payload: &[u8],
    secret: &str,
    now: i64,
) -> Result<(), SignatureError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    if now.abs_diff(timestamp) > SIGNATURE_TOLERANCE_SECS.unsigned_abs() {
        return Err(SignatureError::Expired);
    }

    let matches = signatures
        .iter()
        .filter_map(|s| hex::decode(s))
        .any(|sig| signed_mac(secret, timestamp, payload).verify_slice(&sig).is_ok());
    if matches {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

fn signed_mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

// ---------------------------------------------------------------------------
// MercadoPago status mapping
// ---------------------------------------------------------------------------

/// Effect of a MercadoPago payment notification on the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Payment approved: complete payment, mark order paid, sell artworks.
    Approved,
    /// Payment still in flight: keep it pending.
    Pending,
    /// Payment rejected or cancelled: fail payment, cancel order.
    Failed,
    /// Unknown status: record the details only.
    Unchanged,
}

/// Map a MercadoPago payment `status` to a [`CheckoutOutcome`].
pub fn checkout_outcome(status: &str) -> CheckoutOutcome {
    match status {
        "approved" => CheckoutOutcome::Approved,
        "pending" | "in_process" => CheckoutOutcome::Pending,
        "rejected" | "cancelled" => CheckoutOutcome::Failed,
        _ => CheckoutOutcome::Unchanged,
    }
}

/// History note recorded for a MercadoPago outcome.
pub fn checkout_note(outcome: CheckoutOutcome, payment_id: &str, status_detail: &str) -> String {
    match outcome {
        CheckoutOutcome::Approved => format!("Pago aprobado via MercadoPago. ID: {payment_id}"),
        CheckoutOutcome::Pending => format!("Pago pendiente. Estado: {status_detail}"),
        CheckoutOutcome::Failed => {
            format!("Pago rechazado/cancelado. Razón: {status_detail}")
        }
        CheckoutOutcome::Unchanged => format!("Notificación de pago recibida. ID: {payment_id}"),
    }
}

// ---------------------------------------------------------------------------
// hex
// ---------------------------------------------------------------------------

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or a non-hex digit.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| s.get(i..i + 2).and_then(|b| u8::from_str_radix(b, 16).ok()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const SECRET: &str = "whsec_test";
    const BODY: &[u8] = br#"{"type":"payment_intent.succeeded"}"#;

    // -- to_minor_units ------------------------------------------------------

    #[test]
    fn minor_units_round() {
        assert_eq!(to_minor_units(1500.0), 150_000);
        assert_eq!(to_minor_units(19.999), 2000);
        assert_eq!(to_minor_units(0.0), 0);
    }

    // -- verify_webhook_signature --------------------------------------------

    #[test]
    fn valid_signature_accepted() {
        let sig = compute_signature(SECRET, 1_000, BODY);
        let header = format!("t=1000,v1={sig}");
        assert!(verify_webhook_signature(&header, BODY, SECRET, 1_010).is_ok());
    }

    #[test]
    fn any_matching_v1_accepted() {
        let sig = compute_signature(SECRET, 1_000, BODY);
        let header = format!("t=1000,v1=deadbeef,v1={sig}");
        assert!(verify_webhook_signature(&header, BODY, SECRET, 1_000).is_ok());
    }

    #[test]
    fn tampered_body_rejected() {
        let sig = compute_signature(SECRET, 1_000, BODY);
        let header = format!("t=1000,v1={sig}");
        assert_eq!(
            verify_webhook_signature(&header, b"{}", SECRET, 1_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn stale_timestamp_rejected() {
        let sig = compute_signature(SECRET, 1_000, BODY);
        let header = format!("t=1000,v1={sig}");
        assert_eq!(
            verify_webhook_signature(&header, BODY, SECRET, 1_000 + SIGNATURE_TOLERANCE_SECS + 1),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn malformed_headers_rejected() {
        assert_matches!(
            verify_webhook_signature("v1=abc", BODY, SECRET, 0),
            Err(SignatureError::MalformedHeader)
        );
        assert_matches!(
            verify_webhook_signature("t=5", BODY, SECRET, 5),
            Err(SignatureError::MalformedHeader)
        );
        assert_matches!(
            verify_webhook_signature("", BODY, SECRET, 5),
            Err(SignatureError::MalformedHeader)
        );
    }

    #[test]
    fn extreme_timestamps_are_expired_not_overflowing() {
        let header = format!("t={},v1=abc", i64::MIN);
        assert_eq!(
            verify_webhook_signature(&header, b"{}", SECRET, 1_700_000_000),
            Err(SignatureError::Expired)
        );
        let header = format!("t={},v1=abc", i64::MAX);
        assert_eq!(
            verify_webhook_signature(&header, b"{}", SECRET, -1_700_000_000),
            Err(SignatureError::Expired)
        );
        let header = format!("t={},v1=abc", i64::MAX);
        assert_eq!(
            verify_webhook_signature(&header, b"{}", SECRET, i64::MIN),
            Err(SignatureError::Expired)
        );
    }

    #[test]
    fn non_hex_signature_is_a_mismatch() {
        assert_eq!(
            verify_webhook_signature("t=1000,v1=zz-not-hex", BODY, SECRET, 1_000),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn hex_round_trip() {
        assert_eq!(hex::decode("00ff10").as_deref(), Some(&[0x00, 0xff, 0x10][..]));
        assert_eq!(hex::decode(&hex::encode([7u8, 200])), Some(vec![7, 200]));
        assert_eq!(hex::decode("abc"), None);
    }

    // -- checkout_outcome ----------------------------------------------------

    #[test]
    fn mercadopago_statuses() {
        assert_eq!(checkout_outcome("approved"), CheckoutOutcome::Approved);
        assert_eq!(checkout_outcome("in_process"), CheckoutOutcome::Pending);
        assert_eq!(checkout_outcome("pending"), CheckoutOutcome::Pending);
        assert_eq!(checkout_outcome("rejected"), CheckoutOutcome::Failed);
        assert_eq!(checkout_outcome("cancelled"), CheckoutOutcome::Failed);
        assert_eq!(checkout_outcome("charged_back"), CheckoutOutcome::Unchanged);
    }

    #[test]
    fn outcome_notes() {
        assert_eq!(
            checkout_note(CheckoutOutcome::Approved, "123", ""),
            "Pago aprobado via MercadoPago. ID: 123"
        );
        assert_eq!(
            checkout_note(CheckoutOutcome::Failed, "123", "cc_rejected_other_reason"),
            "Pago rechazado/cancelado. Razón: cc_rejected_other_reason"
        );
    }
}
