//! Inbound webhook payloads

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Helius
// ============================================================================

/// One element of a Helius enhanced-transaction webhook
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedTransaction {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub token_transfers: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    pub mint: String,
    #[serde(default)]
    pub from_user_account: Option<String>,
    #[serde(default)]
    pub to_user_account: Option<String>,
}

impl EnhancedTransaction {
    pub fn share_transfers(&self) -> Vec<ShareTransfer> {
        self.token_transfers
            .iter()
            .filter_map(|t| {
                let to = t.to_user_account.as_deref()?.trim();
                (!to.is_empty()).then(|| ShareTransfer {
                    mint: t.mint.clone(),
                    to_wallet: to.to_string(),
                })
            })
            .collect()
    }
}

/// A token landing in a wallet. Only mints we issued and wallets bound to
/// a user change anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTransfer {
    pub mint: String,
    pub to_wallet: String,
}

/// Row of `chain_events`; the signature is the idempotency key
#[derive(Debug, Clone)]
pub struct ChainEvent {
    pub signature: String,
    pub kind: String,
    pub payload: Value,
}

// ============================================================================
// KYC provider
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycEvent {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    pub status: String,
}

// ============================================================================
// Stripe
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: StripeEventData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeEventData {
    #[serde(default)]
    pub object: StripeObject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeObject {
    #[serde(default)]
    pub id: Option<String>,
    /// Set on checkout sessions
    #[serde(default)]
    pub payment_intent: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeAction {
    Settle,
    Release,
    Ignore,
}

impl StripeEvent {
    pub fn action(&self) -> StripeAction {
        match self.kind.as_str() {
            "payment_intent.succeeded" | "checkout.session.completed" => StripeAction::Settle,
            "payment_intent.payment_failed" => StripeAction::Release,
            _ => StripeAction::Ignore,
        }
    }

    pub fn order_id(&self) -> Option<&str> {
        self.data
            .object
            .metadata
            .get("orderId")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Payment intent id when present, else the object or event id
    pub fn payment_reference(&self) -> String {
        let object = &self.data.object;
        object
            .payment_intent
            .clone()
            .or_else(|| object.id.clone())
            .or_else(|| self.id.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_share_transfers_skip_burns() {
        let tx: EnhancedTransaction = serde_json::from_value(json!({
            "signature": "5h6x",
            "type": "TRANSFER",
            "tokenTransfers": [
                {"mint": "MintA", "fromUserAccount": "W1", "toUserAccount": "W2"},
                {"mint": "MintB", "fromUserAccount": "W1", "toUserAccount": ""},
                {"mint": "MintC", "fromUserAccount": "W1"}
            ]
        }))
        .unwrap();

        assert_eq!(
            tx.share_transfers(),
            vec![ShareTransfer {
                mint: "MintA".into(),
                to_wallet: "W2".into()
            }]
        );
    }

    #[test]
    fn test_stripe_event_fields() {
        let event: StripeEvent = serde_json::from_value(json!({
            "id": "evt_1",
            "type": "checkout.session.completed",
            "data": {"object": {
                "id": "cs_1",
                "payment_intent": "pi_1",
                "metadata": {"orderId": " 1b4e28ba-2fa1-11d2-883f-0016d3cca427 "}
            }}
        }))
        .unwrap();

        assert_eq!(event.action(), StripeAction::Settle);
        assert_eq!(event.order_id(), Some("1b4e28ba-2fa1-11d2-883f-0016d3cca427"));
        assert_eq!(event.payment_reference(), "pi_1");

        let other: StripeEvent =
            serde_json::from_value(json!({"id": "evt_2", "type": "customer.created"})).unwrap();
        assert_eq!(other.action(), StripeAction::Ignore);
        assert_eq!(other.order_id(), None);
        assert_eq!(other.payment_reference(), "evt_2");
    }
}
