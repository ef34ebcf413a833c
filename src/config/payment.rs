//! Stripe configuration.

use serde::Deserialize;
use std::collections::HashSet;

use super::error::ValidationError;

/// Stripe credentials and the price catalogue the shop sells.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Secret API key (`sk_test_…` / `sk_live_…`).
    pub stripe_api_key: String,

    /// Webhook signing secret (`whsec_…`).
    pub stripe_webhook_secret: String,

    /// Price charged at checkout.
    pub stripe_price_id: String,

    /// Comma-separated price ids whose subscriptions lapse after one
    /// billing period instead of renewing.
    pub non_renewing_price_ids: Option<String>,
}

impl PaymentConfig {
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_test_")
    }

    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.starts_with("sk_live_")
    }

    /// The non-renewing price ids as a lookup set.
    pub fn non_renewing_set(&self) -> HashSet<String> {
        self.non_renewing_price_ids
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Presence and prefix checks. Catching a publishable key or a raw
    /// secret here beats finding out on the first checkout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stripe_api_key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }
        if self.stripe_webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.stripe_price_id.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_PRICE_ID"));
        }
        if !self.stripe_api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !self.stripe_webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.stripe_price_id.starts_with("price_") {
            return Err(ValidationError::InvalidStripePriceId);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: "sk_test_abc".to_string(),
            stripe_webhook_secret: "whsec_abc".to_string(),
            stripe_price_id: "price_monthly".to_string(),
            non_renewing_price_ids: None,
        }
    }

    #[test]
    fn mode_follows_key_prefix() {
        assert!(config().is_test_mode());

        let live = PaymentConfig {
            stripe_api_key: "sk_live_abc".to_string(),
            ..config()
        };
        assert!(live.is_live_mode());
        assert!(!live.is_test_mode());
    }

    #[test]
    fn non_renewing_set_handles_spacing_and_absence() {
        assert!(config().non_renewing_set().is_empty());

        let with_ids = PaymentConfig {
            non_renewing_price_ids: Some("price_once, price_trial ,".to_string()),
            ..config()
        };
        let set = with_ids.non_renewing_set();
        assert_eq!(set.len(), 2);
        assert!(set.contains("price_once"));
        assert!(set.contains("price_trial"));
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn each_credential_is_required() {
        let strips: [fn(&mut PaymentConfig); 3] = [
            |c| c.stripe_api_key.clear(),
            |c| c.stripe_webhook_secret.clear(),
            |c| c.stripe_price_id.clear(),
        ];
        for strip in strips {
            let mut c = config();
            strip(&mut c);
            assert!(matches!(
                c.validate(),
                Err(ValidationError::MissingRequired(_))
            ));
        }
    }

    #[test]
    fn wrong_prefixes_are_rejected() {
        let publishable = PaymentConfig {
            stripe_api_key: "pk_test_abc".to_string(),
            ..config()
        };
        assert!(matches!(
            publishable.validate(),
            Err(ValidationError::InvalidStripeKey)
        ));

        let bare_secret = PaymentConfig {
            stripe_webhook_secret: "abc123".to_string(),
            ..config()
        };
        assert!(matches!(
            bare_secret.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        ));

        let product = PaymentConfig {
            stripe_price_id: "prod_abc".to_string(),
            ..config()
        };
        assert!(matches!(
            product.validate(),
            Err(ValidationError::InvalidStripePriceId)
        ));
    }
}
