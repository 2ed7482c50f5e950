//! # payzen-rs
//!
//! Builds the form that sends a buyer to the [Payzen](https://payzen.eu) hosted
//! payment page, optionally embedded into an iframe, and submits it.
//!
//! The order data supplied by the caller is merged over a set of defaults
//! (transaction id, UTC transaction date, currency and mode constants). The
//! form is signed either with a signature the caller already computed or with
//! one fetched from a merchant endpoint, which receives the merged order data
//! as JSON.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), payzen_rs::PayzenError> {
//! use payzen_rs::{Config, Credentials, HtmlDocument, OrderData, PayzenJs};
//!
//! let config = Config {
//!     credentials: Some(Credentials::with_source("https://shop.example/payzen/sign")),
//!     order_data: Some(OrderData::from([
//!         ("vads_site_id".to_string(), "12345678".to_string()),
//!         ("vads_amount".to_string(), "1500".to_string()),
//!     ])),
//!     ..Config::default()
//! };
//!
//! let mut page = HtmlDocument::new("Checkout");
//! PayzenJs::default().go(Some(&config), &mut page).await?;
//! println!("{}", page.render().into_string());
//! # Ok(())
//! # }
//! ```
//!

mod check;
mod config;
mod credentials;
mod document;
mod error;
mod form;
mod html;
mod order;

pub use check::{CheckedConfig, check};
pub use config::{Canvas, Config, Credentials, OrderData, Scrolling};
pub use credentials::{CredentialSource, HttpCredentialSource, JSON_CONTENT_TYPE};
pub use document::{Document, ElementKind, FormId};
pub use error::PayzenError;
pub use form::{
    DEFAULT_HOST, HiddenField, Iframe, PaymentForm, build_canvas, build_order_form, payment_url,
};
pub use html::HtmlDocument;
pub use order::{
    OrderDefaults, default_order_data, merge_order_data, trans_date, trans_date_at, trans_id,
};

use std::sync::Arc;
use tracing::{error, info, warn};

/// Prefix of every message shown for an integration error.
pub const INTEGRATION_ERROR_PREFIX: &str = "Payment integration error - ";

/// Form builder and dispatcher.
///
/// # Example
///
/// ```rust
/// use payzen_rs::{OrderDefaults, PayzenJs};
///
/// let payzen = PayzenJs::default()
///     .with_host("secure.osb.example")
///     .with_defaults(OrderDefaults {
///         currency: "840".to_string(),
///         ..OrderDefaults::default()
///     });
/// ```
#[derive(Clone)]
pub struct PayzenJs {
    source: Arc<dyn CredentialSource>,
    defaults: OrderDefaults,
    host: Option<String>,
}

impl Default for PayzenJs {
    fn default() -> Self {
        Self::new(Arc::new(HttpCredentialSource::default()))
    }
}

impl PayzenJs {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self {
            source,
            defaults: OrderDefaults::default(),
            host: None,
        }
    }

    /// Sets the payment host used when the config names none.
    ///
    /// Without it, [`DEFAULT_HOST`] is used.
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_defaults(mut self, defaults: OrderDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validates the config, merges the order data, resolves credentials and
    /// submits one form per credential.
    ///
    /// A pre-supplied signature is used right away. A credentials source is
    /// called afterwards with the merged order data, so a config carrying
    /// both submits two forms.
    ///
    /// # Errors
    ///
    /// * [`PayzenError::Integration`] when the config is incomplete; the
    ///   message is also raised through [`Document::alert`] and nothing is
    ///   built.
    /// * Any credentials source failure. No form is built for the failed
    ///   fetch.
    pub async fn go(
        &self,
        config: Option<&Config>,
        document: &mut dyn Document,
    ) -> Result<Vec<FormId>, PayzenError> {
        let checked = match check(config) {
            Ok(checked) => checked,
            Err(e) => {
                integration_error(document, &e);
                return Err(e);
            }
        };

        let order_data = merge_order_data(
            &default_order_data(&self.defaults),
            checked.order_data,
        );

        self.build_credentials_and_send_form(checked, &order_data, document)
            .await
    }

    async fn build_credentials_and_send_form(
        &self,
        config: CheckedConfig<'_>,
        order_data: &OrderData,
        document: &mut dyn Document,
    ) -> Result<Vec<FormId>, PayzenError> {
        let host = config.target.or(self.host.as_deref());
        let mut submitted = Vec::new();

        if config.credentials.signature().is_some() {
            let form = build_order_form(
                document,
                host,
                config.canvas,
                order_data,
                config.credentials,
            );
            document.submit(form);
            submitted.push(form);
        }

        if let Some(source) = config.credentials.source() {
            if !submitted.is_empty() {
                warn!(source = %source, "config carries both a signature and a credentials source");
            }

            let credentials = self.source.fetch(source, order_data).await.map_err(|e| {
                error!(error = %e, source = %source, "could not resolve credentials");
                e
            })?;

            let form = build_order_form(document, host, config.canvas, order_data, &credentials);
            document.submit(form);
            submitted.push(form);
        }

        info!(
            forms = submitted.len(),
            trans_id = ?order_data.get("vads_trans_id"),
            "payment form submitted"
        );

        Ok(submitted)
    }
}

/// Runs [`PayzenJs::go`] with a default dispatcher.
pub async fn go(
    config: Option<&Config>,
    document: &mut dyn Document,
) -> Result<Vec<FormId>, PayzenError> {
    PayzenJs::default().go(config, document).await
}

fn integration_error(document: &mut dyn Document, err: &PayzenError) {
    let message = err.to_string();
    document.alert(&format!("{INTEGRATION_ERROR_PREFIX}{message}"));
    error!("{message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{credentials::MockCredentialSource, document::MockDocument};
    use mockall::predicate::eq;

    fn order() -> OrderData {
        OrderData::from([
            ("vads_site_id".to_string(), "12345678".to_string()),
            ("vads_amount".to_string(), "1500".to_string()),
            ("vads_currency".to_string(), "840".to_string()),
        ])
    }

    fn config(credentials: Credentials) -> Config {
        Config {
            credentials: Some(credentials),
            order_data: Some(order()),
            ..Config::default()
        }
    }

    fn unused_source() -> Arc<dyn CredentialSource> {
        let mut source = MockCredentialSource::new();
        source.expect_fetch().never();
        Arc::new(source)
    }

    #[tokio::test]
    async fn test_missing_config_alerts() {
        let mut doc = MockDocument::new();
        doc.expect_alert()
            .with(eq(
                "Payment integration error - No config provided. Please read documentation",
            ))
            .times(1)
            .return_const(());
        doc.expect_append_form().never();
        doc.expect_submit().never();

        let err = PayzenJs::new(unused_source())
            .go(None, &mut doc)
            .await
            .unwrap_err();

        assert!(matches!(err, PayzenError::Integration { field } if field == "config"));
    }

    #[tokio::test]
    async fn test_missing_order_data_builds_nothing() {
        let config = Config {
            credentials: Some(Credentials::with_signature("S")),
            ..Config::default()
        };

        let mut doc = HtmlDocument::new("Checkout");
        let err = PayzenJs::new(unused_source())
            .go(Some(&config), &mut doc)
            .await
            .unwrap_err();

        assert!(matches!(err, PayzenError::Integration { .. }));
        assert!(doc.forms().is_empty());
        assert_eq!(
            doc.alerts(),
            &["Payment integration error - No config.orderData provided. Please read documentation"]
        );
    }

    #[tokio::test]
    async fn test_empty_signature_builds_nothing() {
        let mut doc = HtmlDocument::new("Checkout");
        let err = PayzenJs::new(unused_source())
            .go(Some(&config(Credentials::with_signature(""))), &mut doc)
            .await
            .unwrap_err();

        assert!(matches!(err, PayzenError::Integration { .. }));
        assert!(doc.forms().is_empty());
        assert!(doc.submitted().is_empty());
        assert_eq!(doc.alerts().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_source_is_not_called() {
        let credentials = Credentials {
            signature: Some("S".to_string()),
            source: Some(String::new()),
        };

        let mut doc = HtmlDocument::new("Checkout");
        let forms = PayzenJs::new(unused_source())
            .go(Some(&config(credentials)), &mut doc)
            .await
            .unwrap();

        assert_eq!(forms, vec![FormId(0)]);
        assert_eq!(doc.forms()[0].field("signature"), Some("S"));
    }

    #[tokio::test]
    async fn test_free_go_with_signature() {
        let mut doc = HtmlDocument::new("Checkout").with_block("payzen");
        let config = Config {
            canvas: Some(Canvas::new("payzen")),
            ..config(Credentials::with_signature("S"))
        };

        let forms = crate::go(Some(&config), &mut doc).await.unwrap();

        assert_eq!(forms, vec![FormId(0)]);
        assert_eq!(doc.submitted(), &[FormId(0)]);

        let form = &doc.forms()[0];
        assert_eq!(form.action, "https://secure.payzen.eu/vads-payment/");
        assert_eq!(form.target.as_deref(), Some("payzen"));
        assert_eq!(form.field("signature"), Some("S"));
        assert_eq!(doc.iframes("payzen").len(), 1);
    }

    #[tokio::test]
    async fn test_signature_submits_form() {
        let mut doc = HtmlDocument::new("Checkout");
        let forms = PayzenJs::new(unused_source())
            .go(Some(&config(Credentials::with_signature("S"))), &mut doc)
            .await
            .unwrap();

        assert_eq!(forms, vec![FormId(0)]);
        assert_eq!(doc.submitted(), &[FormId(0)]);

        let form = doc.form(FormId(0)).unwrap();
        assert_eq!(form.action, "https://secure.payzen.eu/vads-payment/");
        assert_eq!(form.target, None);
        assert_eq!(form.field("signature"), Some("S"));
        assert_eq!(form.field("vads_amount"), Some("1500"));
        assert_eq!(form.field("vads_currency"), Some("840"));
        assert_eq!(form.field("vads_version"), Some("V2"));
        assert_eq!(form.field("vads_trans_id").map(str::len), Some(6));
        assert_eq!(form.field("vads_trans_date").map(str::len), Some(14));
        // 3 caller fields, 6 defaults not overridden, signature
        assert_eq!(form.fields.len(), 10);
    }

    #[tokio::test]
    async fn test_source_receives_merged_order_data() {
        let mut source = MockCredentialSource::new();
        source
            .expect_fetch()
            .withf(|url, data| {
                url == "https://shop.example/sign"
                    && data["vads_amount"] == "1500"
                    && data["vads_currency"] == "840"
                    && data["vads_page_action"] == "PAYMENT"
                    && data.len() == 9
            })
            .times(1)
            .returning(|_, _| Ok(Credentials::with_signature("fetched")));

        let mut doc = HtmlDocument::new("Checkout");
        let forms = PayzenJs::new(Arc::new(source))
            .go(
                Some(&config(Credentials::with_source("https://shop.example/sign"))),
                &mut doc,
            )
            .await
            .unwrap();

        assert_eq!(forms.len(), 1);
        assert_eq!(doc.forms()[0].field("signature"), Some("fetched"));
        assert_eq!(doc.submitted(), &[FormId(0)]);
    }

    #[tokio::test]
    async fn test_failed_fetch_builds_nothing() {
        let mut source = MockCredentialSource::new();
        source.expect_fetch().times(1).returning(|_, _| {
            Err(PayzenError::UnexpectedStatus {
                status: 503,
                body: String::new(),
            })
        });

        let mut doc = HtmlDocument::new("Checkout");
        let err = PayzenJs::new(Arc::new(source))
            .go(
                Some(&config(Credentials::with_source("https://shop.example/sign"))),
                &mut doc,
            )
            .await
            .unwrap_err();

        assert!(err.is_upstream());
        assert!(doc.forms().is_empty());
        assert!(doc.submitted().is_empty());
        assert!(doc.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_signature_and_source_submit_twice() {
        let mut source = MockCredentialSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_, _| Ok(Credentials::with_signature("fetched")));

        let credentials = Credentials {
            signature: Some("given".to_string()),
            source: Some("https://shop.example/sign".to_string()),
        };

        let mut doc = HtmlDocument::new("Checkout");
        let forms = PayzenJs::new(Arc::new(source))
            .go(Some(&config(credentials)), &mut doc)
            .await
            .unwrap();

        assert_eq!(forms, vec![FormId(0), FormId(1)]);
        assert_eq!(doc.forms()[0].field("signature"), Some("given"));
        assert_eq!(doc.forms()[1].field("signature"), Some("fetched"));
        assert_eq!(
            doc.forms()[0].field("vads_trans_id"),
            doc.forms()[1].field("vads_trans_id")
        );
    }

    #[tokio::test]
    async fn test_canvas_and_target() {
        let config = Config {
            target: Some("secure.osb.example".to_string()),
            canvas: Some(Canvas::new("payzen")),
            ..config(Credentials::with_signature("S"))
        };

        let mut doc = HtmlDocument::new("Checkout").with_block("payzen");
        PayzenJs::new(unused_source())
            .with_host("ignored.example")
            .go(Some(&config), &mut doc)
            .await
            .unwrap();

        let form = &doc.forms()[0];
        assert_eq!(form.action, "https://secure.osb.example/vads-payment/");
        assert_eq!(form.target.as_deref(), Some("payzen"));

        let frames = doc.iframes("payzen");
        assert_eq!(frames.len(), 1);
        assert_eq!((frames[0].width, frames[0].height), (600, 430));
        assert_eq!(frames[0].name, "payzen");
    }

    #[tokio::test]
    async fn test_dispatcher_host_and_defaults() {
        let payzen = PayzenJs::new(unused_source())
            .with_host("secure.osb.example")
            .with_defaults(OrderDefaults {
                currency: "756".to_string(),
                ..OrderDefaults::default()
            });

        let config = Config {
            credentials: Some(Credentials::with_signature("S")),
            order_data: Some(OrderData::new()),
            ..Config::default()
        };

        let mut doc = HtmlDocument::new("Checkout");
        payzen.go(Some(&config), &mut doc).await.unwrap();

        let form = &doc.forms()[0];
        assert_eq!(form.action, "https://secure.osb.example/vads-payment/");
        assert_eq!(form.field("vads_currency"), Some("756"));
    }
}
