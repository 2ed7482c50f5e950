use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order parameters keyed by their `vads_*` field name.
pub type OrderData = BTreeMap<String, String>;

/// Everything needed to start a payment operation.
///
/// `credentials` and `order_data` are required; they are optional here so a
/// missing one can be reported as an integration error instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub credentials: Option<Credentials>,
    pub order_data: Option<OrderData>,
    /// Alternate payment host, e.g. `secure.payzen.eu`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Embed the payment page into an iframe instead of redirecting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas: Option<Canvas>,
}

/// Either a precomputed signature or an endpoint to fetch one from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// URL receiving the merged order data and answering with credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Credentials {
    pub fn with_signature(signature: impl Into<String>) -> Self {
        Self {
            signature: Some(signature.into()),
            source: None,
        }
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            signature: None,
            source: Some(source.into()),
        }
    }

    /// The signature, unless missing or empty.
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref().filter(|s| !s.is_empty())
    }

    /// The credentials source, unless missing or empty.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref().filter(|s| !s.is_empty())
    }
}

/// Container that should host the embedded payment page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Id of the container element, also used as the iframe name.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scrolling: Option<Scrolling>,
}

impl Canvas {
    pub const DEFAULT_WIDTH: u32 = 600;
    pub const DEFAULT_HEIGHT: u32 = 430;

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            width: None,
            height: None,
            scrolling: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width.unwrap_or(Self::DEFAULT_WIDTH)
    }

    pub fn height(&self) -> u32 {
        self.height.unwrap_or(Self::DEFAULT_HEIGHT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scrolling {
    Yes,
    No,
    Auto,
}

impl Scrolling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scrolling::Yes => "yes",
            Scrolling::No => "no",
            Scrolling::Auto => "auto",
        }
    }
}
