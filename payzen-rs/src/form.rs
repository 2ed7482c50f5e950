use crate::{
    config::{Canvas, Credentials, OrderData, Scrolling},
    document::{Document, ElementKind, FormId},
};
use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "secure.payzen.eu";

/// Form posted to the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentForm {
    pub action: String,
    /// Name of the frame the response is shown in, `None` for the current page.
    pub target: Option<String>,
    pub fields: Vec<HiddenField>,
}

impl PaymentForm {
    pub const METHOD: &'static str = "post";

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenField {
    pub name: String,
    pub value: String,
}

impl HiddenField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Frame the embedded payment page is loaded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iframe {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub scrolling: Option<Scrolling>,
}

impl Iframe {
    pub fn for_canvas(canvas: &Canvas) -> Self {
        Self {
            name: canvas.id.clone(),
            width: canvas.width(),
            height: canvas.height(),
            scrolling: canvas.scrolling,
        }
    }
}

pub fn payment_url(host: Option<&str>) -> String {
    format!("https://{}/vads-payment/", host.unwrap_or(DEFAULT_HOST))
}

/// Prepares the canvas and returns the form target for it.
///
/// An empty string means the canvas could not be used and the form will
/// navigate the current page.
pub fn build_canvas(document: &mut dyn Document, canvas: &Canvas) -> String {
    match document.element_kind(&canvas.id) {
        Some(ElementKind::Block) => {
            document.clear(&canvas.id);
            document.append_iframe(&canvas.id, Iframe::for_canvas(canvas));
            debug!(canvas = %canvas.id, "iframe created");
            canvas.id.clone()
        }
        Some(ElementKind::Frame) => {
            document.rename_frame(&canvas.id, &canvas.id);
            canvas.id.clone()
        }
        Some(ElementKind::Other(tag)) => {
            warn!(canvas = %canvas.id, tag = %tag, "canvas element cannot host the payment page");
            String::new()
        }
        None => {
            warn!(canvas = %canvas.id, "canvas element not found");
            String::new()
        }
    }
}

/// Builds the order form and appends it to the document.
pub fn build_order_form(
    document: &mut dyn Document,
    host: Option<&str>,
    canvas: Option<&Canvas>,
    order_data: &OrderData,
    credentials: &Credentials,
) -> FormId {
    let target = match canvas {
        Some(canvas) => Some(build_canvas(document, canvas)).filter(|t| !t.is_empty()),
        None => None,
    };

    let mut fields: Vec<HiddenField> = order_data
        .iter()
        .map(|(name, value)| HiddenField::new(name, value))
        .collect();

    fields.push(HiddenField::new(
        "signature",
        credentials.signature.clone().unwrap_or_default(),
    ));

    document.append_form(PaymentForm {
        action: payment_url(host),
        target,
        fields,
    })
}
