use crate::{
    document::{Document, ElementKind, FormId},
    form::{Iframe, PaymentForm},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};

#[derive(Debug, Clone)]
enum Element {
    Block { id: String, frames: Vec<Iframe> },
    Frame { id: String, name: Option<String> },
}

impl Element {
    fn id(&self) -> &str {
        match self {
            Element::Block { id, .. } | Element::Frame { id, .. } => id,
        }
    }
}

/// In-memory [`Document`] rendered as a self-submitting HTML page.
///
/// The body holds the declared containers followed by every appended form.
/// Alerts are raised and submitted forms are posted, in order, by an inline
/// script once the page loads.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    title: String,
    elements: Vec<Element>,
    forms: Vec<PaymentForm>,
    submitted: Vec<FormId>,
    alerts: Vec<String>,
}

impl HtmlDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            elements: Vec::new(),
            forms: Vec::new(),
            submitted: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Declares an empty `div` with the given id.
    pub fn with_block(mut self, id: impl Into<String>) -> Self {
        self.elements.push(Element::Block {
            id: id.into(),
            frames: Vec::new(),
        });
        self
    }

    /// Declares an existing `iframe` with the given id.
    pub fn with_frame(mut self, id: impl Into<String>) -> Self {
        self.elements.push(Element::Frame {
            id: id.into(),
            name: None,
        });
        self
    }

    pub fn forms(&self) -> &[PaymentForm] {
        &self.forms
    }

    pub fn form(&self, id: FormId) -> Option<&PaymentForm> {
        self.forms.get(id.0)
    }

    pub fn submitted(&self) -> &[FormId] {
        &self.submitted
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Iframes currently inside a block container.
    pub fn iframes(&self, container_id: &str) -> &[Iframe] {
        match self.find(container_id) {
            Some(Element::Block { frames, .. }) => frames,
            _ => &[],
        }
    }

    pub fn frame_name(&self, id: &str) -> Option<&str> {
        match self.find(id) {
            Some(Element::Frame { name, .. }) => name.as_deref(),
            _ => None,
        }
    }

    fn find(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }

    fn script(&self) -> Option<String> {
        if self.alerts.is_empty() && self.submitted.is_empty() {
            return None;
        }

        let alerts = self
            .alerts
            .iter()
            .map(|message| format!("window.alert({});", js_string(message)));

        let submits = self.submitted.iter().map(|id| {
            format!(
                "document.getElementById({}).submit();",
                js_string(&form_element_id(*id))
            )
        });

        Some(alerts.chain(submits).collect::<Vec<_>>().join("\n"))
    }

    pub fn render(&self) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (self.title) }
                }
                body {
                    @for element in &self.elements {
                        @match element {
                            Element::Block { id, frames } => {
                                div id=(id) {
                                    @for frame in frames {
                                        (render_iframe(frame))
                                    }
                                }
                            }
                            Element::Frame { id, name } => {
                                iframe id=(id) name=[name.as_deref()] frameborder="0" {}
                            }
                        }
                    }
                    @for (index, payment_form) in self.forms.iter().enumerate() {
                        form id=(form_element_id(FormId(index))) method=(PaymentForm::METHOD) action=(payment_form.action) target=[payment_form.target.as_deref()] {
                            @for field in &payment_form.fields {
                                input type="hidden" name=(field.name) value=(field.value);
                            }
                        }
                    }
                    @if let Some(js) = self.script() {
                        script { (PreEscaped(js)) }
                    }
                }
            }
        }
    }
}

fn render_iframe(frame: &Iframe) -> Markup {
    let scrolling = frame.scrolling.map(|s| s.as_str());
    html! {
        iframe name=(frame.name) width=(frame.width) height=(frame.height) frameborder="0" scrolling=[scrolling] {}
    }
}

fn form_element_id(id: FormId) -> String {
    format!("payment-form-{}", id.0)
}

// JSON string literals are valid JS. No `<` may reach the script element,
// so neither `</script` nor `<!--` can change how it is parsed.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace('<', "\\u003c")
}

impl Document for HtmlDocument {
    fn element_kind(&self, id: &str) -> Option<ElementKind> {
        self.find(id).map(|element| match element {
            Element::Block { .. } => ElementKind::Block,
            Element::Frame { .. } => ElementKind::Frame,
        })
    }

    fn clear(&mut self, id: &str) {
        if let Some(Element::Block { frames, .. }) = self.find_mut(id) {
            frames.clear();
        }
    }

    fn append_iframe(&mut self, container_id: &str, iframe: Iframe) {
        if let Some(Element::Block { frames, .. }) = self.find_mut(container_id) {
            frames.push(iframe);
        }
    }

    fn rename_frame(&mut self, id: &str, new_name: &str) {
        if let Some(Element::Frame { name, .. }) = self.find_mut(id) {
            *name = Some(new_name.to_string());
        }
    }

    fn append_form(&mut self, form: PaymentForm) -> FormId {
        self.forms.push(form);
        FormId(self.forms.len() - 1)
    }

    fn submit(&mut self, form: FormId) {
        if form.0 < self.forms.len() {
            self.submitted.push(form);
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
