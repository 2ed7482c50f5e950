use crate::form::{Iframe, PaymentForm};

/// Kind of an element found by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// Block container such as a `div`.
    Block,
    /// An `iframe`.
    Frame,
    /// Any other element, by tag name.
    Other(String),
}

/// Handle of a form appended to a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(pub usize);

/// The page the payment form is assembled into.
#[cfg_attr(test, mockall::automock)]
pub trait Document: Send {
    fn element_kind(&self, id: &str) -> Option<ElementKind>;

    /// Removes every child of the element.
    fn clear(&mut self, id: &str);

    fn append_iframe(&mut self, container_id: &str, iframe: Iframe);

    fn rename_frame(&mut self, id: &str, name: &str);

    /// Appends the form to the body.
    fn append_form(&mut self, form: PaymentForm) -> FormId;

    /// Submits a form, navigating the page or its target frame.
    fn submit(&mut self, form: FormId);

    /// Shows a blocking message to the user.
    fn alert(&mut self, message: &str);
}
