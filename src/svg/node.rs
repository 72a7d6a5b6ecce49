//! In-memory SVG element tree.

use indexmap::IndexMap;

/// Textual content of an element.
///
/// `Raw` is markup that is already valid XML (embedded `<defs>` fragments,
/// CSS blocks) and is written without escaping; `Escaped` is plain text.
#[derive(Debug, Clone, PartialEq)]
pub enum SvgText {
    Escaped(String),
    Raw(String),
}

/// One SVG element: tag name, ordered attributes, children, optional text.
///
/// Attribute order is preserved so serialized output is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub name: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<SvgNode>,
    pub text: Option<SvgText>,
}

impl SvgNode {
    pub fn new(name: &str) -> Self {
        SvgNode {
            name: name.to_string(),
            attrs: IndexMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(mut self, key: &str, value: impl ToString) -> Self {
        self.attrs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(SvgText::Escaped(text.to_string()));
        self
    }

    pub fn raw_text(mut self, markup: &str) -> Self {
        self.text = Some(SvgText::Raw(markup.to_string()));
        self
    }

    pub fn push(&mut self, child: SvgNode) {
        self.children.push(child);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.is_none()
    }
}
