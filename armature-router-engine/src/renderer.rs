// Markup rendering

use crate::element::{Element, ViewContext};
use crate::error::{Result, SsrError};
use crate::request::SsrRequest;
use crate::routes::RouteMatch;
use async_trait::async_trait;

/// Everything a renderer gets for one render.
pub struct RenderInput<'a> {
    /// The composed element (provider, route, optional wrapper).
    pub element: Element,
    /// Whether to annotate element nodes with identifiers.
    pub with_ids: bool,
    pub request: &'a dyn SsrRequest,
    pub route_match: &'a RouteMatch,
}

/// Turns a composed element into markup.
#[async_trait]
pub trait MarkupRenderer: Send + Sync {
    async fn render_markup(&self, input: RenderInput<'_>) -> Result<String>;
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attribute carrying the per-element identifier.
pub const ID_ATTRIBUTE: &str = "data-ssr-id";

/// Attribute marking the root element of an annotated render.
pub const ROOT_ATTRIBUTE: &str = "data-ssr-root";

/// Default HTML renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render with an identifier on every element node, for client hydration.
    pub fn render_to_string(&self, element: &Element) -> Result<String> {
        let mut out = String::new();
        let mut ids = Some(0usize);
        write_element(element, ViewContext::default(), &mut out, &mut ids)?;
        Ok(out)
    }

    /// Render compact markup without identifiers.
    pub fn render_to_static_markup(&self, element: &Element) -> Result<String> {
        let mut out = String::new();
        write_element(element, ViewContext::default(), &mut out, &mut None)?;
        Ok(out)
    }
}

#[async_trait]
impl MarkupRenderer for HtmlRenderer {
    async fn render_markup(&self, input: RenderInput<'_>) -> Result<String> {
        if input.with_ids {
            self.render_to_string(&input.element)
        } else {
            self.render_to_static_markup(&input.element)
        }
    }
}

/// `ids` is `None` for static markup, otherwise the last identifier handed out.
fn write_element(
    element: &Element,
    cx: ViewContext<'_>,
    out: &mut String,
    ids: &mut Option<usize>,
) -> Result<()> {
    match element {
        Element::Text(text) => {
            escape_into(text, out, false);
            Ok(())
        }
        Element::Node {
            tag,
            attrs,
            children,
        } => write_node(tag, attrs, children, cx, out, ids),
        Element::Fragment(children) => {
            for child in children {
                write_element(child, cx, out, ids)?;
            }
            Ok(())
        }
        Element::Component(view) => {
            let rendered = view.render(&cx)?;
            write_element(&rendered, cx, out, ids)
        }
        Element::Provider { store, child } => {
            let state = store.get_state();
            write_element(child, cx.with_state(&state), out, ids)
        }
        Element::Router(route) => {
            let cx = cx.with_route(route);
            let rendered = route.view.render(&cx)?;
            write_element(&rendered, cx, out, ids)
        }
    }
}

fn write_node(
    tag: &str,
    attrs: &[(String, String)],
    children: &[Element],
    cx: ViewContext<'_>,
    out: &mut String,
    ids: &mut Option<usize>,
) -> Result<()> {
    if !is_valid_name(tag) {
        return Err(SsrError::Render(format!(
            "Invalid element: tag name {:?} is not valid",
            tag
        )));
    }

    out.push('<');
    out.push_str(tag);

    for (name, value) in attrs {
        if !is_valid_attribute(name) {
            return Err(SsrError::Render(format!(
                "Invalid element: attribute name {:?} on <{}> is not valid",
                name, tag
            )));
        }
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, out, true);
        out.push('"');
    }

    if let Some(last) = ids.as_mut() {
        if *last == 0 {
            out.push(' ');
            out.push_str(ROOT_ATTRIBUTE);
            out.push_str("=\"\"");
        }
        *last += 1;
        out.push_str(&format!(" {}=\"{}\"", ID_ATTRIBUTE, last));
    }

    let tag_lower = tag.to_ascii_lowercase();
    if VOID_ELEMENTS.contains(&tag_lower.as_str()) {
        if !children.is_empty() {
            return Err(SsrError::Render(format!(
                "Invalid element: <{}> is a void element and must not have children",
                tag
            )));
        }
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    for child in children {
        write_element(child, cx, out, ids)?;
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

fn is_valid_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_attribute(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=' | '<'))
}

fn escape_into(text: &str, out: &mut String, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
}
