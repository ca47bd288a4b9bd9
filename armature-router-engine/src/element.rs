// View tree types

use crate::error::Result;
use crate::routes::RouteMatch;
use crate::store::Store;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A renderable view.
///
/// Views receive the state of the nearest [`Element::Provider`] and the
/// route of the nearest [`Element::Router`]. Returning an error aborts the
/// render; an [`SsrError::Signaled`](crate::SsrError::Signaled) error lets a
/// view choose the status (and redirect path) of the result.
pub trait View: Send + Sync {
    fn render(&self, cx: &ViewContext<'_>) -> Result<Element>;
}

/// Context a [`View`] renders against.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewContext<'a> {
    state: Option<&'a Value>,
    route: Option<&'a RouteMatch>,
}

impl<'a> ViewContext<'a> {
    pub(crate) fn with_state(self, state: &'a Value) -> Self {
        Self {
            state: Some(state),
            ..self
        }
    }

    pub(crate) fn with_route(self, route: &'a RouteMatch) -> Self {
        Self {
            route: Some(route),
            ..self
        }
    }

    /// State of the enclosing store provider.
    pub fn state(&self) -> Option<&'a Value> {
        self.state
    }

    /// The matched route being rendered.
    pub fn route(&self) -> Option<&'a RouteMatch> {
        self.route
    }

    /// Path parameters of the matched route.
    pub fn params(&self) -> Option<&'a HashMap<String, String>> {
        self.route.map(|route| &route.params)
    }

    /// A single path parameter.
    pub fn param(&self, name: &str) -> Option<&'a str> {
        self.params()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }
}

/// Node of a view tree.
#[derive(Clone)]
pub enum Element {
    Text(String),
    Node {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<Element>,
    },
    Fragment(Vec<Element>),
    Component(Arc<dyn View>),
    /// Makes the store state available to every view below it.
    Provider {
        store: Arc<dyn Store>,
        child: Box<Element>,
    },
    /// Renders the view of a matched route.
    Router(RouteMatch),
}

impl Element {
    /// An element node with no attributes or children.
    pub fn node(tag: impl Into<String>) -> Self {
        Element::Node {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Element::Text(text.into())
    }

    /// Add an attribute. No-op on anything but [`Element::Node`].
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Element::Node { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    /// Append a child. Non-container elements are wrapped in a fragment.
    pub fn child(self, child: Element) -> Self {
        match self {
            Element::Node {
                tag,
                attrs,
                mut children,
            } => {
                children.push(child);
                Element::Node {
                    tag,
                    attrs,
                    children,
                }
            }
            Element::Fragment(mut children) => {
                children.push(child);
                Element::Fragment(children)
            }
            other => Element::Fragment(vec![other, child]),
        }
    }

    pub fn children(self, children: impl IntoIterator<Item = Element>) -> Self {
        children.into_iter().fold(self, Element::child)
    }

    /// Wrap `child` in a store provider.
    pub fn provider(store: Arc<dyn Store>, child: Element) -> Self {
        Element::Provider {
            store,
            child: Box::new(child),
        }
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::text(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Element::Node {
                tag,
                attrs,
                children,
            } => f
                .debug_struct("Node")
                .field("tag", tag)
                .field("attrs", attrs)
                .field("children", children)
                .finish(),
            Element::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            Element::Component(_) => f.write_str("Component(..)"),
            Element::Provider { child, .. } => {
                f.debug_struct("Provider").field("child", child).finish_non_exhaustive()
            }
            Element::Router(route) => f.debug_tuple("Router").field(&route.pattern).finish(),
        }
    }
}

/// Element factory handed to component wrappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementFactory;

impl ElementFactory {
    pub fn create(
        &self,
        tag: impl Into<String>,
        attrs: Vec<(String, String)>,
        children: Vec<Element>,
    ) -> Element {
        Element::Node {
            tag: tag.into(),
            attrs,
            children,
        }
    }

    pub fn text(&self, text: impl Into<String>) -> Element {
        Element::text(text)
    }

    pub fn fragment(&self, children: Vec<Element>) -> Element {
        Element::Fragment(children)
    }

    pub fn component(&self, view: Arc<dyn View>) -> Element {
        Element::Component(view)
    }
}

struct FnView<F>(F);

impl<F> View for FnView<F>
where
    F: Fn(&ViewContext<'_>) -> Result<Element> + Send + Sync,
{
    fn render(&self, cx: &ViewContext<'_>) -> Result<Element> {
        (self.0)(cx)
    }
}

/// Turn a closure into a shareable [`View`].
pub fn view_fn<F>(f: F) -> Arc<dyn View>
where
    F: Fn(&ViewContext<'_>) -> Result<Element> + Send + Sync + 'static,
{
    Arc::new(FnView(f))
}
