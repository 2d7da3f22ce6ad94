//! DOM port. The controller keeps canonical state and projects it through
//! [`Dom`]; handle discovery reads the document through [`DomQuery`].

mod memory;
mod selector;

use serde::{Deserialize, Serialize};
use shared::domain::ElementId;

pub use memory::{ElementBuilder, MemoryDom, MemoryElement, ScrollRequest};
pub use selector::{SelectorError, SelectorList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

pub trait Dom {
    fn body(&self) -> ElementId;

    fn add_class(&mut self, element: ElementId, class: &str);
    fn remove_class(&mut self, element: ElementId, class: &str);
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn set_class(&mut self, element: ElementId, class: &str, on: bool) {
        if on {
            self.add_class(element, class);
        } else {
            self.remove_class(element, class);
        }
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);
    fn remove_attribute(&mut self, element: ElementId, name: &str);

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn text(&self, element: ElementId) -> String;
    fn set_text(&mut self, element: ElementId, text: &str);

    /// Inline `display: none` toggle.
    fn set_hidden(&mut self, element: ElementId, hidden: bool);

    fn value(&self, element: ElementId) -> String;
    fn is_checked(&self, element: ElementId) -> bool;

    /// Inclusive, like `Node.contains`.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool;
    fn element_by_id(&self, id: &str) -> Option<ElementId>;

    fn viewport_width(&self) -> f64;
    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior);
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
    fn navigate(&mut self, url: &str);
}

/// Read access used once at startup to assemble [`crate::PageHandles`].
pub trait DomQuery: Dom {
    /// Matching elements in document order. With a scope, only its
    /// descendants are searched.
    fn query_all(&self, scope: Option<ElementId>, selector: &str) -> Vec<ElementId>;

    fn query_first(&self, scope: Option<ElementId>, selector: &str) -> Option<ElementId> {
        self.query_all(scope, selector).into_iter().next()
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId>;

    fn offset_top(&self, element: ElementId) -> f64;
    fn offset_height(&self, element: ElementId) -> f64;
}
