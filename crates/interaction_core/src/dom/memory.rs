use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use shared::domain::ElementId;

use super::{Dom, DomQuery, ScrollBehavior, SelectorList};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryElement {
    pub tag: String,
    pub parent: Option<ElementId>,
    #[serde(default)]
    pub classes: BTreeSet<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollRequest {
    IntoView {
        element: ElementId,
        behavior: ScrollBehavior,
    },
    To {
        top: f64,
        behavior: ScrollBehavior,
    },
}

/// In-memory document used by tests and the page simulator. Elements are
/// stored in creation order, which is document order as long as the tree is
/// built depth-first.
#[derive(Debug, Clone, Serialize)]
pub struct MemoryDom {
    elements: Vec<MemoryElement>,
    viewport_width: f64,
    scroll_requests: Vec<ScrollRequest>,
    location: Option<String>,
    #[serde(skip)]
    mutations: usize,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new(1280.0)
    }
}

impl MemoryDom {
    pub fn new(viewport_width: f64) -> Self {
        Self {
            elements: vec![MemoryElement {
                tag: "body".into(),
                ..MemoryElement::default()
            }],
            viewport_width,
            scroll_requests: Vec::new(),
            location: None,
            mutations: 0,
        }
    }

    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementBuilder<'_> {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(MemoryElement {
            tag: tag.to_ascii_lowercase(),
            parent: Some(parent),
            ..MemoryElement::default()
        });
        ElementBuilder { dom: self, id }
    }

    pub fn element(&self, element: ElementId) -> Option<&MemoryElement> {
        self.elements.get(element.0 as usize)
    }

    /// Setup access that bypasses mutation accounting (user typing, layout).
    pub fn element_mut(&mut self, element: ElementId) -> Option<&mut MemoryElement> {
        self.elements.get_mut(element.0 as usize)
    }

    pub fn set_value(&mut self, element: ElementId, value: &str) {
        if let Some(el) = self.element_mut(element) {
            el.value = value.to_string();
        }
    }

    pub fn set_checked(&mut self, element: ElementId, checked: bool) {
        if let Some(el) = self.element_mut(element) {
            el.checked = checked;
        }
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    pub fn is_hidden(&self, element: ElementId) -> bool {
        self.element(element).is_some_and(|el| el.hidden)
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    /// Number of writes that changed observable state.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn is_inside(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.element(id).and_then(|el| el.parent);
        }
        false
    }

    fn update(&mut self, element: ElementId, apply: impl FnOnce(&mut MemoryElement) -> bool) {
        if let Some(el) = self.elements.get_mut(element.0 as usize) {
            if apply(el) {
                self.mutations += 1;
            }
        }
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> ElementId {
        ElementId(0)
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        self.update(element, |el| el.classes.insert(class.to_string()));
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        self.update(element, |el| el.classes.remove(class));
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|el| el.classes.contains(class))
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.element(element)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        self.update(element, |el| {
            el.attributes.insert(name.to_string(), value.to_string()).as_deref() != Some(value)
        });
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        self.update(element, |el| el.attributes.remove(name).is_some());
    }

    fn text(&self, element: ElementId) -> String {
        self.element(element)
            .map(|el| el.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        self.update(element, |el| {
            if el.text == text {
                return false;
            }
            el.text = text.to_string();
            true
        });
    }

    fn set_hidden(&mut self, element: ElementId, hidden: bool) {
        self.update(element, |el| {
            let changed = el.hidden != hidden;
            el.hidden = hidden;
            changed
        });
    }

    fn value(&self, element: ElementId) -> String {
        self.element(element)
            .map(|el| el.value.clone())
            .unwrap_or_default()
    }

    fn is_checked(&self, element: ElementId) -> bool {
        self.element(element).is_some_and(|el| el.checked)
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.is_inside(ancestor, node)
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        self.elements
            .iter()
            .position(|el| el.attributes.get("id").map(String::as_str) == Some(id))
            .map(|index| ElementId(index as u32))
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior) {
        self.scroll_requests
            .push(ScrollRequest::IntoView { element, behavior });
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest::To { top, behavior });
    }

    fn navigate(&mut self, url: &str) {
        self.location = Some(url.to_string());
        self.mutations += 1;
    }
}

impl DomQuery for MemoryDom {
    fn query_all(&self, scope: Option<ElementId>, selector: &str) -> Vec<ElementId> {
        let selector = match SelectorList::parse(selector) {
            Ok(selector) => selector,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unsupported selector");
                return Vec::new();
            }
        };

        self.elements
            .iter()
            .enumerate()
            .map(|(index, el)| (ElementId(index as u32), el))
            .filter(|(id, _)| match scope {
                Some(scope) => *id != scope && self.is_inside(scope, *id),
                None => true,
            })
            .filter(|(_, el)| selector.matches(&el.tag, &el.classes, &el.attributes))
            .map(|(id, _)| id)
            .collect()
    }

    fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let selector = SelectorList::parse(selector).ok()?;
        let mut current = Some(element);
        while let Some(id) = current {
            let el = self.element(id)?;
            if selector.matches(&el.tag, &el.classes, &el.attributes) {
                return Some(id);
            }
            current = el.parent;
        }
        None
    }

    fn offset_top(&self, element: ElementId) -> f64 {
        self.element(element).map_or(0.0, |el| el.top)
    }

    fn offset_height(&self, element: ElementId) -> f64 {
        self.element(element).map_or(0.0, |el| el.height)
    }
}

pub struct ElementBuilder<'a> {
    dom: &'a mut MemoryDom,
    id: ElementId,
}

impl ElementBuilder<'_> {
    pub fn class(self, class: &str) -> Self {
        if let Some(el) = self.dom.element_mut(self.id) {
            el.classes.insert(class.to_string());
        }
        self
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        if let Some(el) = self.dom.element_mut(self.id) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
        self
    }

    pub fn dom_id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn text(self, text: &str) -> Self {
        if let Some(el) = self.dom.element_mut(self.id) {
            el.text = text.to_string();
        }
        self
    }

    pub fn layout(self, top: f64, height: f64) -> Self {
        if let Some(el) = self.dom.element_mut(self.id) {
            el.top = top;
            el.height = height;
        }
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }
}

impl From<ElementBuilder<'_>> for ElementId {
    fn from(builder: ElementBuilder<'_>) -> Self {
        builder.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_observable_changes() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let nav = dom.append(body, "ul").class("c-nav__list").id();

        dom.add_class(nav, "show");
        dom.add_class(nav, "show");
        dom.set_attribute(nav, "aria-expanded", "true");
        dom.set_attribute(nav, "aria-expanded", "true");
        dom.remove_class(nav, "missing");
        assert_eq!(dom.mutation_count(), 2);
    }

    #[test]
    fn scoped_query_and_closest() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let form = dom.append(body, "form").class("c-form").id();
        let group = dom.append(form, "div").class("c-form__group").id();
        let input = dom.append(group, "input").attr("name", "email").id();
        let outside = dom.append(body, "input").attr("name", "email").id();

        assert_eq!(dom.query_all(Some(form), "[name=\"email\"]"), vec![input]);
        assert_eq!(dom.query_all(None, "[name=\"email\"]"), vec![input, outside]);
        assert_eq!(dom.closest(input, ".c-form__group"), Some(group));
        assert_eq!(dom.closest(outside, ".c-form__group"), None);
        assert!(dom.contains(form, input));
        assert!(!dom.contains(form, outside));
    }
}
