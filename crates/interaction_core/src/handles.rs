use serde::{Deserialize, Serialize};
use shared::domain::{ElementId, FilterKey, FormField, SectionId};

/// Handle set assembled once at startup. Empty groups disable their feature.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHandles {
    pub body: ElementId,
    pub nav: Option<NavHandles>,
    pub nav_links: Vec<NavLink>,
    pub headers: Vec<HeaderNavHandles>,
    pub forms: Vec<FormHandles>,
    pub filter_buttons: Vec<FilterButton>,
    pub filter_items: Vec<FilterItem>,
    pub scroll_top: Option<ElementId>,
    pub sections: Vec<ScrollSection>,
    pub stats: Vec<StatHandle>,
}

impl PageHandles {
    pub fn new(body: ElementId) -> Self {
        Self {
            body,
            nav: None,
            nav_links: Vec::new(),
            headers: Vec::new(),
            forms: Vec::new(),
            filter_buttons: Vec::new(),
            filter_items: Vec::new(),
            scroll_top: None,
            sections: Vec::new(),
            stats: Vec::new(),
        }
    }

    pub fn form(&self, form: ElementId) -> Option<&FormHandles> {
        self.forms.iter().find(|handles| handles.form == form)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavHandles {
    pub toggle: ElementId,
    pub list: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub element: ElementId,
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderNavHandles {
    pub header: ElementId,
    pub toggle: ElementId,
    pub list: ElementId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormHandles {
    pub form: ElementId,
    pub fields: Vec<FieldHandle>,
    pub submit: Option<ElementId>,
    /// Slot for form-level messages such as a failed delivery.
    pub status: Option<ElementId>,
}

impl FormHandles {
    pub fn field(&self, field: FormField) -> Option<&FieldHandle> {
        self.fields.iter().find(|handle| handle.field == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHandle {
    pub field: FormField,
    pub input: ElementId,
    pub group: Option<ElementId>,
    pub error: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub element: ElementId,
    pub key: FilterKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub element: ElementId,
    pub categories: String,
}

/// A page section and its vertical extent `[top, top + height)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollSection {
    pub id: SectionId,
    pub top: f64,
    pub height: f64,
}

impl ScrollSection {
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset < self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatHandle {
    pub element: ElementId,
    pub target: i64,
}
