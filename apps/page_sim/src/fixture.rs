use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use interaction_core::MemoryDom;
use serde::Deserialize;
use shared::domain::ElementId;

fn default_viewport_width() -> f64 {
    1280.0
}

/// A page as a JSON element tree under `<body>`.
#[derive(Debug, Deserialize)]
pub struct PageFixture {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default)]
    pub elements: Vec<ElementFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ElementFixture {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub children: Vec<ElementFixture>,
}

impl PageFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading page fixture {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing page fixture {}", path.display()))
    }

    pub fn build(&self) -> MemoryDom {
        let mut dom = MemoryDom::new(self.viewport_width);
        let body = ElementId(0);
        for element in &self.elements {
            append(&mut dom, body, element);
        }
        dom
    }
}

// Depth-first so element order matches document order.
fn append(dom: &mut MemoryDom, parent: ElementId, fixture: &ElementFixture) {
    let mut builder = dom
        .append(parent, &fixture.tag)
        .text(&fixture.text)
        .layout(fixture.top, fixture.height);
    if let Some(id) = &fixture.id {
        builder = builder.dom_id(id);
    }
    for class in &fixture.classes {
        builder = builder.class(class);
    }
    for (name, value) in &fixture.attributes {
        builder = builder.attr(name, value);
    }
    let element = builder.id();

    if let Some(value) = &fixture.value {
        dom.set_value(element, value);
    }
    if fixture.checked {
        dom.set_checked(element, true);
    }
    for child in &fixture.children {
        append(dom, element, child);
    }
}
