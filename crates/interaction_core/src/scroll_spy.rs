use shared::{domain::SectionId, selectors::class};

use crate::{
    dom::Dom,
    handles::{NavLink, ScrollSection},
};

#[derive(Debug, Default)]
pub struct ScrollSpy {
    sections: Vec<ScrollSection>,
    links: Vec<NavLink>,
    lookahead_px: f64,
    current: Option<SectionId>,
}

impl ScrollSpy {
    pub fn new(sections: Vec<ScrollSection>, links: Vec<NavLink>, lookahead_px: f64) -> Self {
        Self {
            sections,
            links,
            lookahead_px,
            current: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.sections.is_empty()
    }

    pub fn current(&self) -> Option<&SectionId> {
        self.current.as_ref()
    }

    pub fn set_sections(&mut self, sections: Vec<ScrollSection>) {
        self.sections = sections;
    }

    /// First section in document order whose extent contains the probe.
    pub fn section_at(&self, offset: f64) -> Option<&ScrollSection> {
        let probe = offset + self.lookahead_px;
        self.sections.iter().find(|section| section.contains(probe))
    }

    /// Re-highlights navigation links for a scroll offset. When no section
    /// contains the probe the previous highlight stays.
    pub fn on_scroll<D: Dom + ?Sized>(&mut self, offset: f64, dom: &mut D) {
        let Some(section) = self.section_at(offset) else {
            return;
        };
        if self.current.as_ref() == Some(&section.id) {
            return;
        }

        let id = section.id.clone();
        let anchor = id.anchor();
        for link in &self.links {
            let active = link.href == anchor;
            dom.set_class(link.element, class::LINK_ACTIVE, active);
            dom.set_class(link.element, class::IS_ACTIVE, active);
        }

        tracing::debug!(section = %id, "scroll spy moved");
        self.current = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;
    use shared::domain::ElementId;

    fn section(id: &str, top: f64, height: f64) -> ScrollSection {
        ScrollSection {
            id: SectionId::new(id),
            top,
            height,
        }
    }

    fn fixture() -> (MemoryDom, ScrollSpy, Vec<ElementId>) {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let hrefs = ["#home", "#services", "#contact", "/blog"];
        let links: Vec<NavLink> = hrefs
            .iter()
            .map(|href| NavLink {
                element: dom.append(body, "a").attr("href", href).id(),
                href: href.to_string(),
            })
            .collect();
        let elements = links.iter().map(|link| link.element).collect();
        let spy = ScrollSpy::new(
            vec![
                section("home", 0.0, 600.0),
                section("services", 600.0, 800.0),
                section("contact", 1400.0, 500.0),
            ],
            links,
            100.0,
        );
        (dom, spy, elements)
    }

    #[test]
    fn probe_looks_ahead_of_offset() {
        let (mut dom, mut spy, links) = fixture();

        spy.on_scroll(450.0, &mut dom);
        assert_eq!(spy.current(), Some(&SectionId::new("home")));

        spy.on_scroll(500.0, &mut dom);
        assert_eq!(spy.current(), Some(&SectionId::new("services")));
        assert!(dom.has_class(links[1], "active"));
        assert!(dom.has_class(links[1], "is-active"));
        assert!(!dom.has_class(links[0], "active"));
        assert!(!dom.has_class(links[3], "is-active"));
    }

    #[test]
    fn past_last_section_keeps_previous_highlight() {
        let (mut dom, mut spy, links) = fixture();
        spy.on_scroll(1500.0, &mut dom);
        spy.on_scroll(5000.0, &mut dom);
        assert_eq!(spy.current(), Some(&SectionId::new("contact")));
        assert!(dom.has_class(links[2], "active"));
    }

    #[test]
    fn overlapping_sections_resolve_to_first_in_document_order() {
        let mut spy = ScrollSpy::new(
            vec![section("a", 0.0, 500.0), section("b", 200.0, 500.0)],
            Vec::new(),
            100.0,
        );
        let mut dom = MemoryDom::default();
        spy.on_scroll(250.0, &mut dom);
        assert_eq!(spy.current(), Some(&SectionId::new("a")));
    }

    #[test]
    fn unchanged_section_writes_nothing() {
        let (mut dom, mut spy, _) = fixture();
        spy.on_scroll(0.0, &mut dom);
        let writes = dom.mutation_count();
        spy.on_scroll(10.0, &mut dom);
        spy.on_scroll(20.0, &mut dom);
        assert_eq!(dom.mutation_count(), writes);
    }
}
