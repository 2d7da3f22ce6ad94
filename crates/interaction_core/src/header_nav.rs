use shared::{
    domain::ElementId,
    selectors::{class, ATTR_ARIA_EXPANDED},
};

use crate::{dom::Dom, handles::HeaderNavHandles};

/// Independent open/closed toggles for `.dr-header` blocks.
#[derive(Debug, Default)]
pub struct HeaderNav {
    headers: Vec<(HeaderNavHandles, bool)>,
}

impl HeaderNav {
    /// Headers already carrying the open class in markup start open.
    pub fn new<D: Dom + ?Sized>(headers: &[HeaderNavHandles], dom: &D) -> Self {
        Self {
            headers: headers
                .iter()
                .map(|handles| (*handles, dom.has_class(handles.header, class::HEADER_NAV_OPEN)))
                .collect(),
        }
    }

    pub fn is_open(&self, header: ElementId) -> bool {
        self.headers
            .iter()
            .any(|(handles, open)| handles.header == header && *open)
    }

    /// Accepts either the header or its toggle as the clicked element.
    pub fn toggle<D: Dom + ?Sized>(&mut self, clicked: ElementId, dom: &mut D) -> bool {
        let Some((handles, open)) = self
            .headers
            .iter_mut()
            .find(|(handles, _)| handles.header == clicked || handles.toggle == clicked)
        else {
            return false;
        };

        *open = !*open;
        dom.set_class(handles.header, class::HEADER_NAV_OPEN, *open);
        dom.set_attribute(
            handles.toggle,
            ATTR_ARIA_EXPANDED,
            if *open { "true" } else { "false" },
        );
        tracing::debug!(header = handles.header.0, open = *open, "header navigation toggled");
        true
    }
}
