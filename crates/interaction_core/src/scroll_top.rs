use shared::{domain::ElementId, selectors::class};

use crate::dom::{Dom, ScrollBehavior};

#[derive(Debug)]
pub struct ScrollTop {
    button: Option<ElementId>,
    threshold_px: f64,
    visible: bool,
}

impl ScrollTop {
    pub fn new(button: Option<ElementId>, threshold_px: f64) -> Self {
        Self {
            button,
            threshold_px,
            visible: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.button.is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn on_scroll<D: Dom + ?Sized>(&mut self, offset: f64, dom: &mut D) {
        let Some(button) = self.button else {
            return;
        };
        self.visible = offset > self.threshold_px;
        dom.set_class(button, class::VISIBLE, self.visible);
    }

    pub fn activate<D: Dom + ?Sized>(&self, dom: &mut D) {
        dom.scroll_to(0.0, ScrollBehavior::Smooth);
    }
}
