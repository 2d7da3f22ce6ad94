use shared::{
    domain::{ElementId, FilterKey},
    selectors::class,
};

use crate::{
    dom::Dom,
    handles::{FilterButton, FilterItem},
};

/// Portfolio filter with exactly one active button once initialized.
#[derive(Debug, Default)]
pub struct FilterController {
    buttons: Vec<FilterButton>,
    items: Vec<FilterItem>,
    active: Option<FilterKey>,
}

impl FilterController {
    pub fn new(buttons: Vec<FilterButton>, items: Vec<FilterItem>) -> Self {
        Self {
            buttons,
            items,
            active: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.buttons.is_empty()
    }

    pub fn active(&self) -> Option<&FilterKey> {
        self.active.as_ref()
    }

    /// Picks the starting filter from the markup (the button already styled
    /// active, else `all`, else the first one) and projects it.
    pub fn initialize<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        let initial = self
            .buttons
            .iter()
            .position(|button| dom.has_class(button.element, class::IS_ACTIVE))
            .or_else(|| self.buttons.iter().position(|button| button.key.is_all()))
            .or_else(|| (!self.buttons.is_empty()).then_some(0));

        if let Some(index) = initial {
            self.select(index, dom);
        }
    }

    /// Activates the clicked button itself, even when another button shares
    /// its key.
    pub fn click<D: Dom + ?Sized>(&mut self, button: ElementId, dom: &mut D) -> bool {
        let Some(index) = self
            .buttons
            .iter()
            .position(|candidate| candidate.element == button)
        else {
            return false;
        };
        self.select(index, dom);
        true
    }

    /// Activates the first button carrying `key` and shows the matching
    /// items. Keys without a button are ignored so one button always stays
    /// active.
    pub fn apply<D: Dom + ?Sized>(&mut self, key: &FilterKey, dom: &mut D) -> bool {
        let Some(index) = self
            .buttons
            .iter()
            .position(|button| &button.key == key)
        else {
            tracing::warn!(filter = %key, "no filter button for key");
            return false;
        };
        self.select(index, dom);
        true
    }

    fn select<D: Dom + ?Sized>(&mut self, selected: usize, dom: &mut D) {
        for (index, button) in self.buttons.iter().enumerate() {
            let is_selected = index == selected;
            dom.set_class(button.element, class::IS_ACTIVE, is_selected);
            dom.set_class(button.element, class::BUTTON_PRIMARY, is_selected);
            dom.set_class(button.element, class::BUTTON_SECONDARY, !is_selected);
        }

        let key = self.buttons[selected].key.clone();
        for item in &self.items {
            dom.set_hidden(item.element, !key.matches_categories(&item.categories));
        }

        tracing::debug!(filter = %key, "applied portfolio filter");
        self.active = Some(key);
    }
}
