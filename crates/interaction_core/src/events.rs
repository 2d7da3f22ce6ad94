//! Page events routed into the controller and the subscriptions that gate
//! them.

use shared::domain::{ElementId, FilterKey};

use crate::handles::ScrollSection;

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    NavToggleClicked,
    NavLinkClicked { link: ElementId },
    /// Any click, delivered after element-specific handlers ran.
    DocumentClicked { target: ElementId },
    HeaderToggleClicked { toggle: ElementId },
    FormSubmitted { form: ElementId },
    FilterClicked { button: ElementId },
    /// Programmatic filter selection, same rules as a button click.
    FilterSelected { key: FilterKey },
    Scrolled { offset: f64 },
    LayoutChanged { sections: Vec<ScrollSection> },
    StatVisibility { stat: ElementId, ratio: f64 },
    ScrollTopClicked,
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::NavToggleClicked => "nav_toggle_clicked",
            PageEvent::NavLinkClicked { .. } => "nav_link_clicked",
            PageEvent::DocumentClicked { .. } => "document_clicked",
            PageEvent::HeaderToggleClicked { .. } => "header_toggle_clicked",
            PageEvent::FormSubmitted { .. } => "form_submitted",
            PageEvent::FilterClicked { .. } => "filter_clicked",
            PageEvent::FilterSelected { .. } => "filter_selected",
            PageEvent::Scrolled { .. } => "scrolled",
            PageEvent::LayoutChanged { .. } => "layout_changed",
            PageEvent::StatVisibility { .. } => "stat_visibility",
            PageEvent::ScrollTopClicked => "scroll_top_clicked",
        }
    }

    /// The listener that must be registered for this event to be handled.
    pub fn subscription(&self) -> Subscription {
        match self {
            PageEvent::NavToggleClicked => Subscription::NavToggleClick,
            PageEvent::NavLinkClicked { link } => Subscription::NavLinkClick(*link),
            PageEvent::DocumentClicked { .. } => Subscription::DocumentClick,
            PageEvent::HeaderToggleClicked { toggle } => Subscription::HeaderToggleClick(*toggle),
            PageEvent::FormSubmitted { form } => Subscription::FormSubmit(*form),
            PageEvent::FilterClicked { button } => Subscription::FilterClick(*button),
            PageEvent::FilterSelected { .. } => Subscription::FilterSelect,
            PageEvent::Scrolled { .. } => Subscription::WindowScroll,
            PageEvent::LayoutChanged { .. } => Subscription::WindowResize,
            PageEvent::StatVisibility { stat, .. } => Subscription::StatVisibility(*stat),
            PageEvent::ScrollTopClicked => Subscription::ScrollTopClick,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subscription {
    NavToggleClick,
    NavLinkClick(ElementId),
    DocumentClick,
    HeaderToggleClick(ElementId),
    FormSubmit(ElementId),
    FilterClick(ElementId),
    FilterSelect,
    WindowScroll,
    WindowResize,
    StatVisibility(ElementId),
    ScrollTopClick,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub handled: bool,
    pub prevent_default: bool,
}

impl EventOutcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            prevent_default: false,
        }
    }

    pub fn prevented() -> Self {
        Self {
            handled: true,
            prevent_default: true,
        }
    }
}
