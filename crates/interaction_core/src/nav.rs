use shared::{
    config::SiteSettings,
    domain::ElementId,
    selectors::{class, ATTR_ARIA_EXPANDED},
};

use crate::{
    dom::{Dom, ScrollBehavior},
    handles::NavHandles,
    timers::{ScheduledAction, TimerQueue},
};

/// Mobile menu. Without both the toggle and the list every operation is a
/// no-op and the menu stays closed.
#[derive(Debug)]
pub struct NavController {
    handles: Option<NavHandles>,
    body: ElementId,
    open: bool,
    breakpoint_px: f64,
    auto_close_delay_ms: u64,
}

impl NavController {
    pub fn new(handles: Option<NavHandles>, body: ElementId, settings: &SiteSettings) -> Self {
        Self {
            handles,
            body,
            open: false,
            breakpoint_px: settings.nav_breakpoint_px,
            auto_close_delay_ms: settings.nav_auto_close_delay_ms,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.handles.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.handles.is_none() {
            return;
        }
        self.open = !self.open;
        tracing::debug!(open = self.open, "navigation toggled");
        self.render(dom);
    }

    pub fn close<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if self.handles.is_none() {
            return;
        }
        if self.open {
            tracing::debug!("navigation closed");
        }
        self.open = false;
        self.render(dom);
    }

    /// Returns whether the default link navigation must be suppressed.
    pub fn on_link_activate<D: Dom + ?Sized>(
        &mut self,
        href: &str,
        dom: &mut D,
        timers: &mut TimerQueue,
    ) -> bool {
        let mut prevent_default = false;

        if let Some(target_id) = href.strip_prefix('#') {
            prevent_default = true;
            if let Some(target) = dom.element_by_id(target_id) {
                dom.scroll_into_view(target, ScrollBehavior::Smooth);
                if self.open {
                    self.close(dom);
                }
            }
        }

        if self.open && dom.viewport_width() < self.breakpoint_px {
            timers.schedule_once(self.auto_close_delay_ms, ScheduledAction::CloseNav);
        }

        prevent_default
    }

    pub fn on_outside_click<D: Dom + ?Sized>(&mut self, target: ElementId, dom: &mut D) {
        let Some(handles) = self.handles else {
            return;
        };
        if self.open && !dom.contains(handles.list, target) && !dom.contains(handles.toggle, target)
        {
            self.close(dom);
        }
    }

    fn render<D: Dom + ?Sized>(&self, dom: &mut D) {
        let Some(handles) = self.handles else {
            return;
        };
        dom.set_class(handles.list, class::NAV_OPEN, self.open);
        dom.set_attribute(
            handles.toggle,
            ATTR_ARIA_EXPANDED,
            if self.open { "true" } else { "false" },
        );
        dom.set_class(self.body, class::NO_SCROLL, self.open);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryDom, ScrollRequest};

    struct Fixture {
        dom: MemoryDom,
        nav: NavController,
        timers: TimerQueue,
        toggle: ElementId,
        list: ElementId,
        outside: ElementId,
        about: ElementId,
    }

    fn fixture(viewport_width: f64) -> Fixture {
        let mut dom = MemoryDom::new(viewport_width);
        let body = dom.body();
        let toggle = dom.append(body, "button").class("c-nav__toggle").id();
        let list = dom.append(body, "ul").class("c-nav__list").id();
        let outside = dom.append(body, "main").id();
        let about = dom.append(body, "section").dom_id("about").id();
        let nav = NavController::new(
            Some(NavHandles { toggle, list }),
            body,
            &SiteSettings::default(),
        );
        Fixture {
            dom,
            nav,
            timers: TimerQueue::new(),
            toggle,
            list,
            outside,
            about,
        }
    }

    #[test]
    fn toggle_round_trip_restores_projection() {
        let mut f = fixture(1280.0);
        let body = f.dom.body();

        f.nav.toggle(&mut f.dom);
        assert!(f.nav.is_open());
        assert!(f.dom.has_class(f.list, "show"));
        assert_eq!(f.dom.attribute(f.toggle, "aria-expanded").as_deref(), Some("true"));
        assert!(f.dom.has_class(body, "u-no-scroll"));

        f.nav.toggle(&mut f.dom);
        assert!(!f.nav.is_open());
        assert!(!f.dom.has_class(f.list, "show"));
        assert_eq!(f.dom.attribute(f.toggle, "aria-expanded").as_deref(), Some("false"));
        assert!(!f.dom.has_class(body, "u-no-scroll"));
    }

    #[test]
    fn repeated_close_is_observably_idempotent() {
        let mut f = fixture(1280.0);
        f.nav.toggle(&mut f.dom);
        f.nav.close(&mut f.dom);
        let writes = f.dom.mutation_count();
        f.nav.close(&mut f.dom);
        f.nav.close(&mut f.dom);
        assert_eq!(f.dom.mutation_count(), writes);
    }

    #[test]
    fn anchor_link_scrolls_and_closes() {
        let mut f = fixture(1280.0);
        f.nav.toggle(&mut f.dom);

        let prevented = f.nav.on_link_activate("#about", &mut f.dom, &mut f.timers);
        assert!(prevented);
        assert!(!f.nav.is_open());
        assert_eq!(
            f.dom.scroll_requests(),
            &[ScrollRequest::IntoView {
                element: f.about,
                behavior: ScrollBehavior::Smooth
            }]
        );
        assert!(f.timers.is_empty());
    }

    #[test]
    fn external_link_on_narrow_viewport_schedules_auto_close() {
        let mut f = fixture(768.0);
        f.nav.toggle(&mut f.dom);

        let prevented = f.nav.on_link_activate("/blog", &mut f.dom, &mut f.timers);
        assert!(!prevented);
        assert!(f.nav.is_open());
        assert_eq!(f.timers.next_deadline(), Some(300));
    }

    #[test]
    fn missing_anchor_target_keeps_menu_open_but_prevents_default() {
        let mut f = fixture(1280.0);
        f.nav.toggle(&mut f.dom);
        assert!(f.nav.on_link_activate("#nowhere", &mut f.dom, &mut f.timers));
        assert!(f.nav.is_open());
        assert!(f.timers.is_empty());
    }

    #[test]
    fn outside_click_closes_only_outside_nav() {
        let mut f = fixture(1280.0);
        f.nav.toggle(&mut f.dom);

        f.nav.on_outside_click(f.list, &mut f.dom);
        f.nav.on_outside_click(f.toggle, &mut f.dom);
        assert!(f.nav.is_open());

        f.nav.on_outside_click(f.outside, &mut f.dom);
        assert!(!f.nav.is_open());
    }

    #[test]
    fn disabled_without_handles() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let mut nav = NavController::new(None, body, &SiteSettings::default());
        nav.toggle(&mut dom);
        assert!(!nav.is_open());
        assert_eq!(dom.mutation_count(), 0);
    }
}
