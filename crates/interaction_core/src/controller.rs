use std::collections::HashSet;

use serde::Serialize;
use shared::{
    config::SiteSettings,
    domain::{ElementId, FilterKey, SectionId},
    protocol::ContactSubmission,
};

use crate::{
    count_up::{CountUp, CounterTarget},
    dom::Dom,
    events::{EventOutcome, PageEvent, Subscription},
    filter::FilterController,
    form::{FormController, SubmitAttempt},
    handles::PageHandles,
    header_nav::HeaderNav,
    nav::NavController,
    scroll_spy::ScrollSpy,
    scroll_top::ScrollTop,
    timers::{ScheduledAction, TimerQueue},
    transport::SubmitError,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InteractionState {
    pub nav_open: bool,
    pub form_submitting: bool,
}

/// Owns every piece of interaction state for one page and projects it onto
/// the DOM. Events are only handled between [`attach`](Self::attach) and
/// [`detach`](Self::detach).
pub struct PageController<D: Dom> {
    dom: D,
    handles: PageHandles,
    nav: NavController,
    headers: HeaderNav,
    form: FormController,
    filter: FilterController,
    spy: ScrollSpy,
    count_up: CountUp,
    scroll_top: ScrollTop,
    timers: TimerQueue,
    subscriptions: HashSet<Subscription>,
    scroll_offset: f64,
}

impl<D: Dom> PageController<D> {
    pub fn new(dom: D, handles: PageHandles, settings: &SiteSettings) -> Self {
        Self {
            nav: NavController::new(handles.nav, handles.body, settings),
            headers: HeaderNav::new(&handles.headers, &dom),
            form: FormController::new(settings),
            filter: FilterController::new(
                handles.filter_buttons.clone(),
                handles.filter_items.clone(),
            ),
            spy: ScrollSpy::new(
                handles.sections.clone(),
                handles.nav_links.clone(),
                settings.scroll_spy_lookahead_px,
            ),
            count_up: CountUp::new(
                &handles.stats,
                settings.count_duration_ms,
                settings.count_tick_ms,
                settings.count_visibility_threshold,
            ),
            scroll_top: ScrollTop::new(handles.scroll_top, settings.scroll_top_threshold_px),
            timers: TimerQueue::new(),
            subscriptions: HashSet::new(),
            scroll_offset: 0.0,
            dom,
            handles,
        }
    }

    /// Registers listeners for every feature whose handles are present and
    /// projects the initial filter. Calling it again is harmless.
    pub fn attach(&mut self) -> usize {
        let mut subscriptions = Vec::new();

        if self.nav.is_enabled() {
            subscriptions.push(Subscription::NavToggleClick);
            subscriptions.push(Subscription::DocumentClick);
        }
        subscriptions.extend(
            self.handles
                .nav_links
                .iter()
                .map(|link| Subscription::NavLinkClick(link.element)),
        );
        subscriptions.extend(
            self.handles
                .headers
                .iter()
                .map(|header| Subscription::HeaderToggleClick(header.toggle)),
        );
        subscriptions.extend(
            self.handles
                .forms
                .iter()
                .map(|form| Subscription::FormSubmit(form.form)),
        );
        if self.filter.is_enabled() {
            subscriptions.extend(
                self.handles
                    .filter_buttons
                    .iter()
                    .map(|button| Subscription::FilterClick(button.element)),
            );
            subscriptions.push(Subscription::FilterSelect);
        }
        if self.scroll_top.is_enabled() {
            subscriptions.push(Subscription::ScrollTopClick);
        }
        if self.scroll_top.is_enabled() || self.spy.is_enabled() {
            subscriptions.push(Subscription::WindowScroll);
        }
        if self.spy.is_enabled() {
            subscriptions.push(Subscription::WindowResize);
        }
        subscriptions.extend(
            self.handles
                .stats
                .iter()
                .map(|stat| Subscription::StatVisibility(stat.element)),
        );

        let first_attach = self.subscriptions.is_empty();
        self.subscriptions.extend(subscriptions);
        if first_attach && self.filter.is_enabled() {
            self.filter.initialize(&mut self.dom);
        }

        tracing::debug!(subscriptions = self.subscriptions.len(), "page controller attached");
        self.subscriptions.len()
    }

    /// Drops every listener and cancels all scheduled work.
    pub fn detach(&mut self) {
        self.subscriptions.clear();
        self.count_up.stop_all(&mut self.timers);
        self.timers.cancel_all();
        tracing::debug!("page controller detached");
    }

    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn is_subscribed(&self, subscription: Subscription) -> bool {
        self.subscriptions.contains(&subscription)
    }

    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        if !self.subscriptions.contains(&event.subscription()) {
            tracing::trace!(event = event.name(), "no listener for event");
            return EventOutcome::ignored();
        }

        match event {
            PageEvent::NavToggleClicked => {
                self.nav.toggle(&mut self.dom);
                EventOutcome::prevented()
            }
            PageEvent::NavLinkClicked { link } => {
                let Some(href) = self
                    .handles
                    .nav_links
                    .iter()
                    .find(|candidate| candidate.element == link)
                    .map(|candidate| candidate.href.clone())
                else {
                    return EventOutcome::ignored();
                };
                if self.nav.on_link_activate(&href, &mut self.dom, &mut self.timers) {
                    EventOutcome::prevented()
                } else {
                    EventOutcome::handled()
                }
            }
            PageEvent::DocumentClicked { target } => {
                self.nav.on_outside_click(target, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::HeaderToggleClicked { toggle } => {
                self.headers.toggle(toggle, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::FormSubmitted { form } => {
                let Some(handles) = self.handles.form(form) else {
                    return EventOutcome::ignored();
                };
                match self.form.submit(handles, &mut self.dom, &mut self.timers) {
                    SubmitAttempt::Invalid(outcome) => {
                        tracing::debug!(
                            fields = ?outcome.failures().map(|f| f.field).collect::<Vec<_>>(),
                            "submission blocked by validation"
                        );
                    }
                    SubmitAttempt::Ignored | SubmitAttempt::Submitted => {}
                }
                EventOutcome::prevented()
            }
            PageEvent::FilterClicked { button } => {
                self.filter.click(button, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::FilterSelected { key } => {
                self.filter.apply(&key, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::Scrolled { offset } => {
                self.scroll_offset = offset;
                self.scroll_top.on_scroll(offset, &mut self.dom);
                self.spy.on_scroll(offset, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::LayoutChanged { sections } => {
                self.spy.set_sections(sections);
                self.spy.on_scroll(self.scroll_offset, &mut self.dom);
                EventOutcome::handled()
            }
            PageEvent::StatVisibility { stat, ratio } => {
                self.count_up
                    .on_visibility(stat, ratio, &mut self.dom, &mut self.timers);
                EventOutcome::handled()
            }
            PageEvent::ScrollTopClicked => {
                self.scroll_top.activate(&mut self.dom);
                EventOutcome::prevented()
            }
        }
    }

    /// Moves virtual time forward, running every timer that falls due.
    pub fn advance(&mut self, elapsed_ms: u64) {
        let until = self.timers.now_ms().saturating_add(elapsed_ms);
        while let Some((_, action)) = self.timers.pop_due(until) {
            self.run_scheduled(action);
        }
        self.timers.set_now(until);
    }

    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Validated values waiting for delivery when an endpoint is configured.
    pub fn take_pending_submission(&mut self) -> Option<ContactSubmission> {
        self.form.take_pending()
    }

    pub fn complete_submission(&mut self, form: ElementId, result: Result<(), SubmitError>) {
        match self.handles.form(form) {
            Some(handles) => self.form.complete(handles, result, &mut self.dom),
            None => tracing::warn!(form = form.0, "completion for unknown form"),
        }
    }

    pub fn state(&self) -> InteractionState {
        InteractionState {
            nav_open: self.nav.is_open(),
            form_submitting: self.form.is_submitting(),
        }
    }

    pub fn active_filter(&self) -> Option<&FilterKey> {
        self.filter.active()
    }

    pub fn current_section(&self) -> Option<&SectionId> {
        self.spy.current()
    }

    pub fn counter(&self, stat: ElementId) -> Option<&CounterTarget> {
        self.count_up.counter(stat)
    }

    pub fn handles(&self) -> &PageHandles {
        &self.handles
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Host-side access for input the controller does not own (typing,
    /// viewport changes).
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    fn run_scheduled(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::CloseNav => self.nav.close(&mut self.dom),
            ScheduledAction::CompleteSubmit { form } => self.complete_submission(form, Ok(())),
            ScheduledAction::CountTick { stat } => {
                self.count_up.tick(stat, &mut self.dom, &mut self.timers);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
