use std::{fs, path::Path};

use anyhow::{anyhow, Context, Result};
use interaction_core::{
    discovery::discover_sections, Dom, EventOutcome, InteractionState, MemoryDom, PageController,
    PageEvent, SubmissionTransport,
};
use serde::{Deserialize, Serialize};
use shared::domain::{ElementId, FilterKey, SectionId};

/// One scripted user or browser action. Targets are DOM ids.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Click { target: String },
    Submit { form: String },
    Type { target: String, value: String },
    Check { target: String, checked: bool },
    Scroll { offset: f64 },
    Visible { target: String, ratio: f64 },
    Resize { width: f64 },
    Filter { key: String },
    Wait { ms: u64 },
}

pub fn load_script(path: &Path) -> Result<Vec<Step>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading event script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing event script {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub now_ms: u64,
    pub state: InteractionState,
    pub active_filter: Option<&'a FilterKey>,
    pub current_section: Option<&'a SectionId>,
    pub pending_timers: usize,
    pub dom: &'a MemoryDom,
}

pub struct Driver {
    controller: PageController<MemoryDom>,
    transport: Option<Box<dyn SubmissionTransport>>,
}

impl Driver {
    pub fn new(
        controller: PageController<MemoryDom>,
        transport: Option<Box<dyn SubmissionTransport>>,
    ) -> Self {
        Self {
            controller,
            transport,
        }
    }

    pub fn controller(&self) -> &PageController<MemoryDom> {
        &self.controller
    }

    pub async fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            tracing::debug!(index, ?step, "running step");
            self.step(step)
                .await
                .with_context(|| format!("script step {index} failed"))?;
        }
        Ok(())
    }

    pub async fn step(&mut self, step: &Step) -> Result<()> {
        match step {
            Step::Click { target } => {
                let target = self.resolve(target)?;
                let outcome = self.click(target);
                tracing::debug!(
                    handled = outcome.handled,
                    prevent_default = outcome.prevent_default,
                    "click routed"
                );
            }
            Step::Submit { form } => {
                let form = self.resolve(form)?;
                self.controller.dispatch(PageEvent::FormSubmitted { form });
            }
            Step::Type { target, value } => {
                let target = self.resolve(target)?;
                self.controller.dom_mut().set_value(target, value);
            }
            Step::Check { target, checked } => {
                let target = self.resolve(target)?;
                self.controller.dom_mut().set_checked(target, *checked);
            }
            Step::Scroll { offset } => {
                self.controller.dispatch(PageEvent::Scrolled { offset: *offset });
            }
            Step::Visible { target, ratio } => {
                let stat = self.resolve(target)?;
                self.controller.dispatch(PageEvent::StatVisibility {
                    stat,
                    ratio: *ratio,
                });
            }
            Step::Resize { width } => {
                self.controller.dom_mut().set_viewport_width(*width);
                let sections = discover_sections(self.controller.dom());
                self.controller
                    .dispatch(PageEvent::LayoutChanged { sections });
            }
            Step::Filter { key } => {
                self.controller.dispatch(PageEvent::FilterSelected {
                    key: FilterKey::new(key.as_str()),
                });
            }
            Step::Wait { ms } => self.controller.advance(*ms),
        }

        self.deliver_pending().await;
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            now_ms: self.controller.now_ms(),
            state: self.controller.state(),
            active_filter: self.controller.active_filter(),
            current_section: self.controller.current_section(),
            pending_timers: self.controller.pending_timers(),
            dom: self.controller.dom(),
        }
    }

    fn resolve(&self, dom_id: &str) -> Result<ElementId> {
        self.controller
            .dom()
            .element_by_id(dom_id)
            .ok_or_else(|| anyhow!("no element with id '{dom_id}'"))
    }

    fn click(&mut self, target: ElementId) -> EventOutcome {
        let mut outcome = EventOutcome::ignored();
        for event in route_click(&self.controller, target) {
            let result = self.controller.dispatch(event);
            outcome.handled |= result.handled;
            outcome.prevent_default |= result.prevent_default;
        }
        outcome
    }

    async fn deliver_pending(&mut self) {
        let Some(submission) = self.controller.take_pending_submission() else {
            return;
        };
        let Some(transport) = &self.transport else {
            tracing::warn!("endpoint submission produced without a transport");
            return;
        };
        let result = transport.submit(&submission).await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, retryable = err.is_retryable(), "delivery failed");
        }
        self.controller
            .complete_submission(submission.form_id, result);
    }
}

/// Element-specific events for a click on `target`, followed by the
/// document-level click that every click bubbles to.
pub fn route_click(controller: &PageController<MemoryDom>, target: ElementId) -> Vec<PageEvent> {
    let dom = controller.dom();
    let handles = controller.handles();
    let mut events = Vec::new();

    if let Some(nav) = handles.nav {
        if dom.contains(nav.toggle, target) {
            events.push(PageEvent::NavToggleClicked);
        }
    }
    if let Some(link) = handles
        .nav_links
        .iter()
        .find(|link| dom.contains(link.element, target))
    {
        events.push(PageEvent::NavLinkClicked { link: link.element });
    }
    if let Some(header) = handles
        .headers
        .iter()
        .find(|header| dom.contains(header.toggle, target))
    {
        events.push(PageEvent::HeaderToggleClicked {
            toggle: header.toggle,
        });
    }
    if let Some(button) = handles
        .filter_buttons
        .iter()
        .find(|button| dom.contains(button.element, target))
    {
        events.push(PageEvent::FilterClicked {
            button: button.element,
        });
    }
    if handles
        .scroll_top
        .is_some_and(|scroll_top| dom.contains(scroll_top, target))
    {
        events.push(PageEvent::ScrollTopClicked);
    }
    if let Some(form) = handles.forms.iter().find(|form| {
        form.submit
            .is_some_and(|submit| dom.contains(submit, target))
    }) {
        events.push(PageEvent::FormSubmitted { form: form.form });
    }

    events.push(PageEvent::DocumentClicked { target });
    events
}
