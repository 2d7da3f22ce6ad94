//! Contact form submit flow: clear previous errors, validate, render
//! failures, or lock the form and hand off delivery.

use shared::{
    config::{FormMessages, SiteSettings},
    domain::{ElementId, FormField},
    protocol::ContactSubmission,
    selectors::{class, ATTR_DISABLED},
};

use crate::{
    dom::Dom,
    handles::FormHandles,
    timers::{ScheduledAction, TimerQueue},
    transport::SubmitError,
    validation::{validate, FormSnapshot, ValidationOutcome},
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum SubmitMode {
    /// Fixed delay, then redirect to the confirmation page.
    Simulated { redirect_delay_ms: u64 },
    /// Hand the validated values to the host for delivery.
    Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// Another submission is already in flight.
    Ignored,
    Invalid(ValidationOutcome),
    Submitted,
}

#[derive(Debug)]
struct InFlight {
    form: ElementId,
    submit: Option<ElementId>,
    original_label: Option<String>,
}

#[derive(Debug)]
pub struct FormController {
    messages: FormMessages,
    mode: SubmitMode,
    confirmation_url: String,
    submitting: bool,
    in_flight: Option<InFlight>,
    pending: Option<ContactSubmission>,
}

impl FormController {
    pub fn new(settings: &SiteSettings) -> Self {
        let mode = if settings.submit_endpoint.is_some() {
            SubmitMode::Endpoint
        } else {
            SubmitMode::Simulated {
                redirect_delay_ms: settings.submit_redirect_delay_ms,
            }
        };
        Self {
            messages: settings.messages.clone(),
            mode,
            confirmation_url: settings.confirmation_url.clone(),
            submitting: false,
            in_flight: None,
            pending: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit<D: Dom + ?Sized>(
        &mut self,
        form: &FormHandles,
        dom: &mut D,
        timers: &mut TimerQueue,
    ) -> SubmitAttempt {
        if self.submitting {
            tracing::debug!(form = form.form.0, "submit ignored; already submitting");
            return SubmitAttempt::Ignored;
        }

        clear_errors(form, dom);

        let snapshot = FormSnapshot::read(form, dom);
        let outcome = validate(&snapshot, &self.messages);
        if !outcome.is_valid() {
            render_errors(form, &outcome, dom);
            tracing::debug!(
                form = form.form.0,
                failures = outcome.failures().count(),
                "form validation failed"
            );
            return SubmitAttempt::Invalid(outcome);
        }

        self.submitting = true;
        let original_label = form.submit.map(|submit| {
            let label = dom.text(submit);
            dom.add_class(submit, class::LOADING);
            dom.set_attribute(submit, ATTR_DISABLED, ATTR_DISABLED);
            dom.set_text(submit, &self.messages.sending);
            label
        });
        self.in_flight = Some(InFlight {
            form: form.form,
            submit: form.submit,
            original_label,
        });

        match self.mode {
            SubmitMode::Simulated { redirect_delay_ms } => {
                timers.schedule_once(
                    redirect_delay_ms,
                    ScheduledAction::CompleteSubmit { form: form.form },
                );
            }
            SubmitMode::Endpoint => {
                self.pending = Some(build_submission(form.form, &snapshot));
            }
        }

        tracing::info!(form = form.form.0, "contact form submitted");
        SubmitAttempt::Submitted
    }

    pub fn take_pending(&mut self) -> Option<ContactSubmission> {
        self.pending.take()
    }

    /// Finishes the in-flight submission. Success redirects; failure unlocks
    /// the form and shows a retryable message.
    pub fn complete<D: Dom + ?Sized>(
        &mut self,
        form: &FormHandles,
        result: Result<(), SubmitError>,
        dom: &mut D,
    ) {
        let Some(in_flight) = self.in_flight.take_if(|in_flight| in_flight.form == form.form)
        else {
            tracing::warn!(form = form.form.0, "completion for a form that is not submitting");
            return;
        };

        match result {
            Ok(()) => {
                tracing::info!(url = %self.confirmation_url, "redirecting to confirmation page");
                dom.navigate(&self.confirmation_url);
            }
            Err(err) => {
                tracing::warn!(form = form.form.0, error = %err, "contact form delivery failed");
                self.submitting = false;
                if let Some(submit) = in_flight.submit {
                    dom.remove_class(submit, class::LOADING);
                    dom.remove_attribute(submit, ATTR_DISABLED);
                    if let Some(label) = &in_flight.original_label {
                        dom.set_text(submit, label);
                    }
                }
                if let Some(status) = form.status {
                    dom.set_text(status, &self.messages.submit_failed);
                    dom.add_class(status, class::FIELD_ERROR);
                }
            }
        }
    }
}

fn clear_errors<D: Dom + ?Sized>(form: &FormHandles, dom: &mut D) {
    for field in &form.fields {
        if let Some(group) = field.group {
            dom.remove_class(group, class::GROUP_ERROR);
        }
        if let Some(error) = field.error {
            dom.set_text(error, "");
        }
        dom.remove_class(field.input, class::FIELD_ERROR);
    }
    if let Some(status) = form.status {
        dom.set_text(status, "");
        dom.remove_class(status, class::FIELD_ERROR);
    }
}

fn render_errors<D: Dom + ?Sized>(form: &FormHandles, outcome: &ValidationOutcome, dom: &mut D) {
    for failure in outcome.failures() {
        let Some(handle) = form.field(failure.field) else {
            continue;
        };
        if let Some(group) = handle.group {
            dom.add_class(group, class::GROUP_ERROR);
            if let (Some(error), Some(message)) = (handle.error, failure.message.as_deref()) {
                dom.set_text(error, message);
            }
        }
        dom.add_class(handle.input, class::FIELD_ERROR);
    }
}

fn build_submission(form: ElementId, snapshot: &FormSnapshot) -> ContactSubmission {
    let value = |field| snapshot.trimmed(field).map(str::to_string);
    let mut submission = ContactSubmission::new(form);
    submission.name = value(FormField::Name);
    submission.email = value(FormField::Email);
    submission.phone = value(FormField::Phone);
    submission.subject = value(FormField::Subject);
    submission.message = value(FormField::Message);
    submission.consent = snapshot
        .input(FormField::Consent)
        .is_some_and(|input| input.checked);
    submission
}
