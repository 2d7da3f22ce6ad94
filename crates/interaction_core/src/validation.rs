//! Contact form rules. Every present field is checked in one pass so all
//! failures can be rendered together.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use shared::{config::FormMessages, domain::FormField};

use crate::{dom::Dom, handles::FormHandles};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+0-9\s()\-]{7,20}$").expect("static phone pattern"));

const NAME_MIN_CHARS: usize = 2;
const MESSAGE_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInput {
    pub field: FormField,
    pub value: String,
    pub checked: bool,
    pub required: bool,
}

/// Field values read from a form at submit time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub inputs: Vec<FieldInput>,
}

impl FormSnapshot {
    pub fn read<D: Dom + ?Sized>(form: &FormHandles, dom: &D) -> Self {
        let inputs = form
            .fields
            .iter()
            .map(|handle| FieldInput {
                field: handle.field,
                value: dom.value(handle.input),
                checked: dom.is_checked(handle.input),
                required: dom.has_attribute(handle.input, "required"),
            })
            .collect();
        Self { inputs }
    }

    pub fn with(mut self, field: FormField, value: &str, required: bool) -> Self {
        self.inputs.push(FieldInput {
            field,
            value: value.to_string(),
            checked: false,
            required,
        });
        self
    }

    pub fn with_checkbox(mut self, field: FormField, checked: bool, required: bool) -> Self {
        self.inputs.push(FieldInput {
            field,
            value: String::new(),
            checked,
            required,
        });
        self
    }

    pub fn input(&self, field: FormField) -> Option<&FieldInput> {
        self.inputs.iter().find(|input| input.field == field)
    }

    /// Trimmed value of a non-empty field.
    pub fn trimmed(&self, field: FormField) -> Option<&str> {
        self.input(field)
            .map(|input| input.value.trim())
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationResult {
    pub field: FormField,
    pub valid: bool,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub results: Vec<FieldValidationResult>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|result| result.valid)
    }

    pub fn failures(&self) -> impl Iterator<Item = &FieldValidationResult> {
        self.results.iter().filter(|result| !result.valid)
    }

    pub fn message_for(&self, field: FormField) -> Option<&str> {
        self.results
            .iter()
            .find(|result| result.field == field)
            .and_then(|result| result.message.as_deref())
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn validate(snapshot: &FormSnapshot, messages: &FormMessages) -> ValidationOutcome {
    let results = snapshot
        .inputs
        .iter()
        .filter_map(|input| check_field(input, messages))
        .collect();
    ValidationOutcome { results }
}

fn check_field(input: &FieldInput, messages: &FormMessages) -> Option<FieldValidationResult> {
    let value = input.value.trim();
    let chars = value.chars().count();

    let failure = match input.field {
        FormField::Phone => {
            if value.is_empty() {
                return None;
            }
            (!is_valid_phone(value)).then_some(&messages.phone_invalid)
        }
        _ if !input.required => return None,
        FormField::Name if value.is_empty() => Some(&messages.name_required),
        FormField::Name => (chars < NAME_MIN_CHARS).then_some(&messages.name_too_short),
        FormField::Email if value.is_empty() => Some(&messages.email_required),
        FormField::Email => (!is_valid_email(value)).then_some(&messages.email_invalid),
        FormField::Subject => value.is_empty().then_some(&messages.subject_required),
        FormField::Message if value.is_empty() => Some(&messages.message_required),
        FormField::Message => (chars < MESSAGE_MIN_CHARS).then_some(&messages.message_too_short),
        FormField::Consent => (!input.checked).then_some(&messages.consent_required),
    };

    Some(FieldValidationResult {
        field: input.field,
        valid: failure.is_none(),
        message: failure.cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages() -> FormMessages {
        FormMessages::default()
    }

    #[test]
    fn email_examples() {
        assert!(is_valid_email("a@b.c"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("ab.c"));
        assert!(!is_valid_email("a @b.c"));
        assert!(!is_valid_email("a@@b.c"));
    }

    #[test]
    fn phone_examples() {
        let check = |phone: &str| {
            validate(&FormSnapshot::default().with(FormField::Phone, phone, false), &messages())
        };
        assert!(check("").is_valid());
        assert!(check("").results.is_empty());
        assert!(!check("123").is_valid());
        assert!(check("+421 900 123 456").is_valid());
        assert!(check("(02) 555-1234").is_valid());
        assert!(!check("+421 900 123 456 789 000").is_valid());
        assert!(!check("call me 1234").is_valid());
    }

    #[test]
    fn message_length_boundary() {
        let check = |message: &str| {
            validate(
                &FormSnapshot::default().with(FormField::Message, message, true),
                &messages(),
            )
        };
        let short = check("123456789");
        assert_eq!(short.message_for(FormField::Message), Some("Správa musí mať aspoň 10 znakov"));
        assert!(check("1234567890").is_valid());
        assert!(!check("   123456789   ").is_valid());
    }

    #[test]
    fn empty_required_fields_all_reported() {
        let snapshot = FormSnapshot::default()
            .with(FormField::Name, "", true)
            .with(FormField::Email, "  ", true)
            .with(FormField::Phone, "", false)
            .with(FormField::Subject, "", true)
            .with(FormField::Message, "", true)
            .with_checkbox(FormField::Consent, false, true);

        let outcome = validate(&snapshot, &messages());
        assert!(!outcome.is_valid());
        assert_eq!(outcome.failures().count(), 5);
        assert_eq!(outcome.message_for(FormField::Name), Some("Meno je povinné"));
        assert_eq!(outcome.message_for(FormField::Email), Some("E-mail je povinný"));
        assert_eq!(outcome.message_for(FormField::Subject), Some("Predmet je povinný"));
        assert_eq!(outcome.message_for(FormField::Message), Some("Správa je povinná"));
        assert_eq!(
            outcome.message_for(FormField::Consent),
            Some("Musíte súhlasiť so spracovaním osobných údajov")
        );
        assert_eq!(outcome.message_for(FormField::Phone), None);
    }

    #[test]
    fn optional_fields_are_not_checked() {
        let snapshot = FormSnapshot::default()
            .with(FormField::Name, "", false)
            .with(FormField::Email, "nope", false)
            .with_checkbox(FormField::Consent, false, false);
        let outcome = validate(&snapshot, &messages());
        assert!(outcome.is_valid());
        assert!(outcome.results.is_empty());
    }

    #[test]
    fn short_name_uses_length_message() {
        let outcome = validate(
            &FormSnapshot::default().with(FormField::Name, " J ", true),
            &messages(),
        );
        assert_eq!(outcome.message_for(FormField::Name), Some("Meno musí mať aspoň 2 znaky"));

        let accented = validate(
            &FormSnapshot::default().with(FormField::Name, "Ľu", true),
            &messages(),
        );
        assert!(accented.is_valid());
    }
}
