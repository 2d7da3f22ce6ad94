use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);
    };
}

macro_rules! key_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(ElementId);

key_newtype!(SectionId);
key_newtype!(FilterKey);

impl FilterKey {
    pub const ALL: &'static str = "all";

    pub fn all() -> Self {
        Self::new(Self::ALL)
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }

    /// Substring match against a space/comma-joined category list, so
    /// multi-category items show up under each of their filters.
    pub fn matches_categories(&self, categories: &str) -> bool {
        self.is_all() || categories.contains(self.as_str())
    }
}

impl SectionId {
    /// The in-page anchor (`#id`) a navigation link uses to target this section.
    pub fn anchor(&self) -> String {
        format!("#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Subject,
    Message,
    Consent,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Subject,
        FormField::Message,
        FormField::Consent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Subject => "subject",
            FormField::Message => "message",
            FormField::Consent => "consent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }
}
