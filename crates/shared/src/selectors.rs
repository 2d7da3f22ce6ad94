//! Markup contract: the selectors handles are discovered with and the class
//! names and attributes the controller writes back.

use crate::domain::FormField;

pub const NAV_TOGGLE: &str = ".c-nav__toggle, .navbar-toggler";
pub const NAV_LIST: &str = ".navbar-collapse, .c-nav__list";
pub const NAV_LINK: &str = ".c-nav__link, .nav-link";
pub const FORM: &str = ".c-form";
pub const FORM_GROUP: &str = ".c-form__group";
pub const FORM_ERROR: &str = ".c-form__error";
pub const FORM_STATUS: &str = ".c-form__status";
pub const FORM_SUBMIT: &str = ".c-form__submit, [type=\"submit\"]";
pub const FILTER_BUTTON: &str = ".filter-btn";
pub const PORTFOLIO_ITEM: &str = ".portfolio-item";
pub const SCROLL_TOP: &str = "[data-scroll-top]";
pub const SECTION: &str = "section[id]";
pub const STAT_NUMBER: &str = ".c-stat__number[data-count]";
pub const HEADER: &str = ".dr-header";
pub const HEADER_NAV_TOGGLE: &str = ".dr-nav-toggle";
pub const HEADER_NAV_LIST: &str = ".dr-nav-list";

pub const FIELD_NAME: &str = "#contactName, [name=\"name\"]";
pub const FIELD_EMAIL: &str = "#contactEmail, [name=\"email\"]";
pub const FIELD_PHONE: &str = "#contactPhone, [name=\"phone\"]";
pub const FIELD_SUBJECT: &str = "#contactSubject, [name=\"subject\"]";
pub const FIELD_MESSAGE: &str = "#contactMessage, [name=\"message\"]";
pub const FIELD_CONSENT: &str = "#contactConsent, [name=\"consent\"]";

pub const ATTR_ARIA_EXPANDED: &str = "aria-expanded";
pub const ATTR_DISABLED: &str = "disabled";
pub const ATTR_DATA_FILTER: &str = "data-filter";
pub const ATTR_DATA_CATEGORY: &str = "data-category";
pub const ATTR_DATA_COUNT: &str = "data-count";

pub mod class {
    pub const NAV_OPEN: &str = "show";
    pub const NO_SCROLL: &str = "u-no-scroll";
    pub const LINK_ACTIVE: &str = "active";
    pub const IS_ACTIVE: &str = "is-active";
    pub const BUTTON_PRIMARY: &str = "c-button--primary";
    pub const BUTTON_SECONDARY: &str = "c-button--secondary";
    pub const GROUP_ERROR: &str = "has-error";
    pub const FIELD_ERROR: &str = "is-error";
    pub const LOADING: &str = "is-loading";
    pub const VISIBLE: &str = "is-visible";
    pub const COUNTED: &str = "counted";
    pub const HEADER_NAV_OPEN: &str = "dr-header-nav-open";
}

pub fn field_selector(field: FormField) -> &'static str {
    match field {
        FormField::Name => FIELD_NAME,
        FormField::Email => FIELD_EMAIL,
        FormField::Phone => FIELD_PHONE,
        FormField::Subject => FIELD_SUBJECT,
        FormField::Message => FIELD_MESSAGE,
        FormField::Consent => FIELD_CONSENT,
    }
}
