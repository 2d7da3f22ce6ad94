//! Assembles [`PageHandles`] from the document using the selector contract.
//! Every group is optional; whatever is missing simply stays empty.

use shared::{
    domain::{FilterKey, FormField, SectionId},
    selectors::{self, field_selector},
};

use crate::{
    dom::DomQuery,
    handles::{
        FieldHandle, FilterButton, FilterItem, FormHandles, HeaderNavHandles, NavHandles, NavLink,
        PageHandles, ScrollSection, StatHandle,
    },
};

pub fn discover<Q: DomQuery>(dom: &Q) -> PageHandles {
    let mut handles = PageHandles::new(dom.body());

    handles.nav = match (
        dom.query_first(None, selectors::NAV_TOGGLE),
        dom.query_first(None, selectors::NAV_LIST),
    ) {
        (Some(toggle), Some(list)) => Some(NavHandles { toggle, list }),
        (None, None) => None,
        _ => {
            tracing::debug!("navigation toggle or list missing; menu toggling disabled");
            None
        }
    };

    handles.nav_links = dom
        .query_all(None, selectors::NAV_LINK)
        .into_iter()
        .map(|element| NavLink {
            element,
            href: dom.attribute(element, "href").unwrap_or_default(),
        })
        .collect();

    handles.headers = dom
        .query_all(None, selectors::HEADER)
        .into_iter()
        .filter_map(|header| {
            let toggle = dom.query_first(Some(header), selectors::HEADER_NAV_TOGGLE)?;
            let list = dom.query_first(Some(header), selectors::HEADER_NAV_LIST)?;
            Some(HeaderNavHandles {
                header,
                toggle,
                list,
            })
        })
        .collect();

    handles.forms = dom
        .query_all(None, selectors::FORM)
        .into_iter()
        .map(|form| discover_form(dom, form))
        .collect();

    handles.filter_buttons = dom
        .query_all(None, selectors::FILTER_BUTTON)
        .into_iter()
        .filter_map(|element| match dom.attribute(element, selectors::ATTR_DATA_FILTER) {
            Some(key) => Some(FilterButton {
                element,
                key: FilterKey::new(key),
            }),
            None => {
                tracing::debug!(element = element.0, "filter button without data-filter skipped");
                None
            }
        })
        .collect();

    handles.filter_items = dom
        .query_all(None, selectors::PORTFOLIO_ITEM)
        .into_iter()
        .map(|element| FilterItem {
            element,
            categories: dom
                .attribute(element, selectors::ATTR_DATA_CATEGORY)
                .unwrap_or_default(),
        })
        .collect();

    handles.scroll_top = dom.query_first(None, selectors::SCROLL_TOP);
    handles.sections = discover_sections(dom);

    handles.stats = dom
        .query_all(None, selectors::STAT_NUMBER)
        .into_iter()
        .filter_map(|element| {
            let raw = dom
                .attribute(element, selectors::ATTR_DATA_COUNT)
                .unwrap_or_default();
            match parse_count(&raw) {
                Some(target) => Some(StatHandle { element, target }),
                None => {
                    tracing::warn!(element = element.0, raw = %raw, "unparsable data-count; stat skipped");
                    None
                }
            }
        })
        .collect();

    tracing::debug!(
        nav = handles.nav.is_some(),
        links = handles.nav_links.len(),
        forms = handles.forms.len(),
        filters = handles.filter_buttons.len(),
        sections = handles.sections.len(),
        stats = handles.stats.len(),
        "page handles discovered"
    );

    handles
}

/// Current section geometry, re-read after layout changes.
pub fn discover_sections<Q: DomQuery>(dom: &Q) -> Vec<ScrollSection> {
    dom.query_all(None, selectors::SECTION)
        .into_iter()
        .filter_map(|element| {
            let id = dom.attribute(element, "id")?;
            Some(ScrollSection {
                id: SectionId::new(id),
                top: dom.offset_top(element),
                height: dom.offset_height(element),
            })
        })
        .collect()
}

fn discover_form<Q: DomQuery>(dom: &Q, form: shared::domain::ElementId) -> FormHandles {
    let fields = FormField::ALL
        .into_iter()
        .filter_map(|field| {
            let input = dom.query_first(Some(form), field_selector(field))?;
            let group = dom.closest(input, selectors::FORM_GROUP);
            let error = group.and_then(|group| dom.query_first(Some(group), selectors::FORM_ERROR));
            Some(FieldHandle {
                field,
                input,
                group,
                error,
            })
        })
        .collect();

    FormHandles {
        form,
        fields,
        submit: dom.query_first(Some(form), selectors::FORM_SUBMIT),
        status: dom.query_first(Some(form), selectors::FORM_STATUS),
    }
}

/// Leading-integer parse in the manner of `parseInt(raw, 10)`: `"50+"` is 50,
/// `"abc"` is nothing.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, MemoryDom};

    #[test]
    fn parse_count_takes_leading_integer() {
        assert_eq!(parse_count("50"), Some(50));
        assert_eq!(parse_count(" 120+"), Some(120));
        assert_eq!(parse_count("-3"), Some(-3));
        assert_eq!(parse_count("abc"), None);
        assert_eq!(parse_count(""), None);
    }

    #[test]
    fn discovers_contract_elements() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        let header = dom.append(body, "header").class("dr-header").id();
        let header_toggle = dom.append(header, "button").class("dr-nav-toggle").id();
        let header_list = dom.append(header, "ul").class("dr-nav-list").id();
        let toggle = dom.append(body, "button").class("navbar-toggler").id();
        let list = dom.append(body, "ul").class("c-nav__list").id();
        let link = dom
            .append(list, "a")
            .class("c-nav__link")
            .attr("href", "#about")
            .id();
        let about = dom
            .append(body, "section")
            .dom_id("about")
            .layout(600.0, 400.0)
            .id();
        let form = dom.append(body, "form").class("c-form").id();
        let group = dom.append(form, "div").class("c-form__group").id();
        let email = dom
            .append(group, "input")
            .attr("name", "email")
            .attr("required", "")
            .id();
        let error = dom.append(group, "span").class("c-form__error").id();
        let submit = dom.append(form, "button").attr("type", "submit").id();
        let stat = dom
            .append(body, "span")
            .class("c-stat__number")
            .attr("data-count", "50")
            .id();
        dom.append(body, "span")
            .class("c-stat__number")
            .attr("data-count", "n/a");

        let handles = discover(&dom);

        assert_eq!(handles.nav, Some(NavHandles { toggle, list }));
        assert_eq!(
            handles.headers,
            vec![HeaderNavHandles {
                header,
                toggle: header_toggle,
                list: header_list
            }]
        );
        assert_eq!(handles.nav_links.len(), 1);
        assert_eq!(handles.nav_links[0].element, link);
        assert_eq!(handles.nav_links[0].href, "#about");
        assert_eq!(handles.sections.len(), 1);
        assert_eq!(handles.sections[0].id, SectionId::new("about"));
        assert_eq!(handles.sections[0].top, 600.0);
        assert!(dom.element(about).is_some());

        let form_handles = handles.form(form).expect("form discovered");
        assert_eq!(form_handles.submit, Some(submit));
        assert_eq!(
            form_handles.field(FormField::Email),
            Some(&FieldHandle {
                field: FormField::Email,
                input: email,
                group: Some(group),
                error: Some(error),
            })
        );
        assert!(form_handles.field(FormField::Name).is_none());

        assert_eq!(handles.stats, vec![StatHandle { element: stat, target: 50 }]);
        assert!(handles.scroll_top.is_none());
    }

    #[test]
    fn half_configured_nav_is_disabled() {
        let mut dom = MemoryDom::default();
        let body = dom.body();
        dom.append(body, "button").class("c-nav__toggle");

        let handles = discover(&dom);
        assert!(handles.nav.is_none());
        assert!(handles.forms.is_empty());
    }
}
