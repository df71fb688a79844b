//! Exercise navbar: one Bootstrap tab per exercise section.
//!
//! For a page like
//!
//! ```html
//! <ul class="nav nav-tabs"></ul>
//! <div class="exercise">...</div>
//! <div class="exercise">...</div>
//! ```
//!
//! the sections become tab panes `exercise1`, `exercise2` (the first one
//! active) and the list gains one `<li class="nav-item">` link per pane.
//! A page without exercises loses its navigation list entirely.

use crate::config::{MissingNavPolicy, NavbarConfig};
use crate::dom::{ArenaDom, ArenaNodeId, Attribute, Selector};
use crate::error::{Error, Result};

/// Classes that turn a section into a tab pane that fades in when selected.
const PANE_CLASSES: [&str; 3] = ["tab-pane", "fade", "show"];

/// Class of the initially selected pane.
const ACTIVE_CLASS: &str = "active";

/// What a navbar pass did to the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct NavbarReport {
    /// Exercise sections turned into tab panes.
    pub sections: usize,
    /// Nav entries appended, summed over all nav containers.
    pub entries: usize,
    /// Nav containers removed because the page has no exercises.
    pub removed_navs: usize,
    /// Section ids already carried by an element outside the exercises.
    pub id_conflicts: usize,
}

/// Build the exercise navbar in place.
///
/// Sections are numbered by document order. Every run derives ids and
/// labels from position alone, so earlier ids on the sections are
/// overwritten.
///
/// # Errors
///
/// [`Error::MissingNav`] if sections exist, no container matches the nav
/// selector and the policy is [`MissingNavPolicy::Fail`]; the page is left
/// untouched in that case. [`Error::InvalidSelector`] for bad selectors.
pub fn build_navbar(dom: &mut ArenaDom, config: &NavbarConfig) -> Result<NavbarReport> {
    let navs = dom.select(&Selector::parse(&config.nav_selector)?);
    let exercises = dom.select(&Selector::parse(&config.exercise_selector)?);

    let Some(&first) = exercises.first() else {
        for &nav in &navs {
            dom.detach(nav);
        }
        if !navs.is_empty() {
            tracing::debug!(count = navs.len(), "No exercises, removed navigation");
        }
        return Ok(NavbarReport {
            removed_navs: navs.len(),
            ..Default::default()
        });
    };

    if navs.is_empty() {
        match config.missing_nav {
            MissingNavPolicy::Fail => {
                return Err(Error::MissingNav {
                    exercises: exercises.len(),
                    selector: config.nav_selector.clone(),
                });
            }
            MissingNavPolicy::Skip => {
                tracing::warn!(
                    exercises = exercises.len(),
                    selector = %config.nav_selector,
                    "No navigation container; exercise tabs will not be reachable"
                );
            }
        }
    }

    let mut report = NavbarReport::default();
    for (index, &section) in exercises.iter().enumerate() {
        let number = index + 1;
        let pane_id = config.section_id(number);

        if let Some(holder) = dom.get_by_id(&pane_id)
            && !exercises.contains(&holder)
        {
            tracing::warn!(
                id = %pane_id,
                "Another element already has this id; tab links may target it"
            );
            report.id_conflicts += 1;
        }
        dom.set_attr(section, "id", &pane_id);
        for class in PANE_CLASSES {
            dom.add_class(section, class);
        }
        if section != first {
            dom.remove_class(section, ACTIVE_CLASS);
        }

        let label = config.label_for(number);
        for &nav in &navs {
            append_entry(dom, nav, &pane_id, &label);
            report.entries += 1;
        }
        report.sections += 1;

        tracing::debug!(id = %pane_id, "Tagged exercise section");
    }
    dom.add_class(first, ACTIVE_CLASS);

    tracing::info!(
        sections = report.sections,
        entries = report.entries,
        "Built exercise navbar"
    );
    Ok(report)
}

/// Append `<li class="nav-item"><a class="nav-link" data-toggle="tab" href="#id">label</a></li>`.
fn append_entry(dom: &mut ArenaDom, nav: ArenaNodeId, pane_id: &str, label: &str) {
    let item = dom.create_html_element("li", vec![Attribute::new("class", "nav-item")]);
    let link = dom.create_html_element(
        "a",
        vec![
            Attribute::new("class", "nav-link"),
            Attribute::new("data-toggle", "tab"),
            Attribute::new("href", format!("#{pane_id}")),
        ],
    );
    let text = dom.create_text(label.to_string());

    dom.append(link, text);
    dom.append(item, link);
    dom.append(nav, item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn body_html(dom: &ArenaDom) -> String {
        let body = dom.find_by_tag("body").unwrap();
        dom.inner_html(body)
    }

    #[test]
    fn test_two_exercises() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul><div class="exercise">A</div><div class="exercise">B</div>"#,
        );

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(
            report,
            NavbarReport {
                sections: 2,
                entries: 2,
                removed_navs: 0,
                id_conflicts: 0,
            }
        );
        assert_eq!(
            body_html(&dom),
            concat!(
                r#"<ul class="nav">"#,
                r##"<li class="nav-item"><a class="nav-link" data-toggle="tab" href="#exercise1">Exercise 1</a></li>"##,
                r##"<li class="nav-item"><a class="nav-link" data-toggle="tab" href="#exercise2">Exercise 2</a></li>"##,
                "</ul>",
                r#"<div class="exercise tab-pane fade show active" id="exercise1">A</div>"#,
                r#"<div class="exercise tab-pane fade show" id="exercise2">B</div>"#,
            )
        );
    }

    #[test]
    fn test_no_exercises_removes_nav() {
        let mut dom = parse_html(r#"<ul class="nav"></ul><p>intro</p>"#);

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(report.removed_navs, 1);
        assert_eq!(body_html(&dom), "<p>intro</p>");
    }

    #[test]
    fn test_no_exercises_no_nav() {
        let mut dom = parse_html("<p>intro</p>");

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(report, NavbarReport::default());
        assert_eq!(body_html(&dom), "<p>intro</p>");
    }

    #[test]
    fn test_missing_nav_fails_without_mutation() {
        let html = r#"<div class="exercise">A</div>"#;
        let mut dom = parse_html(html);
        let before = dom.to_html();

        let err = build_navbar(&mut dom, &NavbarConfig::default()).unwrap_err();

        assert!(matches!(err, Error::MissingNav { exercises: 1, .. }));
        assert_eq!(dom.to_html(), before);
    }

    #[test]
    fn test_missing_nav_skip_still_tags_sections() {
        let mut dom = parse_html(r#"<div class="exercise">A</div><div class="exercise">B</div>"#);
        let config = NavbarConfig {
            missing_nav: MissingNavPolicy::Skip,
            ..Default::default()
        };

        let report = build_navbar(&mut dom, &config).unwrap();

        assert_eq!(report.sections, 2);
        assert_eq!(report.entries, 0);
        let first = dom.get_by_id("exercise1").unwrap();
        assert!(dom.has_class(first, "active"));
        assert!(dom.get_by_id("exercise2").is_some());
    }

    #[test]
    fn test_existing_ids_overwritten() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul><div class="exercise" id="intro">A</div>"#,
        );

        build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert!(dom.get_by_id("intro").is_none());
        assert!(dom.get_by_id("exercise1").is_some());
    }

    #[test]
    fn test_id_held_by_other_element_is_reported() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul><p id="exercise2">notes</p>
               <div class="exercise">A</div><div class="exercise">B</div>"#,
        );

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(report.id_conflicts, 1);
        let second = dom.select(&Selector::parse(".exercise").unwrap())[1];
        assert_eq!(dom.element_id(second), Some("exercise2"));
        assert_eq!(dom.get_by_id("exercise2"), Some(second));
    }

    #[test]
    fn test_ids_shuffled_between_sections_are_not_conflicts() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul>
               <div class="exercise" id="exercise2">A</div>
               <div class="exercise" id="exercise1">B</div>"#,
        );

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(report.id_conflicts, 0);
        assert_eq!(dom.select(&Selector::parse("#exercise1").unwrap()).len(), 1);
    }

    #[test]
    fn test_only_first_is_active() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul>
               <div class="exercise">A</div>
               <div class="exercise active">B</div>
               <div class="exercise">C</div>"#,
        );

        build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        let active = dom.select(&Selector::parse(".exercise.active").unwrap());
        assert_eq!(active, vec![dom.get_by_id("exercise1").unwrap()]);
    }

    #[test]
    fn test_nested_sections_document_order() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul>
               <section class="exercise" title="outer"><div class="exercise" title="inner"></div></section>"#,
        );

        build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        let first = dom.get_by_id("exercise1").unwrap();
        let second = dom.get_by_id("exercise2").unwrap();
        assert_eq!(dom.get_attr(first, "title"), Some("outer"));
        assert_eq!(dom.get_attr(second, "title"), Some("inner"));
    }

    #[test]
    fn test_every_nav_gets_entries() {
        let mut dom = parse_html(
            r#"<ul class="nav" id="top"></ul><div class="exercise">A</div><ul class="nav" id="bottom"></ul>"#,
        );

        let report = build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(report.entries, 2);
        for id in ["top", "bottom"] {
            let nav = dom.get_by_id(id).unwrap();
            assert_eq!(dom.children(nav).count(), 1);
        }
    }

    #[test]
    fn test_custom_label_and_prefix() {
        let mut dom = parse_html(r#"<ul class="nav"></ul><div class="exercise">A</div>"#);
        let config = NavbarConfig {
            label: "Exercice {n}".to_string(),
            id_prefix: "td".to_string(),
            ..Default::default()
        };

        build_navbar(&mut dom, &config).unwrap();

        let link = dom.find_by_tag("a").unwrap();
        assert_eq!(dom.get_attr(link, "href"), Some("#td1"));
        assert_eq!(dom.inner_html(link), "Exercice 1");
        assert!(dom.get_by_id("td1").is_some());
    }

    #[test]
    fn test_label_is_escaped() {
        let mut dom = parse_html(r#"<ul class="nav"></ul><div class="exercise">A</div>"#);
        let config = NavbarConfig {
            label: "<b>{n}</b>".to_string(),
            ..Default::default()
        };

        build_navbar(&mut dom, &config).unwrap();

        let link = dom.find_by_tag("a").unwrap();
        assert_eq!(dom.inner_html(link), "&lt;b&gt;1&lt;/b&gt;");
    }

    #[test]
    fn test_rerun_keeps_numbering() {
        let mut dom = parse_html(
            r#"<ul class="nav"></ul><div class="exercise">A</div><div class="exercise">B</div>"#,
        );

        build_navbar(&mut dom, &NavbarConfig::default()).unwrap();
        let sections_after_first = dom.select(&Selector::parse(".exercise").unwrap());
        build_navbar(&mut dom, &NavbarConfig::default()).unwrap();

        assert_eq!(dom.get_by_id("exercise1"), Some(sections_after_first[0]));
        assert_eq!(dom.get_by_id("exercise2"), Some(sections_after_first[1]));
    }
}
