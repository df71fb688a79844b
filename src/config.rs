//! Transformation settings.
//!
//! Defaults reproduce the markup Bootstrap 4 tabs expect; everything that
//! names page content (selectors, ids, the tab label) can be overridden.

use crate::dom::Selector;
use crate::error::{Error, Result};

/// Placeholder in [`NavbarConfig::label`] replaced by the exercise number.
pub const NUMBER_PLACEHOLDER: &str = "{n}";

/// Settings for both document-ready passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
pub struct Config {
    pub navbar: NavbarConfig,
    pub tags: TagConfig,
}

impl Config {
    /// Load settings from JSON. Missing fields keep their defaults.
    #[cfg(feature = "cli")]
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would produce broken markup.
    pub fn validate(&self) -> Result<()> {
        self.navbar.validate()?;
        self.tags.validate()
    }
}

/// What to do when a page has exercises but no navigation container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "cli",
    derive(serde::Deserialize, clap::ValueEnum),
    serde(rename_all = "lowercase")
)]
pub enum MissingNavPolicy {
    /// Return [`Error::MissingNav`] and leave the page untouched.
    #[default]
    Fail,
    /// Tag the sections anyway, log a warning, insert no entries.
    Skip,
}

/// Settings for the exercise navbar pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
pub struct NavbarConfig {
    /// Selector for the navigation list.
    pub nav_selector: String,
    /// Selector for exercise sections.
    pub exercise_selector: String,
    /// Section ids are `{id_prefix}{n}`.
    pub id_prefix: String,
    /// Tab label template; `{n}` is the 1-based exercise number.
    pub label: String,
    pub missing_nav: MissingNavPolicy,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            nav_selector: ".nav".to_string(),
            exercise_selector: ".exercise".to_string(),
            id_prefix: "exercise".to_string(),
            label: "Exercise {n}".to_string(),
            missing_nav: MissingNavPolicy::default(),
        }
    }
}

impl NavbarConfig {
    /// Identifier of the `number`-th exercise (1-based).
    pub fn section_id(&self, number: usize) -> String {
        format!("{}{number}", self.id_prefix)
    }

    /// Tab label of the `number`-th exercise (1-based).
    pub fn label_for(&self, number: usize) -> String {
        self.label.replace(NUMBER_PLACEHOLDER, &number.to_string())
    }

    fn validate(&self) -> Result<()> {
        Selector::parse(&self.nav_selector)?;
        Selector::parse(&self.exercise_selector)?;
        if self.id_prefix.is_empty() || self.id_prefix.contains(char::is_whitespace) {
            return Err(Error::Config(format!(
                "id prefix `{}` must be non-empty and contain no whitespace",
                self.id_prefix
            )));
        }
        Ok(())
    }
}

/// Settings for the tag normalization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Deserialize), serde(default))]
pub struct TagConfig {
    /// Selector for elements to rewrite.
    pub source: String,
    /// Tag name of the replacement element.
    pub target: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            source: "tt".to_string(),
            target: "code".to_string(),
        }
    }
}

impl TagConfig {
    fn validate(&self) -> Result<()> {
        Selector::parse(&self.source)?;
        let valid = self.target.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && self
                .target
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(Error::Config(format!(
                "`{}` is not a valid element name",
                self.target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.navbar.section_id(3), "exercise3");
        assert_eq!(config.navbar.label_for(3), "Exercise 3");
        assert_eq!(config.navbar.missing_nav, MissingNavPolicy::Fail);
        assert_eq!(config.tags.source, "tt");
        assert_eq!(config.tags.target, "code");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_localized_label() {
        let navbar = NavbarConfig {
            label: "Exercice {n}".to_string(),
            ..Default::default()
        };

        assert_eq!(navbar.label_for(12), "Exercice 12");
    }

    #[test]
    fn test_label_without_placeholder() {
        let navbar = NavbarConfig {
            label: "Tab".to_string(),
            ..Default::default()
        };

        assert_eq!(navbar.label_for(1), "Tab");
    }

    #[test]
    fn test_rejects_bad_prefix() {
        let mut config = Config::default();
        config.navbar.id_prefix = "ex ercise".to_string();

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_target() {
        let mut config = Config::default();
        config.tags.target = "<code>".to_string();

        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_selector() {
        let mut config = Config::default();
        config.navbar.exercise_selector = ".".to_string();

        assert!(matches!(
            config.validate(),
            Err(Error::InvalidSelector { .. })
        ));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_from_json_partial() {
        let config =
            Config::from_json(r#"{"navbar": {"label": "Exercice {n}", "missing_nav": "skip"}}"#)
                .unwrap();

        assert_eq!(config.navbar.label, "Exercice {n}");
        assert_eq!(config.navbar.missing_nav, MissingNavPolicy::Skip);
        assert_eq!(config.navbar.nav_selector, ".nav");
        assert_eq!(config.tags, TagConfig::default());
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(Error::Config(_))
        ));
    }
}
