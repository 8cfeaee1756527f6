use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::form::{FieldRule, FormMessages};

/// Id of the optional `<script type="application/json">` element carrying
/// page-level overrides.
pub const CONFIG_ELEMENT_ID: &str = "portfolio-config";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub progress: f64,
    pub reveal: f64,
    pub section: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            progress: 0.4,
            reveal: 0.12,
            section: 0.55,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Selectors {
    pub progress_bars: String,
    pub reveal_targets: String,
    pub nav_links: String,
    pub nav_list: String,
    pub hamburger: String,
    pub header: String,
    /// Tried in order, first match wins.
    pub forms: Vec<String>,
    pub back_to_top_id: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            progress_bars: ".progress-bar span".to_string(),
            reveal_targets: "section, .card, .presentation-texte, .presentation-detaillee-texte, #accueil img, .projet-details, .competence-card".to_string(),
            nav_links: ".navbar-list a".to_string(),
            nav_list: ".navbar-list".to_string(),
            hamburger: ".hamburger".to_string(),
            header: "header".to_string(),
            forms: vec!["#contact form".to_string(), "form".to_string()],
            back_to_top_id: "back-to-top".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PortfolioConfig {
    /// When false the module only installs its panic hook and waits for the
    /// host page to call `init_with_config`.
    pub auto_mount: bool,
    pub thresholds: Thresholds,
    pub sticky_offset: f64,
    pub back_to_top_offset: f64,
    pub success_timeout_ms: u64,
    pub selectors: Selectors,
    pub fields: Vec<FieldRule>,
    pub messages: FormMessages,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            auto_mount: true,
            thresholds: Thresholds::default(),
            sticky_offset: 20.0,
            back_to_top_offset: 300.0,
            success_timeout_ms: 4500,
            selectors: Selectors::default(),
            fields: FieldRule::contact_defaults(),
            messages: FormMessages::default(),
        }
    }
}

impl PortfolioConfig {
    pub fn from_json(raw: &str) -> UiResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> UiResult<()> {
        let thresholds = [
            ("progress", self.thresholds.progress),
            ("reveal", self.thresholds.reveal),
            ("section", self.thresholds.section),
        ];
        for (watcher, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(UiError::InvalidThreshold { watcher, value });
            }
        }

        let offsets = [
            ("sticky", self.sticky_offset),
            ("back-to-top", self.back_to_top_offset),
        ];
        for (name, value) in offsets {
            if value.is_nan() || value < 0.0 {
                return Err(UiError::InvalidOffset { name, value });
            }
        }

        if let Some(index) = self
            .fields
            .iter()
            .position(|rule| rule.selector.trim().is_empty())
        {
            return Err(UiError::InvalidFieldRule { index });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_constants() {
        let config = PortfolioConfig::default();
        assert_eq!(config.thresholds.progress, 0.4);
        assert_eq!(config.thresholds.reveal, 0.12);
        assert_eq!(config.thresholds.section, 0.55);
        assert_eq!(config.sticky_offset, 20.0);
        assert_eq!(config.back_to_top_offset, 300.0);
        assert_eq!(config.success_timeout_ms, 4500);
        assert_eq!(config.fields.len(), 4);
        assert!(config.auto_mount);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_only_named_keys() {
        let config = PortfolioConfig::from_json(
            r#"{ "sticky_offset": 64, "thresholds": { "reveal": 0.3 } }"#,
        )
        .unwrap();
        assert_eq!(config.sticky_offset, 64.0);
        assert_eq!(config.thresholds.reveal, 0.3);
        assert_eq!(config.thresholds.progress, 0.4);
        assert_eq!(config.selectors.nav_links, ".navbar-list a");
        assert_eq!(config.fields, FieldRule::contact_defaults());
    }

    #[test]
    fn custom_field_table_replaces_defaults() {
        let config = PortfolioConfig::from_json(
            r##"{ "fields": [ { "selector": "#email", "name": "Email", "min": 3 } ] }"##,
        )
        .unwrap();
        assert_eq!(config.fields.len(), 1);
        assert_eq!(config.fields[0].min, 3);
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let err = PortfolioConfig::from_json(r#"{ "thresholds": { "section": 1.5 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            UiError::InvalidThreshold {
                watcher: "section",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_offset_and_blank_selector() {
        let err = PortfolioConfig::from_json(r#"{ "back_to_top_offset": -1 }"#).unwrap_err();
        assert!(matches!(err, UiError::InvalidOffset { .. }));

        let err = PortfolioConfig::from_json(
            r#"{ "fields": [ { "selector": "  ", "name": "X", "min": 1 } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, UiError::InvalidFieldRule { index: 0 }));
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            PortfolioConfig::from_json("{ nope"),
            Err(UiError::Config(_))
        ));
    }
}
