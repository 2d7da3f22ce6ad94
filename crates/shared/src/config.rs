use std::{fs, path::Path};

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_SETTINGS_FILE: &str = "site.toml";
const ENV_PREFIX: &str = "SITE__";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Viewports narrower than this collapse the menu after a link click.
    pub nav_breakpoint_px: f64,
    pub nav_auto_close_delay_ms: u64,
    pub submit_redirect_delay_ms: u64,
    pub confirmation_url: String,
    pub scroll_spy_lookahead_px: f64,
    pub scroll_top_threshold_px: f64,
    pub count_duration_ms: u64,
    pub count_tick_ms: u64,
    pub count_visibility_threshold: f64,
    /// When set, validated forms are POSTed here instead of the timed redirect.
    pub submit_endpoint: Option<String>,
    pub submit_timeout_ms: u64,
    pub messages: FormMessages,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            nav_breakpoint_px: 1024.0,
            nav_auto_close_delay_ms: 300,
            submit_redirect_delay_ms: 800,
            confirmation_url: "thank_you.html".into(),
            scroll_spy_lookahead_px: 100.0,
            scroll_top_threshold_px: 300.0,
            count_duration_ms: 2000,
            count_tick_ms: 16,
            count_visibility_threshold: 0.5,
            submit_endpoint: None,
            submit_timeout_ms: 10_000,
            messages: FormMessages::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormMessages {
    pub name_required: String,
    pub name_too_short: String,
    pub email_required: String,
    pub email_invalid: String,
    pub phone_invalid: String,
    pub subject_required: String,
    pub message_required: String,
    pub message_too_short: String,
    pub consent_required: String,
    pub sending: String,
    pub submit_failed: String,
}

impl Default for FormMessages {
    fn default() -> Self {
        Self {
            name_required: "Meno je povinné".into(),
            name_too_short: "Meno musí mať aspoň 2 znaky".into(),
            email_required: "E-mail je povinný".into(),
            email_invalid: "Neplatný formát e-mailu".into(),
            phone_invalid: "Neplatný formát telefónneho čísla".into(),
            subject_required: "Predmet je povinný".into(),
            message_required: "Správa je povinná".into(),
            message_too_short: "Správa musí mať aspoň 10 znakov".into(),
            consent_required: "Musíte súhlasiť so spracovaním osobných údajov".into(),
            sending: "Odosiela sa...".into(),
            submit_failed: "Odoslanie zlyhalo, skúste to prosím znova".into(),
        }
    }
}

impl SiteSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count_tick_ms == 0 {
            return Err(ConfigError::invalid("count_tick_ms", "must be positive"));
        }
        if self.count_duration_ms < self.count_tick_ms {
            return Err(ConfigError::invalid(
                "count_duration_ms",
                format!("must be at least one tick ({} ms)", self.count_tick_ms),
            ));
        }
        if !(0.0..=1.0).contains(&self.count_visibility_threshold) {
            return Err(ConfigError::invalid(
                "count_visibility_threshold",
                format!("{} is outside 0..=1", self.count_visibility_threshold),
            ));
        }
        if self.confirmation_url.trim().is_empty() {
            return Err(ConfigError::invalid("confirmation_url", "must not be empty"));
        }
        if let Some(endpoint) = &self.submit_endpoint {
            Url::parse(endpoint)
                .map_err(|err| ConfigError::invalid("submit_endpoint", err.to_string()))?;
        }
        Ok(())
    }
}

/// Defaults, then `site.toml` in the working directory, then `SITE__*`
/// environment overrides. A broken settings file is logged and ignored.
pub fn load_settings() -> SiteSettings {
    let mut settings = if Path::new(DEFAULT_SETTINGS_FILE).exists() {
        match load_settings_from(DEFAULT_SETTINGS_FILE) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring settings file");
                SiteSettings::default()
            }
        }
    } else {
        SiteSettings::default()
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings
}

pub fn load_settings_from(path: impl AsRef<Path>) -> Result<SiteSettings, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

pub fn apply_env_overrides(settings: &mut SiteSettings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

    if let Some(v) = var("NAV_BREAKPOINT_PX").and_then(|v| v.parse().ok()) {
        settings.nav_breakpoint_px = v;
    }
    if let Some(v) = var("NAV_AUTO_CLOSE_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.nav_auto_close_delay_ms = v;
    }
    if let Some(v) = var("SUBMIT_REDIRECT_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.submit_redirect_delay_ms = v;
    }
    if let Some(v) = var("CONFIRMATION_URL") {
        settings.confirmation_url = v;
    }
    if let Some(v) = var("SCROLL_SPY_LOOKAHEAD_PX").and_then(|v| v.parse().ok()) {
        settings.scroll_spy_lookahead_px = v;
    }
    if let Some(v) = var("SCROLL_TOP_THRESHOLD_PX").and_then(|v| v.parse().ok()) {
        settings.scroll_top_threshold_px = v;
    }
    if let Some(v) = var("COUNT_DURATION_MS").and_then(|v| v.parse().ok()) {
        settings.count_duration_ms = v;
    }
    if let Some(v) = var("COUNT_TICK_MS").and_then(|v| v.parse().ok()) {
        settings.count_tick_ms = v;
    }
    if let Some(v) = var("SUBMIT_ENDPOINT") {
        settings.submit_endpoint = if v.trim().is_empty() { None } else { Some(v) };
    }
    if let Some(v) = var("SUBMIT_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
        settings.submit_timeout_ms = v;
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = SiteSettings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.nav_breakpoint_px, 1024.0);
        assert_eq!(settings.confirmation_url, "thank_you.html");
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("brochure_site_settings_{suffix}.toml"));
        fs::write(
            &path,
            "confirmation_url = \"dakujeme.html\"\n\n[messages]\nsending = \"Sending...\"\n",
        )
        .expect("write settings");

        let settings = load_settings_from(&path).expect("load");
        assert_eq!(settings.confirmation_url, "dakujeme.html");
        assert_eq!(settings.messages.sending, "Sending...");
        assert_eq!(settings.messages.name_required, "Meno je povinné");
        assert_eq!(settings.submit_redirect_delay_ms, 800);

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("brochure_site_broken_{suffix}.toml"));
        fs::write(&path, "count_tick_ms = \"fast\"").expect("write settings");

        let err = load_settings_from(&path).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));

        fs::remove_file(path).expect("cleanup");
    }

    #[test]
    fn env_overrides_win_and_ignore_garbage() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SITE__NAV_BREAKPOINT_PX", "768"),
            ("SITE__COUNT_TICK_MS", "not-a-number"),
            ("SITE__SUBMIT_ENDPOINT", "https://forms.example.sk/contact"),
        ]);
        let mut settings = SiteSettings::default();
        apply_env_overrides(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(settings.nav_breakpoint_px, 768.0);
        assert_eq!(settings.count_tick_ms, 16);
        assert_eq!(
            settings.submit_endpoint.as_deref(),
            Some("https://forms.example.sk/contact")
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let mut settings = SiteSettings {
            count_tick_ms: 0,
            ..SiteSettings::default()
        };
        assert!(settings.validate().is_err());

        settings.count_tick_ms = 16;
        settings.count_visibility_threshold = 1.5;
        assert!(settings.validate().is_err());

        settings.count_visibility_threshold = 0.5;
        settings.submit_endpoint = Some("not a url".into());
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid {
                key: "submit_endpoint",
                ..
            })
        ));
    }
}
