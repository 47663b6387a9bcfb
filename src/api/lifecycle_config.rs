use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ChartSpec;
use crate::error::{LifecycleError, LifecycleResult};

/// Public manager bootstrap configuration.
///
/// Serializable so host applications can ship it next to their dashboard
/// layout instead of hard-coding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Quiet period before a burst of resize notifications triggers one pass.
    #[serde(default = "default_resize_debounce_ms")]
    pub resize_debounce_ms: u64,
    /// Prefix for ids generated for containers passed without an element id.
    #[serde(default = "default_auto_id_prefix")]
    pub auto_id_prefix: String,
    /// Render an inline error message into the container when creation fails.
    #[serde(default = "default_true")]
    pub render_error_placeholder: bool,
    /// Clear stale container contents before mounting a new chart.
    #[serde(default = "default_true")]
    pub clear_container_on_create: bool,
    /// Top-level keys filled into every created spec when missing.
    #[serde(default)]
    pub spec_defaults: Option<Value>,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            resize_debounce_ms: default_resize_debounce_ms(),
            auto_id_prefix: default_auto_id_prefix(),
            render_error_placeholder: true,
            clear_container_on_create: true,
            spec_defaults: None,
        }
    }

    #[must_use]
    pub fn with_resize_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.resize_debounce_ms = debounce_ms;
        self
    }

    #[must_use]
    pub fn with_auto_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.auto_id_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_error_placeholder(mut self, enabled: bool) -> Self {
        self.render_error_placeholder = enabled;
        self
    }

    #[must_use]
    pub fn with_clear_container_on_create(mut self, enabled: bool) -> Self {
        self.clear_container_on_create = enabled;
        self
    }

    #[must_use]
    pub fn with_spec_defaults(mut self, defaults: Value) -> Self {
        self.spec_defaults = Some(defaults);
        self
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn validate(&self) -> LifecycleResult<()> {
        if self.auto_id_prefix.trim().is_empty() {
            return Err(LifecycleError::InvalidConfig(
                "auto_id_prefix must not be empty".to_owned(),
            ));
        }
        self.spec_defaults_spec()?;
        Ok(())
    }

    pub(crate) fn spec_defaults_spec(&self) -> LifecycleResult<Option<ChartSpec>> {
        self.spec_defaults
            .clone()
            .map(|defaults| {
                ChartSpec::from_value(defaults).map_err(|_| {
                    LifecycleError::InvalidConfig(
                        "spec_defaults must be a JSON object".to_owned(),
                    )
                })
            })
            .transpose()
    }

    pub fn from_json_str(input: &str) -> LifecycleResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            LifecycleError::InvalidConfig(format!("failed to parse lifecycle config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> LifecycleResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LifecycleError::InvalidConfig(format!("failed to serialize lifecycle config: {e}"))
        })
    }
}

fn default_resize_debounce_ms() -> u64 {
    200
}

fn default_auto_id_prefix() -> String {
    "chart".to_owned()
}

fn default_true() -> bool {
    true
}
