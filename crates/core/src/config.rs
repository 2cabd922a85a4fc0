// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed configuration records.
//!
//! Tasks carry a free-form `config` map; each agent resolves it into its
//! typed record at the boundary by deserializing an all-optional overrides
//! struct and applying it on top of the defaults.

use std::time::Duration;

use serde::Deserialize;

use crate::task::AnalysisMode;

/// Runtime knobs for the agent itself (not task-configurable).
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Heartbeat emission interval while connected.
    pub heartbeat_interval: Duration,
    /// First reconnect delay; doubles per attempt.
    pub reconnect_base: Duration,
    /// Reconnect delay ceiling.
    pub reconnect_cap: Duration,
    /// Consecutive failed connects before the agent gives up.
    pub max_reconnect_attempts: u32,
    /// Concurrent in-flight task limit.
    pub max_active_tasks: usize,
    /// Consecutive task failures before cooldown starts.
    pub max_consecutive_errors: u32,
    /// Length of the error cooldown.
    pub error_cooldown: Duration,
    /// Task deadline when the task supplies none.
    pub default_task_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            heartbeat_interval: Duration::from_secs(30),
            reconnect_base: Duration::from_secs(10),
            reconnect_cap: Duration::from_secs(60),
            max_reconnect_attempts: 30,
            max_active_tasks: 10,
            max_consecutive_errors: 10,
            error_cooldown: Duration::from_secs(300),
            default_task_timeout: Duration::from_secs(300),
        }
    }
}

/// Quality agent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityConfig {
    /// Per-tool wall budget in seconds.
    pub timeout_seconds: u64,
    pub max_file_size_mb: u64,
    pub scan_complexity: bool,
    pub scan_duplication: bool,
    /// CCN cutoff for complexity findings.
    pub complexity_threshold: u32,
    /// Jaccard line-set similarity cutoff, 0..1.
    pub duplication_threshold: f64,
    pub ruff_enabled: bool,
    pub eslint_enabled: bool,
    pub lizard_enabled: bool,
    pub yaml_syntax_enabled: bool,
    pub typescript_syntax_enabled: bool,
    pub mode: AnalysisMode,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            timeout_seconds: 45,
            max_file_size_mb: 5,
            scan_complexity: true,
            scan_duplication: true,
            complexity_threshold: 10,
            duplication_threshold: 0.8,
            ruff_enabled: true,
            eslint_enabled: true,
            lizard_enabled: true,
            yaml_syntax_enabled: true,
            typescript_syntax_enabled: true,
            mode: AnalysisMode::Standard,
        }
    }
}

impl QualityConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn apply(&mut self, overrides: &QualityOverrides) {
        if let Some(v) = overrides.timeout_seconds {
            self.timeout_seconds = v;
        }
        if let Some(v) = overrides.max_file_size_mb {
            self.max_file_size_mb = v;
        }
        if let Some(v) = overrides.scan_complexity {
            self.scan_complexity = v;
        }
        if let Some(v) = overrides.scan_duplication {
            self.scan_duplication = v;
        }
        if let Some(v) = overrides.complexity_threshold {
            self.complexity_threshold = v;
        }
        if let Some(v) = overrides.duplication_threshold {
            self.duplication_threshold = v;
        }
        if let Some(v) = overrides.ruff_enabled {
            self.ruff_enabled = v;
        }
        if let Some(v) = overrides.eslint_enabled {
            self.eslint_enabled = v;
        }
        if let Some(v) = overrides.lizard_enabled {
            self.lizard_enabled = v;
        }
        if let Some(v) = overrides.yaml_syntax_enabled {
            self.yaml_syntax_enabled = v;
        }
        if let Some(v) = overrides.typescript_syntax_enabled {
            self.typescript_syntax_enabled = v;
        }
    }

    /// Defaults plus task overrides; malformed override maps are ignored.
    pub fn resolve(task_config: Option<&serde_json::Value>, mode: AnalysisMode) -> Self {
        let mut config = QualityConfig {
            mode,
            ..QualityConfig::default()
        };
        if let Some(value) = task_config {
            let overrides: QualityOverrides =
                serde_json::from_value(value.clone()).unwrap_or_default();
            config.apply(&overrides);
        }
        config
    }
}

/// Per-task overrides accepted in a quality task's `config` map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QualityOverrides {
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_file_size_mb: Option<u64>,
    #[serde(default)]
    pub scan_complexity: Option<bool>,
    #[serde(default)]
    pub scan_duplication: Option<bool>,
    #[serde(default)]
    pub complexity_threshold: Option<u32>,
    #[serde(default)]
    pub duplication_threshold: Option<f64>,
    #[serde(default)]
    pub ruff_enabled: Option<bool>,
    #[serde(default)]
    pub eslint_enabled: Option<bool>,
    #[serde(default)]
    pub lizard_enabled: Option<bool>,
    #[serde(default)]
    pub yaml_syntax_enabled: Option<bool>,
    #[serde(default)]
    pub typescript_syntax_enabled: Option<bool>,
}

/// Default Semgrep rule packs.
pub const DEFAULT_SEMGREP_RULES: &[&str] =
    &["p/security-audit", "p/owasp-top-ten", "p/cwe-top-25"];

/// Security agent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityConfig {
    /// Per-tool wall budget in seconds.
    pub timeout_seconds: u64,
    pub max_file_size_mb: u64,
    pub scan_secrets: bool,
    pub scan_dependencies: bool,
    /// Semgrep rule pack identifiers.
    pub semgrep_rules: Vec<String>,
    pub gitleaks_enabled: bool,
    pub osv_scanner_enabled: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            timeout_seconds: 60,
            max_file_size_mb: 10,
            scan_secrets: true,
            scan_dependencies: true,
            semgrep_rules: DEFAULT_SEMGREP_RULES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            gitleaks_enabled: true,
            osv_scanner_enabled: true,
        }
    }
}

impl SecurityConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn apply(&mut self, overrides: &SecurityOverrides) {
        if let Some(v) = overrides.timeout_seconds {
            self.timeout_seconds = v;
        }
        if let Some(v) = overrides.max_file_size_mb {
            self.max_file_size_mb = v;
        }
        if let Some(v) = overrides.scan_secrets {
            self.scan_secrets = v;
        }
        if let Some(v) = overrides.scan_dependencies {
            self.scan_dependencies = v;
        }
        if let Some(v) = &overrides.semgrep_rules {
            self.semgrep_rules = v.clone();
        }
        if let Some(v) = overrides.gitleaks_enabled {
            self.gitleaks_enabled = v;
        }
        if let Some(v) = overrides.osv_scanner_enabled {
            self.osv_scanner_enabled = v;
        }
    }

    /// Defaults plus task overrides; malformed override maps are ignored.
    pub fn resolve(task_config: Option<&serde_json::Value>) -> Self {
        let mut config = SecurityConfig::default();
        if let Some(value) = task_config {
            let overrides: SecurityOverrides =
                serde_json::from_value(value.clone()).unwrap_or_default();
            config.apply(&overrides);
        }
        config
    }
}

/// Per-task overrides accepted in a security task's `config` map.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SecurityOverrides {
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub max_file_size_mb: Option<u64>,
    #[serde(default)]
    pub scan_secrets: Option<bool>,
    #[serde(default)]
    pub scan_dependencies: Option<bool>,
    #[serde(default)]
    pub semgrep_rules: Option<Vec<String>>,
    #[serde(default)]
    pub gitleaks_enabled: Option<bool>,
    #[serde(default)]
    pub osv_scanner_enabled: Option<bool>,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
