// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process syntax plugins.
//!
//! Plugins share the external-tool finding model but never spawn a
//! subprocess. They run concurrently with the external tools and a plugin
//! failure is recorded without failing the task.

mod typescript;
mod yaml;

use std::path::PathBuf;

use async_trait::async_trait;
use pc_core::Finding;
use tracing::info;

pub use typescript::TypeScriptSyntaxPlugin;
pub use yaml::YamlSyntaxPlugin;

/// Outcome of one plugin invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginStatus {
    Success,
    Skipped,
}

#[derive(Debug)]
pub struct PluginReport {
    pub plugin: &'static str,
    pub findings: Vec<Finding>,
    pub files_analyzed: usize,
    pub status: PluginStatus,
}

/// An in-process analyzer sharing the finding model.
#[async_trait]
pub trait SyntaxPlugin: Send + Sync {
    fn name(&self) -> &'static str;
    fn version(&self) -> &'static str;
    /// Extensions this plugin understands (with leading dot, lowercase).
    fn extensions(&self) -> &'static [&'static str];
    async fn analyze(&self, files: &[PathBuf]) -> Vec<Finding>;
}

/// Filter by extension, then run the plugin over the remaining files.
pub async fn safe_analyze(plugin: &dyn SyntaxPlugin, files: &[PathBuf]) -> PluginReport {
    let relevant: Vec<PathBuf> = files
        .iter()
        .filter(|f| {
            f.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| plugin.extensions().contains(&format!(".{}", e.to_lowercase()).as_str()))
        })
        .cloned()
        .collect();

    if relevant.is_empty() {
        return PluginReport {
            plugin: plugin.name(),
            findings: Vec::new(),
            files_analyzed: 0,
            status: PluginStatus::Skipped,
        };
    }

    info!(plugin = plugin.name(), files = relevant.len(), "running syntax plugin");
    let findings = plugin.analyze(&relevant).await;
    PluginReport {
        plugin: plugin.name(),
        findings,
        files_analyzed: relevant.len(),
        status: PluginStatus::Success,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
