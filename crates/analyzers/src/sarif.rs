// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SARIF 2.1.0 assembly and atomic report writing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pc_core::Finding;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PipelineError;

pub const SARIF_SCHEMA: &str = "https://json.schemastore.org/sarif-2.1.0";
pub const SARIF_VERSION: &str = "2.1.0";

/// Driver identity per tool name.
pub struct ToolInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub information_uri: &'static str,
}

static TOOL_TABLE: &[ToolInfo] = &[
    ToolInfo {
        name: "semgrep",
        version: "1.x",
        information_uri: "https://semgrep.dev",
    },
    ToolInfo {
        name: "gitleaks",
        version: "8.x",
        information_uri: "https://github.com/gitleaks/gitleaks",
    },
    ToolInfo {
        name: "osv-scanner",
        version: "1.x",
        information_uri: "https://github.com/google/osv-scanner",
    },
    ToolInfo {
        name: "ruff",
        version: "0.x",
        information_uri: "https://docs.astral.sh/ruff",
    },
    ToolInfo {
        name: "eslint",
        version: "9.x",
        information_uri: "https://eslint.org",
    },
    ToolInfo {
        name: "lizard",
        version: "1.x",
        information_uri: "https://github.com/terryyin/lizard",
    },
    ToolInfo {
        name: "duplication",
        version: "1.0.0",
        information_uri: "https://github.com/pit-crew/agents",
    },
    ToolInfo {
        name: "yaml-syntax",
        version: "1.0.0",
        information_uri: "https://yaml.org",
    },
    ToolInfo {
        name: "typescript-syntax",
        version: "1.0.0",
        information_uri: "https://www.typescriptlang.org",
    },
];

fn tool_info(tool: &str) -> ToolInfo {
    TOOL_TABLE
        .iter()
        .find(|info| info.name == tool)
        .map(|info| ToolInfo {
            name: info.name,
            version: info.version,
            information_uri: info.information_uri,
        })
        .unwrap_or(ToolInfo {
            name: "unknown",
            version: "0.0.0",
            information_uri: "",
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifLog {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub version: String,
    pub runs: Vec<SarifRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifRun {
    pub tool: SarifTool,
    pub results: Vec<SarifResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifTool {
    pub driver: SarifDriver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifDriver {
    pub name: String,
    pub version: String,
    #[serde(rename = "informationUri")]
    pub information_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifResult {
    #[serde(rename = "ruleId")]
    pub rule_id: String,
    pub level: String,
    pub message: SarifMessage,
    pub locations: Vec<SarifLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifMessage {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    pub physical_location: PhysicalLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalLocation {
    #[serde(rename = "artifactLocation")]
    pub artifact_location: ArtifactLocation,
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactLocation {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "startColumn")]
    pub start_column: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "endColumn")]
    pub end_column: u32,
}

/// Assemble a SARIF document: one run per tool, results sorted stably by
/// `(file, start_line, rule_id)` within each run.
pub fn build(findings: &[Finding], repo_root: Option<&Path>) -> SarifLog {
    let mut by_tool: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for finding in findings {
        by_tool.entry(finding.tool.as_str()).or_default().push(finding);
    }

    let runs = by_tool
        .into_iter()
        .map(|(tool, mut tool_findings)| {
            tool_findings.sort_by(|a, b| {
                (&a.file_path, a.start_line, &a.rule_id)
                    .cmp(&(&b.file_path, b.start_line, &b.rule_id))
            });
            let info = tool_info(tool);
            SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: tool.to_string(),
                        version: info.version.to_string(),
                        information_uri: info.information_uri.to_string(),
                    },
                },
                results: tool_findings
                    .into_iter()
                    .map(|f| to_result(f, repo_root))
                    .collect(),
            }
        })
        .collect();

    SarifLog {
        schema: SARIF_SCHEMA.to_string(),
        version: SARIF_VERSION.to_string(),
        runs,
    }
}

fn to_result(finding: &Finding, repo_root: Option<&Path>) -> SarifResult {
    let start_line = finding.start_line.max(1);
    let start_column = finding.start_column.unwrap_or(1).max(1);

    let mut properties = serde_json::Map::new();
    if let Some(category) = finding.category {
        properties.insert("category".to_string(), json!(category));
    }
    if let Some(score) = finding.score {
        properties.insert("score".to_string(), json!(score));
    }
    if let Some(Value::Object(metadata)) = &finding.metadata {
        for (key, value) in metadata {
            properties.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }

    SarifResult {
        rule_id: finding.rule_id.clone(),
        level: finding.severity.sarif_level().to_string(),
        message: SarifMessage {
            text: finding.message.clone(),
        },
        locations: vec![SarifLocation {
            physical_location: PhysicalLocation {
                artifact_location: ArtifactLocation {
                    uri: relative_uri(&finding.file_path, repo_root),
                },
                region: Region {
                    start_line,
                    start_column,
                    end_line: finding.end_line.unwrap_or(start_line).max(start_line),
                    end_column: finding.end_column.unwrap_or(start_column),
                },
            },
        }],
        properties: if properties.is_empty() {
            None
        } else {
            Some(Value::Object(properties))
        },
    }
}

fn relative_uri(file_path: &str, repo_root: Option<&Path>) -> String {
    if let Some(root) = repo_root {
        if let Ok(relative) = Path::new(file_path).strip_prefix(root) {
            return relative.display().to_string();
        }
    }
    file_path.to_string()
}

/// Write the document to `path` atomically: pretty-printed JSON to a temp
/// sibling, then rename into place.
pub fn write_report(log: &SarifLog, path: &Path) -> Result<(), PipelineError> {
    let fail = |source: std::io::Error| PipelineError::ReportWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(fail)?;
        }
    }

    let mut body = serde_json::to_vec_pretty(log)
        .map_err(|e| fail(std::io::Error::other(e)))?;
    body.push(b'\n');

    let mut tmp: PathBuf = path.to_path_buf();
    tmp.as_mut_os_string().push(".tmp");
    std::fs::write(&tmp, &body).map_err(fail)?;
    std::fs::rename(&tmp, path).map_err(fail)?;
    Ok(())
}

#[cfg(test)]
#[path = "sarif_tests.rs"]
mod tests;
