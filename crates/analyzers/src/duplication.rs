// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process duplication detection.
//!
//! Jaccard similarity over each file's set of lines, pairwise across the
//! filtered scope. Cheap and coarse, but catches copy-pasted files.

use std::collections::HashSet;
use std::path::PathBuf;

use pc_core::{Category, Finding, Severity};
use serde_json::json;
use tracing::warn;

pub const TOOL: &str = "duplication";

/// Compare all file pairs and report those above the similarity threshold.
pub fn detect(files: &[PathBuf], threshold: f64) -> Vec<Finding> {
    let mut contents: Vec<(&PathBuf, HashSet<String>)> = Vec::with_capacity(files.len());
    for file in files {
        match std::fs::read_to_string(file) {
            Ok(text) => {
                let lines = text.lines().map(str::to_string).collect();
                contents.push((file, lines));
            }
            Err(e) => warn!(file = %file.display(), error = %e, "could not read file"),
        }
    }

    let mut findings = Vec::new();
    for i in 0..contents.len() {
        for j in (i + 1)..contents.len() {
            let (first, first_lines) = &contents[i];
            let (second, second_lines) = &contents[j];
            let similarity = jaccard(first_lines, second_lines);
            if similarity > threshold {
                findings.push(
                    Finding::new(
                        TOOL,
                        "DUPLICATION",
                        format!(
                            "High similarity ({:.1}%) detected between files",
                            similarity * 100.0
                        ),
                        Severity::Warning,
                        first.display().to_string(),
                        1,
                    )
                    .with_category(Category::Duplication)
                    .with_score(similarity)
                    .with_fix("Consider extracting common code to shared utilities")
                    .with_metadata(json!({
                        "similar_file": second.display().to_string(),
                        "similarity": similarity,
                    })),
                );
            }
        }
    }
    findings
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
#[path = "duplication_tests.rs"]
mod tests;
