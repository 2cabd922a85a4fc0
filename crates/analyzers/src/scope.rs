// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scope filtering: which files a given analyzer looks at.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use pc_core::AnalysisMode;
use tracing::warn;

/// Directory names never descended into during scope expansion.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    ".pytest_cache",
    "dist",
    "build",
];

/// Dependency manifests the security profile always includes.
pub(crate) const SECURITY_MANIFESTS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "requirements.txt",
    "poetry.lock",
    "Pipfile.lock",
];

const SECURITY_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go", ".rs", ".c", ".cpp", ".h", ".hpp",
    ".php", ".rb", ".swift", ".kt",
];

const QUALITY_EXTENSIONS: &[&str] = &[".py", ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs"];

const YAML_EXTENSIONS: &[&str] = &[".yaml", ".yml"];

/// Extension allow-list plus size cap for one analyzer family.
#[derive(Debug, Clone)]
pub struct FilterProfile {
    extensions: HashSet<String>,
    manifests: HashSet<String>,
    max_file_size: u64,
}

impl FilterProfile {
    /// SAST profile: source extensions plus dependency manifests.
    pub fn security(max_file_size_mb: u64) -> Self {
        FilterProfile {
            extensions: SECURITY_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            manifests: SECURITY_MANIFESTS.iter().map(|s| s.to_string()).collect(),
            max_file_size: max_file_size_mb * 1024 * 1024,
        }
    }

    /// Lint/complexity profile; extensions vary with the analysis mode.
    pub fn quality(mode: AnalysisMode, max_file_size_mb: u64) -> Self {
        let extensions: HashSet<String> = match mode {
            AnalysisMode::Standard => {
                QUALITY_EXTENSIONS.iter().map(|s| s.to_string()).collect()
            }
            AnalysisMode::SyntaxExtended => QUALITY_EXTENSIONS
                .iter()
                .chain(YAML_EXTENSIONS)
                .map(|s| s.to_string())
                .collect(),
            AnalysisMode::YamlStrict => YAML_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        };
        FilterProfile {
            extensions,
            manifests: HashSet::new(),
            max_file_size: max_file_size_mb * 1024 * 1024,
        }
    }

    /// Whether the file name matches the allow-list (without touching disk).
    pub fn matches(&self, path: &Path) -> bool {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if self.manifests.contains(name) {
                return true;
            }
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&format!(".{}", ext.to_lowercase())),
            None => false,
        }
    }

    /// Expand a scope (paths, directories, glob patterns) into the
    /// deduplicated set of existing regular files this profile accepts.
    pub fn filter_scope(&self, scope: &[String]) -> Vec<PathBuf> {
        let mut selected: BTreeSet<PathBuf> = BTreeSet::new();

        for entry in scope {
            if entry.contains('*') || entry.contains('?') || entry.contains('[') {
                match glob::glob(entry) {
                    Ok(paths) => {
                        for path in paths.flatten() {
                            self.collect(&path, &mut selected);
                        }
                    }
                    Err(e) => warn!(pattern = %entry, error = %e, "invalid scope glob"),
                }
            } else {
                self.collect(Path::new(entry), &mut selected);
            }
        }

        selected.into_iter().collect()
    }

    fn collect(&self, path: &Path, selected: &mut BTreeSet<PathBuf>) {
        let Ok(meta) = std::fs::metadata(path) else {
            return;
        };

        if meta.is_dir() {
            self.walk_dir(path, selected);
        } else if meta.is_file() && self.accepts_file(path, meta.len()) {
            selected.insert(path.to_path_buf());
        }
    }

    fn walk_dir(&self, dir: &Path, selected: &mut BTreeSet<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                let skipped = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| SKIP_DIRS.contains(&n));
                if !skipped {
                    self.walk_dir(&path, selected);
                }
            } else if file_type.is_file() {
                if let Ok(meta) = entry.metadata() {
                    if self.accepts_file(&path, meta.len()) {
                        selected.insert(path);
                    }
                }
            }
        }
    }

    fn accepts_file(&self, path: &Path, size: u64) -> bool {
        if size > self.max_file_size {
            warn!(path = %path.display(), size, "skipping oversized file");
            return false;
        }
        self.matches(path)
    }
}

/// Split out the files with one of the given extensions.
pub fn files_with_extensions<'a>(files: &'a [PathBuf], extensions: &[&str]) -> Vec<&'a PathBuf> {
    files
        .iter()
        .filter(|f| {
            f.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e.to_lowercase().as_str()))
        })
        .collect()
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
