use globset::Glob;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SysfsError;

#[derive(Debug, Clone)]
pub struct Sysfs {
    root: PathBuf,
}

impl Sysfs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps an absolute path such as `/sys/class/dmi/id` below the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    /// Expands a shell-style pattern one path segment at a time.
    ///
    /// Matches within a directory are sorted by name. Hidden entries are
    /// skipped unless the segment itself starts with a dot. Unreadable
    /// directories and invalid patterns yield no matches.
    pub fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let mut matches = vec![self.root.clone()];

        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            if !is_pattern(segment) {
                matches = matches
                    .into_iter()
                    .map(|dir| dir.join(segment))
                    .filter(|path| fs::symlink_metadata(path).is_ok())
                    .collect();
            } else {
                let matcher = match Glob::new(segment) {
                    Ok(glob) => glob.compile_matcher(),
                    Err(e) => {
                        tracing::debug!("Invalid glob segment {:?}: {}", segment, e);
                        return Vec::new();
                    }
                };
                let show_hidden = segment.starts_with('.');

                let mut next = Vec::new();
                for dir in &matches {
                    let entries = match fs::read_dir(dir) {
                        Ok(entries) => entries,
                        Err(e) => {
                            tracing::debug!("Skipping {:?}: {}", dir, e);
                            continue;
                        }
                    };
                    let mut names: Vec<_> = entries
                        .filter_map(Result::ok)
                        .map(|entry| entry.file_name())
                        .filter(|name| {
                            let name = name.to_string_lossy();
                            (show_hidden || !name.starts_with('.')) && matcher.is_match(&*name)
                        })
                        .collect();
                    names.sort();
                    next.extend(names.into_iter().map(|name| dir.join(name)));
                }
                matches = next;
            }

            if matches.is_empty() {
                break;
            }
        }

        matches
    }
}

fn is_pattern(segment: &str) -> bool {
    segment.contains(['*', '?', '['])
}

/// Reads a whole attribute file with surrounding whitespace trimmed.
pub fn read_trimmed(path: &Path) -> Result<String, SysfsError> {
    fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|source| SysfsError::Read {
            path: path.to_path_buf(),
            source,
        })
}
