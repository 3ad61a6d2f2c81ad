//! Repository snapshot rendering.
//!
//! The synchronizer reads every file from the repository mirror and sends the
//! whole tree to the model as one informational message. Rendering that
//! message is pure domain logic; the map is ordered so the brief is stable
//! across refreshes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The full contents of the repository mirror at one point in time.
///
/// Keys are paths relative to the repository root, values are file contents.
/// VCS metadata is excluded by the mirror before the snapshot is built.
#[derive(Debug, Clone, Default)]
pub struct RepositorySnapshot {
    files: BTreeMap<String, String>,
}

impl RepositorySnapshot {
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Self { files }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Render the snapshot as a context brief: one block per file with its
    /// path, containing folder, and full content.
    pub fn render_brief(&self) -> String {
        let mut brief = String::from(
            "Project Context Update:\n\
             The following is the project folder structure along with file \
             locations and full file contents:\n\n",
        );

        for (path, content) in &self.files {
            let folder = match path.rsplit_once('/') {
                Some((dir, _)) => dir,
                None => ".",
            };
            brief.push_str(&format!("File: {}\n", path));
            brief.push_str(&format!("Location: {}\n", folder));
            brief.push_str("Content:\n");
            brief.push_str(content);
            brief.push_str("\n----------------\n");
        }

        brief
    }
}

/// Monotonic generation counter for the model's repository context.
///
/// Every successful refresh fully replaces the prior context and bumps the
/// revision, so callers can assert exactly which snapshot generation was
/// active for a given decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContextRevision(u64);

impl ContextRevision {
    /// The revision before any refresh has happened.
    pub const INITIAL: ContextRevision = ContextRevision(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ContextRevision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(entries: &[(&str, &str)]) -> RepositorySnapshot {
        RepositorySnapshot::new(
            entries
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_brief_contains_path_folder_and_content() {
        let snap = snapshot(&[("src/main.rs", "fn main() {}")]);
        let brief = snap.render_brief();
        assert!(brief.contains("File: src/main.rs"));
        assert!(brief.contains("Location: src"));
        assert!(brief.contains("fn main() {}"));
    }

    #[test]
    fn test_root_file_location_is_dot() {
        let brief = snapshot(&[("README.md", "hello")]).render_brief();
        assert!(brief.contains("Location: .\n"));
    }

    #[test]
    fn test_brief_order_is_deterministic() {
        let a = snapshot(&[("b.rs", "2"), ("a.rs", "1")]).render_brief();
        let b = snapshot(&[("a.rs", "1"), ("b.rs", "2")]).render_brief();
        assert_eq!(a, b);
        assert!(a.find("a.rs").unwrap() < a.find("b.rs").unwrap());
    }

    #[test]
    fn test_revision_ordering_and_display() {
        assert_eq!(ContextRevision::INITIAL.value(), 0);
        assert!(ContextRevision::INITIAL < ContextRevision::new(1));
        assert_eq!(ContextRevision::new(1).to_string(), "r1");
    }
}
