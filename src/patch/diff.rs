//! Diff generation for previewing changes.

use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Generates a unified diff between two strings.
pub fn unified_diff(original: &str, modified: &str, path: &Path) -> String {
	let old_header = format!("a/{}", path.display());
	let new_header = format!("b/{}", path.display());

	let diff = TextDiff::from_lines(original, modified);
	let mut unified = diff.unified_diff();
	unified.context_radius(3).header(&old_header, &new_header);
	unified.to_string()
}

/// Line counts of a diff.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiffStat {
	pub insertions: usize,
	pub deletions: usize,
}

impl DiffStat {
	pub fn from_texts(original: &str, modified: &str) -> Self {
		let diff = TextDiff::from_lines(original, modified);
		let mut stat = DiffStat::default();

		for change in diff.iter_all_changes() {
			match change.tag() {
				ChangeTag::Insert => stat.insertions += 1,
				ChangeTag::Delete => stat.deletions += 1,
				ChangeTag::Equal => {}
			}
		}

		stat
	}
}

impl std::fmt::Display for DiffStat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} insertion(s)(+), {} deletion(s)(-)",
			self.insertions, self.deletions
		)
	}
}
