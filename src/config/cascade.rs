use std::path::{Path, PathBuf};
use tracing::debug;

/// File name searched for when no rule set is given explicitly.
pub const RULES_FILE_NAME: &str = ".routefix.toml";

/// Find the nearest rule-set file.
///
/// Looks for `.routefix.toml` in `start_dir`, then in each parent directory.
/// Returns the first one found.
pub fn discover_rule_file(start_dir: &Path) -> Option<PathBuf> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let candidate = dir.join(RULES_FILE_NAME);
		if candidate.is_file() {
			debug!(path = %candidate.display(), "found rule set");
			return Some(candidate);
		}
		current_dir = dir.parent();
	}

	None
}
