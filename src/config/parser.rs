use crate::config::types::RuleSetFile;
use crate::error::{PatchError, Result};
use std::path::Path;

/// Parse a rule-set file from the given path.
pub fn parse_rule_file(path: &Path) -> Result<RuleSetFile> {
	let content = std::fs::read_to_string(path).map_err(|source| PatchError::RulesReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_rule_str(&content, path)
}

/// Parse a rule set from a string (useful for testing).
pub fn parse_rule_str(content: &str, path: &Path) -> Result<RuleSetFile> {
	let file: RuleSetFile =
		toml::from_str(content).map_err(|source| PatchError::RulesParseError {
			path: path.to_path_buf(),
			source,
		})?;

	file.validate()?;

	Ok(file)
}
