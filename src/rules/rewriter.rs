use crate::error::{PatchError, Result};
use regex::{Regex, RegexBuilder};

/// Parsed substitution command (sed-like syntax).
#[derive(Debug)]
pub struct Substitution {
	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string. `$1` / `${name}` reference capture groups.
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

impl Substitution {
	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g".
	///
	/// Supported flags: `g` (global), `i` (case-insensitive), `m` (multi-line
	/// anchors) and `s` (`.` matches newlines).
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| PatchError::InvalidSubstitution {
			expr: input.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Err(invalid("substitution must start with 's'"));
		}

		// The delimiter is the character right after 's'
		let delimiter = chars.next().ok_or_else(|| invalid("substitution too short"))?;
		if delimiter.is_alphanumeric() || delimiter == '\\' || delimiter.is_whitespace() {
			return Err(invalid("delimiter must be a punctuation character"));
		}

		let parts = split_by_delimiter(chars.as_str(), delimiter);
		if parts.len() < 3 {
			return Err(invalid("substitution must have pattern, replacement and closing delimiter"));
		}
		if parts.len() > 3 {
			return Err(invalid("unescaped delimiter in substitution"));
		}

		let pattern_str = &parts[0];
		if pattern_str.is_empty() {
			return Err(invalid("empty pattern"));
		}
		let replacement = parts[1].clone();

		let mut builder = RegexBuilder::new(pattern_str);
		let mut global = false;
		for flag in parts[2].chars() {
			match flag {
				'g' => global = true,
				'i' => {
					builder.case_insensitive(true);
				}
				'm' => {
					builder.multi_line(true);
				}
				's' => {
					builder.dot_matches_new_line(true);
				}
				other => return Err(invalid(&format!("unknown flag '{other}'"))),
			}
		}

		let pattern = builder.build().map_err(|source| PatchError::InvalidRegex {
			pattern: pattern_str.to_string(),
			source,
		})?;

		Ok(Substitution {
			pattern,
			replacement,
			global,
		})
	}
}

/// Split a string by a delimiter, respecting backslash escapes of the delimiter.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c == '\\' && chars.peek() == Some(&delimiter) {
			// Escaped delimiter becomes a literal delimiter character
			if let Some(escaped) = chars.next() {
				current.push(escaped);
			}
		} else if c == delimiter {
			parts.push(std::mem::take(&mut current));
		} else {
			current.push(c);
		}
	}

	parts.push(current);
	parts
}
