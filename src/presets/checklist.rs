//! Checkbox toggling for markdown task lists.
//!
//! An item only matches a whole line: `Deploy` never ticks `- [ ] Deploy to
//! prod`. Each rule replaces the first matching line, so one item ticks
//! exactly one line even if the same text appears again further down.

use crate::error::Result;
use crate::rules::{RuleSet, SubstitutionRule};

/// Task list patched by `routefix check` when no file is given.
pub const DEFAULT_CHECKLIST: &str = "todo.md";

const UNCHECKED: &str = "- [ ] ";
const CHECKED: &str = "- [x] ";

/// Strip a leading checkbox marker so items can be passed with or without it.
fn item_text(item: &str) -> &str {
	item.strip_prefix(UNCHECKED)
		.or_else(|| item.strip_prefix(CHECKED))
		.unwrap_or(item)
}

/// Rules built from arbitrary (old text, new text) literal pairs.
pub fn toggle_pairs<A: AsRef<str>, B: AsRef<str>>(pairs: &[(A, B)]) -> Vec<SubstitutionRule> {
	pairs
		.iter()
		.enumerate()
		.map(|(i, (old, new))| {
			SubstitutionRule::literal(format!("toggle-{}", i + 1), old.as_ref(), new.as_ref())
				.first_only()
		})
		.collect()
}

/// A first-match rule rewriting the line `<from><text>` into `<to><text>`.
///
/// Indentation, trailing blanks and a `\r` line ending are kept.
fn line_rule(index: usize, from: &str, to: &str, text: &str) -> Result<SubstitutionRule> {
	let pattern = format!(
		r"(?m)^(?P<indent>[ \t]*){}(?P<eol>[ \t]*\r?)$",
		regex::escape(&format!("{from}{text}"))
	);
	let replacement = format!("${{indent}}{}${{eol}}", format!("{to}{text}").replace('$', "$$"));

	Ok(SubstitutionRule::regex(format!("toggle-{index}"), &pattern, replacement)?.first_only())
}

fn item_rules<S: AsRef<str>>(items: &[S], from: &str, to: &str) -> Result<Vec<SubstitutionRule>> {
	items
		.iter()
		.enumerate()
		.map(|(i, item)| line_rule(i + 1, from, to, item_text(item.as_ref())))
		.collect()
}

/// Rules ticking `- [ ] <item>` to `- [x] <item>`.
pub fn check_rules<S: AsRef<str>>(items: &[S]) -> Result<Vec<SubstitutionRule>> {
	item_rules(items, UNCHECKED, CHECKED)
}

/// Rules unticking `- [x] <item>` back to `- [ ] <item>`.
pub fn uncheck_rules<S: AsRef<str>>(items: &[S]) -> Result<Vec<SubstitutionRule>> {
	item_rules(items, CHECKED, UNCHECKED)
}

/// A rule set for `file` that checks (or, with `undo`, unchecks) `items`.
pub fn checklist_rule_set<S: AsRef<str>>(file: &str, items: &[S], undo: bool) -> Result<RuleSet> {
	Ok(RuleSet {
		name: (if undo { "uncheck" } else { "check" }).to_string(),
		targets: vec![file.to_string()],
		rules: if undo {
			uncheck_rules(items)?
		} else {
			check_rules(items)?
		},
	})
}
