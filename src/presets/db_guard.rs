//! Repairs for mangled database-guard boilerplate in route handlers.
//!
//! A bad bulk edit pasted the guarded declaration
//! `const db = await getDb(); if (!db) throw ...;` in front of every
//! `await db.` call. That left it in the middle of declarations
//! (`const [row] = const db = ...; await db.select()`) and after `return`,
//! and repeated it before calls where `db` was already in scope.
//!
//! The rules are order dependent: hoisting produces duplicate guards that the
//! collapsing rule then removes.
//!
//! A guard is redundant when an earlier guard or `await db.` call sits in the
//! same block. "Same block" means only balanced `{ ... }` groups lie between
//! the two, nested at most two levels deep; deeper nesting is left alone.

use crate::error::Result;
use crate::rules::SubstitutionRule;

/// Throw statement used by tRPC route handlers.
pub const TRPC_THROW: &str =
	r#"throw new TRPCError({ code: "INTERNAL_SERVER_ERROR", message: "Database not available" });"#;

/// Throw statement used by plain service modules.
pub const PLAIN_THROW: &str = r#"throw new Error("Database not available");"#;

/// The guarded declaration for a given throw statement, in its canonical
/// single-line layout.
pub fn guard_statement(throw_statement: &str) -> String {
	format!("const db = await getDb(); if (!db) {throw_statement}")
}

/// Regex source matching `literal` with flexible whitespace.
///
/// Whitespace between two word characters becomes `\s+`; any other
/// whitespace becomes `\s*`. Everything else is escaped.
pub fn flexible(literal: &str) -> String {
	let is_word = |c: char| c.is_alphanumeric() || c == '_';
	let mut out = String::new();
	let mut prev: Option<char> = None;
	let mut pending_ws = false;

	for c in literal.chars() {
		if c.is_whitespace() {
			pending_ws = true;
			continue;
		}
		if pending_ws {
			let word_gap = prev.is_some_and(is_word) && is_word(c);
			out.push_str(if word_gap { r"\s+" } else { r"\s*" });
			pending_ws = false;
		}
		out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
		prev = Some(c);
	}

	out
}

/// Regex source for a `{ ... }` group with at most one nested group inside.
const BALANCED: &str = r"\{(?:[^{}]|\{[^{}]*\})*\}";

/// Rules repairing guards that use `throw_statement`, in canonical order.
pub fn guard_rules(throw_statement: &str) -> Result<Vec<SubstitutionRule>> {
	let guard = flexible(&guard_statement(throw_statement));

	Ok(vec![
		SubstitutionRule::regex(
			"hoist-guard-from-declaration",
			&format!(
				r"\b(?P<kw>const|let|var)\s+(?P<target>\[[^\]]*\]|\{{[^}}]*\}}|[A-Za-z_$][\w$]*)\s*=\s*(?P<guard>{guard})(?P<ws>\s*)await\s+db\."
			),
			"${guard}${ws}${kw} ${target} = await db.",
		)?,
		SubstitutionRule::regex(
			"hoist-guard-from-return",
			&format!(r"\breturn\s+(?P<guard>{guard})(?P<ws>\s*)await\s+db\."),
			"${guard}${ws}return await db.",
		)?,
		SubstitutionRule::regex(
			"collapse-redundant-guard",
			&format!(
				r"(?P<kept>(?:{guard}|await\s+db\.)(?:[^{{}}]|{BALANCED})*?(?:;|{BALANCED})\s*){guard}\s*"
			),
			"${kept}",
		)?,
	])
}

/// Rules for tRPC routers (`TRPCError` guards).
pub fn trpc_rules() -> Result<Vec<SubstitutionRule>> {
	guard_rules(TRPC_THROW)
}

/// Rules for service modules (`Error` guards).
pub fn plain_rules() -> Result<Vec<SubstitutionRule>> {
	guard_rules(PLAIN_THROW)
}
