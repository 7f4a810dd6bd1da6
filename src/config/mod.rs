//! Rule-set files for routefix.
//!
//! This module handles:
//! - TOML rule-set parsing and validation
//! - Discovery of `.routefix.toml` from the working directory upward
//! - The `routefix init` template

pub mod cascade;
pub mod parser;
pub mod template;
pub mod types;

pub use cascade::{RULES_FILE_NAME, discover_rule_file};
pub use parser::{parse_rule_file, parse_rule_str};
pub use template::generate_init_template;
pub use types::{RuleSetFile, RuleSpec};
