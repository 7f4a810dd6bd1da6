//! Routefix - CLI tool for applying ordered regex and literal patches to
//! source trees and checklists.
//!
//! This library provides the core functionality for routefix, including:
//! - Literal and regex substitution rules applied over whole file contents
//! - Glob-based target resolution
//! - Change-only file rewriting with halt or keep-going failure policies
//! - Built-in presets and TOML rule-set files
//!
//! # Example
//!
//! ```no_run
//! use routefix_cli::patch::{PatchOptions, run};
//! use routefix_cli::presets::find_preset;
//! use routefix_cli::targets::resolve_targets;
//!
//! let cwd = std::env::current_dir().unwrap();
//! let preset = find_preset("db-guard").unwrap();
//! let rule_set = preset.rule_set().unwrap();
//! let targets = resolve_targets(&cwd, &rule_set.targets).unwrap();
//!
//! let summary = run(
//!     &targets,
//!     &rule_set.rules,
//!     &PatchOptions::default(),
//!     &mut std::io::stdout(),
//! )
//! .unwrap();
//! println!("{} file(s) changed", summary.changed.len());
//! ```

pub mod config;
pub mod error;
pub mod patch;
pub mod presets;
pub mod rules;
pub mod targets;

pub use error::{PatchError, Result};
