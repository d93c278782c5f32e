//! Static validation of Python code blocks in generated articles.
//!
//! Extracts fenced `python`/`py` blocks from markdown and runs a set of
//! static checks against each one: a structural syntax scan, shell-command
//! detection, and placeholder detection. Validation is pure and
//! deterministic; the same input always yields the same report.

mod code_blocks;
mod python;

pub use code_blocks::{extract_code_blocks, validate_article, validate_block, ValidationReport};
pub use python::{check_syntax, SyntaxIssue};
