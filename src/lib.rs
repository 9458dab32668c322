//! aptdoc — extract lint-rule documentation from APT rule catalogues.
//!
//! Parses "Almost Plain Text" documentation files into a mapping from rule
//! name to [`model::RuleEntry`]: a cleaned HTML-subset description,
//! parameters recovered from ASCII-art tables, and inline code examples.
//! Results from multiple files merge with first-file priority; conflicting
//! descriptions and unreadable files come back as structured diagnostics
//! rather than log output.

pub mod model;
pub mod parser;
pub mod render;
pub mod toc;
