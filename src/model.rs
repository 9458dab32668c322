//! Data model for extracted rule documentation — format-agnostic.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// One documented lint rule, keyed by name in the extraction mapping.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub name: String,
    /// Restricted HTML subset: `<p>`, `<i>`, `<b>`, `<code>`, `<pre>` only.
    /// Built incrementally from paragraph lines and example blocks in
    /// document order.
    pub description: String,
    /// Unordered, no structural duplicates.
    pub parameters: Vec<RuleParameter>,
}

impl RuleEntry {
    pub fn new(name: &str) -> Self {
        RuleEntry {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Add a parameter unless it is empty or already present.
    pub fn push_parameter(&mut self, param: RuleParameter) {
        if !param.is_empty() && !self.parameters.contains(&param) {
            self.parameters.push(param);
        }
    }
}

/// A single entry from a rule's parameter table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuleParameter {
    /// May be assembled from several physical rows when the name wraps.
    pub key: String,
    pub description: String,
    /// First non-blank fragment wins; later ones are ignored.
    pub default_value: String,
}

impl RuleParameter {
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.description.is_empty() && self.default_value.is_empty()
    }
}

/// Two source files supplied different non-blank descriptions for one rule.
/// Diagnostic only — the first-seen text is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionConflict {
    pub rule: String,
    pub kept: String,
    pub rejected: String,
}

/// A documentation file that could not be read. It contributes no entries.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of extracting a batch of documentation files.
#[derive(Debug, Default)]
pub struct Extraction {
    pub rules: BTreeMap<String, RuleEntry>,
    pub conflicts: Vec<DescriptionConflict>,
    pub failures: Vec<SourceFailure>,
}
