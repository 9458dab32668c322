//! Cross-file merge: fold per-file rule mappings into one catalogue.
//!
//! Documentation for a rule may be spread over several files. Parameters
//! union across files; descriptions are first-writer-wins — earlier files
//! are authoritative, and a later differing description is reported as a
//! conflict, never adopted.

use crate::model::{DescriptionConflict, Extraction, RuleEntry};
use std::collections::BTreeMap;

/// Fold one file's mapping into the running accumulator.
pub fn fold(acc: &mut Extraction, source: BTreeMap<String, RuleEntry>) {
    for (name, entry) in source {
        let merged = acc
            .rules
            .entry(name.clone())
            .or_insert_with(|| RuleEntry::new(&name));

        for param in entry.parameters {
            merged.push_parameter(param);
        }

        if merged.description.is_empty() {
            merged.description = entry.description;
        } else if !entry.description.is_empty() && entry.description != merged.description {
            acc.conflicts.push(DescriptionConflict {
                rule: name,
                kept: merged.description.clone(),
                rejected: entry.description,
            });
        }
    }
}
