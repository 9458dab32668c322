//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the rule catalogue directly; the caller decides what to do
//! with diagnostics, so only rules appear here.

use crate::model::{Extraction, RuleEntry};
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, extraction: &Extraction) -> String {
        let mut out = String::new();
        out.push_str("{\n  \"rules\": [\n");

        let total = extraction.rules.len();
        for (i, rule) in extraction.rules.values().enumerate() {
            out.push_str(&render_rule_json(rule));
            if i < total - 1 {
                out.push_str(",\n");
            } else {
                out.push('\n');
            }
        }

        out.push_str("  ]\n}\n");
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}

fn render_rule_json(rule: &RuleEntry) -> String {
    let mut out = String::new();
    out.push_str("    {\n");
    out.push_str(&format!("      \"name\": \"{}\",\n", json_escape(&rule.name)));
    out.push_str(&format!(
        "      \"description\": \"{}\",\n",
        json_escape(&rule.description)
    ));

    out.push_str("      \"parameters\": [");
    if rule.parameters.is_empty() {
        out.push_str("]\n");
    } else {
        out.push('\n');
        for (i, param) in rule.parameters.iter().enumerate() {
            let comma = if i < rule.parameters.len() - 1 { "," } else { "" };
            out.push_str(&format!(
                "        {{ \"key\": \"{}\", \"description\": \"{}\", \"default\": \"{}\" }}{}\n",
                json_escape(&param.key),
                json_escape(&param.description),
                json_escape(&param.default_value),
                comma
            ));
        }
        out.push_str("      ]\n");
    }

    out.push_str("    }");
    out
}

fn json_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleParameter;

    #[test]
    fn renders_rules_with_parameters() {
        let mut extraction = Extraction::default();
        extraction.rules.insert(
            "FooBar".to_string(),
            RuleEntry {
                name: "FooBar".to_string(),
                description: "<p>line one</p>\n".to_string(),
                parameters: vec![RuleParameter {
                    key: "max".to_string(),
                    description: "says \"hi\"".to_string(),
                    default_value: "10".to_string(),
                }],
            },
        );

        let output = JsonRenderer.render(&extraction);
        assert!(output.contains("\"name\": \"FooBar\""));
        assert!(output.contains("\\n"));
        assert!(output.contains("says \\\"hi\\\""));
        assert!(output.contains("\"default\": \"10\""));
    }

    #[test]
    fn empty_extraction_is_an_empty_list() {
        let output = JsonRenderer.render(&Extraction::default());
        assert_eq!(output, "{\n  \"rules\": [\n  ]\n}\n");
    }
}
