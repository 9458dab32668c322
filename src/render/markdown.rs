//! Markdown renderer — rule index plus one section per rule.

use crate::model::{Extraction, RuleEntry};
use crate::render::Renderer;
use crate::toc;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, extraction: &Extraction) -> String {
        let mut output = String::new();

        if !extraction.rules.is_empty() {
            output.push_str("## Index\n\n");
            for name in extraction.rules.keys() {
                output.push_str(&toc::render_toc_item(name));
                output.push('\n');
            }
            output.push('\n');
        }

        for rule in extraction.rules.values() {
            output.push_str(&render_rule(rule));
        }

        output
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_rule(rule: &RuleEntry) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n\n", rule.name));

    // Descriptions are already a restricted HTML subset; markdown passes
    // them through as-is.
    if !rule.description.is_empty() {
        out.push_str(&rule.description);
        out.push('\n');
    }

    if !rule.parameters.is_empty() {
        out.push_str("| Property | Description | Default Value |\n");
        out.push_str("| --- | --- | --- |\n");
        for param in &rule.parameters {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                cell(&param.key),
                cell(&param.description),
                cell(&param.default_value)
            ));
        }
        out.push('\n');
    }

    out
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RuleParameter;

    #[test]
    fn renders_index_and_sections() {
        let mut extraction = Extraction::default();
        extraction.rules.insert(
            "FooBar".to_string(),
            RuleEntry {
                name: "FooBar".to_string(),
                description: "<p>Checks things.</p>\n".to_string(),
                parameters: vec![RuleParameter {
                    key: "max".to_string(),
                    description: "Upper bound".to_string(),
                    default_value: "10".to_string(),
                }],
            },
        );

        let output = MarkdownRenderer.render(&extraction);
        assert!(output.starts_with("## Index\n\n* [FooBar](#foobar)\n"));
        assert!(output.contains("### FooBar\n\n<p>Checks things.</p>\n"));
        assert!(output.contains("| max | Upper bound | 10 |"));
    }

    #[test]
    fn empty_extraction_renders_nothing() {
        let output = MarkdownRenderer.render(&Extraction::default());
        assert!(output.is_empty());
    }
}
