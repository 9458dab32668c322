//! APT rule-catalogue parser — line-by-line state machine.
//!
//! The "Almost Plain Text" dialect has no fixed grammar: rule boundaries,
//! parameter tables, and example blocks are recognized by line-prefix
//! heuristics and per-line pattern matching, with multi-line accumulation
//! state. Anything unrecognized is prose or is silently consumed; there is
//! no fatal path for malformed input.

use crate::model::{RuleEntry, RuleParameter};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

// Horizontal rules delimiting example blocks: a dash run, or `+` then dashes.
static RE_HR_DASH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-+$").unwrap());

static RE_HR_PLUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+-+$").unwrap());

// Three-column table header separator: `*---+---+---*` (or trailing `+`).
static RE_TABLE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*-+\+-+\+-+[*+]?$").unwrap());

// Any row separator inside a table body.
static RE_ROW_SEP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[*+][-+*]+$").unwrap());

static RE_DATA_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|.*$").unwrap());

// A bare `<` or `>` with whitespace on both sides is a comparison operator,
// not markup.
static RE_BARE_LT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<a>^|\s)<(?P<b>\s|$)").unwrap());

static RE_BARE_GT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<a>^|\s)>(?P<b>\s|$)").unwrap());

/// Multi-character operator tokens mapped to entities, longest first, so
/// that e.g. `<=` is never half-consumed by a bare `<` rule.
const OPERATOR_ENTITIES: &[(&str, &str)] = &[
    ("<=>", "&lt;=&gt;"),
    ("<<<=", "&lt;&lt;&lt;="),
    (">>>=", "&gt;&gt;&gt;="),
    ("<<=", "&lt;&lt;="),
    (">>=", "&gt;&gt;="),
    ("\\<", "&lt;"),
    ("\\>", "&gt;"),
    ("\\=", "="),
    ("<=", "&lt;="),
    (">=", "&gt;="),
    ("->", "-&gt;"),
];

// Private-use placeholders for the markup round-trip in
// `clean_description_text`.
const OPEN_MARK: char = '\u{e000}';
const CLOSE_MARK: char = '\u{e001}';

/// Caption of the key column; a data row repeating it is a wrapped header.
const KEY_COLUMN_CAPTION: &str = "<<property>>";

/// Lines starting with these are metadata callouts, nested bullets, or
/// list/table punctuation — never description prose.
const NOISE_PREFIXES: &[&str] = &["**", "<", "[", "|", "+"];

// -- Parser state -------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum LineState {
    #[default]
    Outside,
    InDescription,
    InExample,
    InParameterTable,
}

#[derive(Default)]
struct ParserState {
    // Finished entries for this file
    rules: BTreeMap<String, RuleEntry>,

    // Rule currently being accumulated
    current: Option<RuleEntry>,
    state: LineState,

    // Paragraph joining, only meaningful in InDescription
    in_paragraph: bool,

    // Parameter accumulator and the column offsets recorded from the
    // table header separator
    param: RuleParameter,
    columns: Option<(usize, usize, usize)>,
}

// -- Public API ---------------------------------------------------------------

/// Parse one file's content into a mapping from rule name to entry.
///
/// Never fails: every line is classified into some state-appropriate
/// handling or ignored.
pub fn parse(input: &str) -> BTreeMap<String, RuleEntry> {
    let mut state = ParserState::default();

    for line in input.lines() {
        process_line(&mut state, line);
    }

    finalize_rule(&mut state);
    state.rules
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, raw: &str) {
    let line = raw.trim();

    // 1. Rule start. A top-level bullet outside an example ends any open
    //    rule, whatever state it was left in.
    if s.state != LineState::InExample && is_rule_start(line) {
        finalize_rule(s);
        if let Some(name) = extract_rule_name(line) {
            // Reuse the partial entry if this rule's title reappears later
            // in the same file.
            let entry = s
                .rules
                .remove(&name)
                .unwrap_or_else(|| RuleEntry::new(&name));
            s.current = Some(entry);
            s.state = LineState::InDescription;
        }
        return;
    }

    if s.current.is_none() {
        return;
    }

    // 2/3. Example block: delimiter toggles, everything else is verbatim
    //      body with entity escaping only.
    if s.state == LineState::InExample {
        if is_example_delimiter(line) {
            push_description(s, "</pre>\n");
            s.state = LineState::InDescription;
        } else {
            let escaped = escape_entities(raw);
            push_description(s, &escaped);
            push_description(s, "\n");
        }
        return;
    }
    if is_example_delimiter(line) {
        if s.state == LineState::InParameterTable {
            finalize_parameter(s);
            s.columns = None;
        }
        close_paragraph(s);
        push_description(s, "<pre>\n");
        s.state = LineState::InExample;
        return;
    }

    // 5-7. Parameter table body.
    if s.state == LineState::InParameterTable {
        if RE_DATA_ROW.is_match(line) {
            process_table_row(s, raw);
        } else if RE_ROW_SEP.is_match(line) {
            finalize_parameter(s);
        } else {
            // Table exit consumes the line.
            finalize_parameter(s);
            s.columns = None;
            s.state = LineState::InDescription;
        }
        return;
    }

    // 4. Parameter table start. The header separator fixes the column
    //    offsets for every data row of this table.
    if RE_TABLE_START.is_match(line) {
        if let Some(columns) = column_offsets(raw) {
            s.columns = Some(columns);
            s.param = RuleParameter::default();
            s.state = LineState::InParameterTable;
            return;
        }
    }

    // 8. Description prose.
    if line.is_empty() {
        close_paragraph(s);
        return;
    }
    if is_noise(line) {
        return;
    }
    append_prose(s, line);
}

fn is_rule_start(line: &str) -> bool {
    line.starts_with("* ")
}

fn is_example_delimiter(line: &str) -> bool {
    RE_HR_DASH.is_match(line) || RE_HR_PLUS.is_match(line)
}

fn is_noise(line: &str) -> bool {
    NOISE_PREFIXES.iter().any(|p| line.starts_with(p)) || RE_ROW_SEP.is_match(line)
}

// -- Rule lifecycle -----------------------------------------------------------

/// Store the open rule, if any, into the file mapping. Pending table
/// parameters and open paragraphs are settled first.
fn finalize_rule(s: &mut ParserState) {
    if s.state == LineState::InParameterTable {
        finalize_parameter(s);
    }
    close_paragraph(s);
    if let Some(rule) = s.current.take() {
        s.rules.insert(rule.name.clone(), rule);
    }
    s.state = LineState::Outside;
    s.param = RuleParameter::default();
    s.columns = None;
}

/// Push the accumulating parameter into the open rule (if non-empty) and
/// start a fresh accumulator.
fn finalize_parameter(s: &mut ParserState) {
    let param = std::mem::take(&mut s.param);
    if let Some(rule) = s.current.as_mut() {
        rule.push_parameter(param);
    }
}

fn push_description(s: &mut ParserState, text: &str) {
    if let Some(rule) = s.current.as_mut() {
        rule.description.push_str(text);
    }
}

fn close_paragraph(s: &mut ParserState) {
    if s.in_paragraph {
        push_description(s, "</p>\n");
        s.in_paragraph = false;
    }
}

fn append_prose(s: &mut ParserState, line: &str) {
    let cleaned = clean_description_text(line);
    if s.in_paragraph {
        push_description(s, " ");
    } else {
        push_description(s, "<p>");
        s.in_paragraph = true;
    }
    push_description(s, &cleaned);
}

// -- Parameter tables ---------------------------------------------------------

/// Offsets of the first `*` and the two following `+` in a table header
/// separator, on the raw (untrimmed) line so data rows slice consistently.
fn column_offsets(raw: &str) -> Option<(usize, usize, usize)> {
    let c0 = raw.find('*')?;
    let c1 = raw[c0..].find('+').map(|i| c0 + i)?;
    let c2 = raw[c1 + 1..].find('+').map(|i| c1 + 1 + i)?;
    Some((c0, c1, c2))
}

/// Slice a column out of a data row, clamped to the row's actual width.
/// Rows narrower than the header separator yield empty fragments.
fn slice_field(raw: &str, from: usize, to: usize) -> &str {
    let to = to.min(raw.len());
    if from >= to {
        return "";
    }
    raw.get(from..to).unwrap_or("")
}

fn process_table_row(s: &mut ParserState, raw: &str) {
    let Some((c0, c1, c2)) = s.columns else {
        return;
    };

    let key_frag = slice_field(raw, c0 + 1, c1).trim();
    if key_frag.eq_ignore_ascii_case(KEY_COLUMN_CAPTION) {
        // Repeated header row
        return;
    }

    if !key_frag.is_empty() {
        // A wrapped key continues across physical rows; dash runs are
        // hyphenation artifacts.
        s.param.key.push_str(&key_frag.replace('-', ""));
    }

    let desc_frag = slice_field(raw, c1 + 1, c2).trim();
    if !desc_frag.is_empty() {
        let cleaned = clean_table_text(desc_frag);
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            if !s.param.description.is_empty() {
                s.param.description.push(' ');
            }
            s.param.description.push_str(cleaned);
        }
    }

    let tail = slice_field(raw, c2 + 1, raw.len()).trim();
    let default_frag = tail.strip_suffix('|').unwrap_or(tail).trim();
    if !default_frag.is_empty() && s.param.default_value.is_empty() {
        s.param.default_value = clean_default_value(default_frag);
    }
}

// -- Rule names ---------------------------------------------------------------

/// Extract a rule name from a top-level bullet line.
///
/// `* {SomeName} Rule` takes the braced token; otherwise everything after
/// the bullet marker. A trailing `Rule` suffix is dropped. Returns `None`
/// for titles that cannot be rule names: blank, entirely lower-case,
/// non-alphanumeric, or the `References` documentation heading.
fn extract_rule_name(line: &str) -> Option<String> {
    let trimmed = line.trim();
    let mut name = if let Some(rest) = trimmed.strip_prefix("* {") {
        let end = rest.find("} Rule")?;
        rest[..end].trim().to_string()
    } else {
        trimmed.get(2..).unwrap_or("").trim().to_string()
    };

    if let Some(stripped) = name.strip_suffix("Rule") {
        name = stripped.trim().to_string();
    }

    if name.is_empty()
        || name == "References"
        || name.chars().any(|c| !c.is_ascii_alphanumeric())
        || name.to_lowercase() == name
    {
        return None;
    }
    Some(name)
}

// -- Text cleanup -------------------------------------------------------------

/// Entity-escape example body text. No markup translation.
fn escape_entities(line: &str) -> String {
    line.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Full cleanup for description prose.
///
/// Ampersands first, then operator tokens to entities (longest first), then
/// the remaining angle brackets — which at that point can only be markup —
/// go through a placeholder round-trip: `<<<`/`>>>` become `<code>`,
/// `<<`/`>>` become `<b>`, single brackets become `<i>`. Replacing on raw
/// brackets directly would corrupt the tags inserted along the way.
fn clean_description_text(text: &str) -> String {
    let mut out = text.replace('&', "&amp;");
    for (token, entity) in OPERATOR_ENTITIES {
        out = out.replace(token, entity);
    }
    out = RE_BARE_LT.replace_all(&out, "${a}&lt;${b}").into_owned();
    out = RE_BARE_GT.replace_all(&out, "${a}&gt;${b}").into_owned();

    let open = OPEN_MARK.to_string();
    let close = CLOSE_MARK.to_string();
    out = out.replace('<', &open).replace('>', &close);
    out.replace(&open.repeat(3), "<code>")
        .replace(&close.repeat(3), "</code>")
        .replace(&open.repeat(2), "<b>")
        .replace(&close.repeat(2), "</b>")
        .replace(&open, "<i>")
        .replace(&close, "</i>")
}

/// Table-flavor cleanup for parameter fields: emphasis markup is dropped,
/// never translated — these contexts render as plain text.
fn clean_table_text(text: &str) -> String {
    text.replace("<<<", "")
        .replace(">>>", "")
        .replace("<<", "")
        .replace(">>", "")
        .replace('<', "")
        .replace('>', "")
}

/// Default-value cleanup: drop bold/code markup runs, then unwrap exactly
/// one outer layer of `'…'`, `<…>`, `"…"`, or `/…/`.
fn clean_default_value(text: &str) -> String {
    let stripped = text
        .replace("<<<", "")
        .replace(">>>", "")
        .replace("<<", "")
        .replace(">>", "");
    let stripped = stripped.trim();

    let mut chars = stripped.chars();
    if let (Some(first), Some(last)) = (chars.next(), chars.next_back()) {
        let symmetric = matches!(
            (first, last),
            ('\'', '\'') | ('<', '>') | ('"', '"') | ('/', '/')
        );
        if symmetric {
            return stripped[1..stripped.len() - 1].to_string();
        }
    }
    stripped.to_string()
}

// -- Tests --------------------------------------------------------------------
