use colored::Colorize;

use crate::classifier::FormatDefinition;
use crate::parser::MatchRange;

/// Render `line` (which starts at document byte `line_start`) with every
/// range that falls inside it drawn in `format`. Trailing line terminators
/// are dropped.
pub fn render_line(
    line: &str,
    line_start: usize,
    ranges: &[MatchRange],
    format: &FormatDefinition,
) -> String {
    let line = line.trim_end_matches(['\n', '\r']);
    let line_end = line_start + line.len();

    let mut ranges: Vec<MatchRange> = ranges
        .iter()
        .copied()
        .filter(|r| r.offset >= line_start && r.end() <= line_end)
        .collect();
    ranges.sort_by_key(|r| r.offset);

    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for range in ranges {
        let start = range.offset - line_start;
        let end = range.end() - line_start;
        if start < cursor {
            continue;
        }
        out.push_str(&line[cursor..start]);
        out.push_str(&styled(&line[start..end], format));
        cursor = end;
    }
    out.push_str(&line[cursor..]);
    out
}

fn styled(text: &str, format: &FormatDefinition) -> String {
    if format.bold {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
