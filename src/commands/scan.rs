use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;

use bold_todo::classifier::FormatDefinition;
use bold_todo::parser::CommentMarkerScanner;
use bold_todo::render;
use bold_todo::scanner::{self, FileMarkers};

/// Execute the `scan` command: find markers and print each one with its line.
pub fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Invalid scan path: {}", path.display()))?;

    println!(
        "{}",
        format!("Scanning {}...", root.display()).dimmed()
    );

    let marker_scanner = CommentMarkerScanner::default();
    let result = scanner::scan_directory(&root, &marker_scanner);
    let format = FormatDefinition::todo();

    for file in &result.files {
        print_file(file, &format);
    }

    let marker_count = result.marker_count();
    let file_count = result.files.len();
    debug!("{} markers in {} files", marker_count, file_count);

    let summary = format!(
        "Found {} markers across {} files",
        marker_count, file_count
    );
    let colored_summary = if marker_count == 0 {
        summary.green()
    } else if marker_count <= 10 {
        summary.yellow()
    } else {
        summary.red()
    };
    println!("\n{}", colored_summary);
    println!(
        "{}",
        format!(
            "({} files scanned, {} skipped)",
            result.files_scanned, result.files_skipped
        )
        .dimmed()
    );

    Ok(())
}

fn print_file(file: &FileMarkers, format: &FormatDefinition) {
    for line in &file.lines {
        let rendered = render::render_line(&line.text, line.start, &line.matches, format);

        for m in &line.matches {
            let column = line.text[..m.offset - line.start].chars().count() + 1;
            let location = format!(
                "{}:{}:{}",
                file.file_path.display(),
                line.line_number,
                column
            )
            .bold();

            let marker = line.marker_text(m).to_uppercase();
            let keyword = match marker.as_str() {
                "TODO" => marker.yellow(),
                "HACK" => marker.magenta(),
                _ => marker.normal(),
            };

            println!("  {} {}  {}", location, keyword, rendered.trim_start());
        }
    }
}
