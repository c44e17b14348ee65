use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use bold_todo::classifier::{
    register_defaults, Classifier, ClassificationTypeRegistry, SnapshotSpan, TodoClassifier,
};
use bold_todo::render;

/// Execute the `show` command: print a file with its markers in bold,
/// classifying it one line at a time like an editor view would.
pub fn run(file: &Path) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut registry = ClassificationTypeRegistry::new();
    let format = register_defaults(&mut registry).context("Failed to register classification")?;
    let classifier = TodoClassifier::new(&registry).context("Failed to create classifier")?;

    let mut offset = 0;
    let mut marker_count = 0;
    for line in content.split_inclusive('\n') {
        let span = SnapshotSpan::new(&content, offset, line.len())?;
        let ranges: Vec<_> = classifier
            .classification_spans(&span)
            .into_iter()
            .map(|s| s.range)
            .collect();
        marker_count += ranges.len();

        println!("{}", render::render_line(line, offset, &ranges, &format));
        offset += line.len();
    }

    debug!("{}: {} markers", file.display(), marker_count);

    Ok(())
}
