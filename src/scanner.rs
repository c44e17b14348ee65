use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

use crate::parser::{self, CommentMarkerScanner, LineMatch, MatchRange};

/// Maximum file size to scan (1 MB). Files larger than this are skipped.
const MAX_FILE_SIZE: u64 = 1_048_576;

/// Directories to always skip during scanning.
const SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "target",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
];

/// A line holding at least one marker. Match ranges stay in file coordinates.
#[derive(Debug, Clone)]
pub struct MarkedLine {
    pub line_number: usize,
    /// Byte offset of the line in its file.
    pub start: usize,
    pub text: String,
    pub matches: Vec<MatchRange>,
}

impl MarkedLine {
    /// The marker text as it appears in the line.
    pub fn marker_text(&self, range: &MatchRange) -> &str {
        &self.text[range.offset - self.start..range.end() - self.start]
    }
}

/// The marked lines of one file; the rest of the file is not kept.
#[derive(Debug, Clone)]
pub struct FileMarkers {
    pub file_path: PathBuf,
    pub lines: Vec<MarkedLine>,
}

impl FileMarkers {
    pub fn marker_count(&self) -> usize {
        self.lines.iter().map(|l| l.matches.len()).sum()
    }
}

/// Result of scanning a directory tree.
#[derive(Debug)]
pub struct ScanResult {
    pub files: Vec<FileMarkers>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl ScanResult {
    pub fn marker_count(&self) -> usize {
        self.files.iter().map(FileMarkers::marker_count).sum()
    }
}

fn should_skip_dir(dir_name: &str) -> bool {
    SKIP_DIRS.contains(&dir_name)
}

/// Scan a directory tree (or a single file) for comment markers.
/// Skips files > MAX_FILE_SIZE, non-UTF-8 files, and known non-source directories.
pub fn scan_directory(root: &Path, scanner: &CommentMarkerScanner) -> ScanResult {
    let mut files = Vec::new();
    let mut files_scanned: usize = 0;
    let mut files_skipped: usize = 0;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    for entry in walker.filter_entry(|e| {
        if e.depth() > 0 && e.file_type().is_dir() {
            if let Some(name) = e.file_name().to_str() {
                return !should_skip_dir(name);
            }
        }
        true
    }) {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!("skipping unreadable entry: {}", err);
                files_skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();

        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                files_skipped += 1;
                continue;
            }
        };

        if metadata.len() > MAX_FILE_SIZE {
            debug!("skipping {}: {} bytes", path.display(), metadata.len());
            files_skipped += 1;
            continue;
        }

        // Non-UTF-8 files are skipped
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                debug!("skipping {}: {}", path.display(), err);
                files_skipped += 1;
                continue;
            }
        };

        files_scanned += 1;

        let matches = parser::scan_content(scanner, &content);
        if matches.is_empty() {
            continue;
        }
        let lines = marked_lines(&content, &matches);

        let relative = match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
            _ => path.file_name().map(PathBuf::from).unwrap_or_else(|| path.to_path_buf()),
        };
        files.push(FileMarkers {
            file_path: relative,
            lines,
        });
    }

    ScanResult {
        files,
        files_scanned,
        files_skipped,
    }
}

/// Copy out the lines that `matches` (in line order) fall on.
fn marked_lines(content: &str, matches: &[LineMatch]) -> Vec<MarkedLine> {
    let mut lines: Vec<MarkedLine> = Vec::new();
    let mut pending = matches.iter().peekable();
    let mut offset = 0;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_number = idx + 1;
        let mut ranges = Vec::new();
        while let Some(m) = pending.next_if(|m| m.line_number == line_number) {
            ranges.push(m.range);
        }
        if !ranges.is_empty() {
            lines.push(MarkedLine {
                line_number,
                start: offset,
                text: line.trim_end_matches(['\n', '\r']).to_string(),
                matches: ranges,
            });
        }
        if pending.peek().is_none() {
            break;
        }
        offset += line.len();
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory_finds_markers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(
            dir.path().join("src/lib.rs"),
            "// TODO: first\nfn f() {}\n/* hack */\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "nothing to see\n").unwrap();

        let result = scan_directory(dir.path(), &CommentMarkerScanner::default());
        assert_eq!(result.files_scanned, 2);
        assert_eq!(result.files_skipped, 0);
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.marker_count(), 2);

        let file = &result.files[0];
        assert_eq!(file.file_path, PathBuf::from("src/lib.rs"));
        let texts: Vec<&str> = file
            .lines
            .iter()
            .flat_map(|l| l.matches.iter().map(move |m| l.marker_text(m)))
            .collect();
        assert_eq!(texts, vec!["TODO", "hack"]);
        assert_eq!(file.lines[1].line_number, 3);
        assert_eq!(file.lines[1].start, 25);
        assert_eq!(file.lines[1].text, "/* hack */");
    }

    #[test]
    fn test_only_marked_lines_are_kept() {
        let content = "fn a() {}\r\n// todo: x (hack)\r\nfn b() {}\r\n// plain\r\n/* HACK */";
        let matches = parser::scan_content(&CommentMarkerScanner::default(), content);
        let lines = marked_lines(content, &matches);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_number, 2);
        assert_eq!(lines[0].start, 11);
        assert_eq!(lines[0].text, "// todo: x (hack)");
        assert_eq!(lines[0].matches.len(), 2);
        assert_eq!(lines[0].marker_text(&lines[0].matches[1]), "hack");
        assert_eq!(lines[1].line_number, 5);
        assert_eq!(lines[1].marker_text(&lines[1].matches[0]), "HACK");
    }

    #[test]
    fn test_skip_dirs_are_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/gen.rs"), "// todo: generated\n").unwrap();

        let result = scan_directory(dir.path(), &CommentMarkerScanner::default());
        assert_eq!(result.files_scanned, 0);
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_non_utf8_and_large_files_are_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blob.bin"), [0xff, 0xfe, 0x00]).unwrap();
        let big = "// todo: big\n".repeat((MAX_FILE_SIZE as usize / 13) + 1);
        fs::write(dir.path().join("big.rs"), big).unwrap();

        let result = scan_directory(dir.path(), &CommentMarkerScanner::default());
        assert_eq!(result.files_scanned, 0);
        assert_eq!(result.files_skipped, 2);
    }

    #[test]
    fn test_single_file_root() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("main.c");
        fs::write(&file, "int x; // HACK: temporary\n").unwrap();

        let result = scan_directory(&file, &CommentMarkerScanner::default());
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.files[0].file_path, PathBuf::from("main.c"));
    }
}
