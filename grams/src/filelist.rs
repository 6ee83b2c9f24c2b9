use std::fs;
use std::path::Path;

use anyhow::Context;

/// One row of the dataset file list: an audio file and its language label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub language: String,
}

pub fn read_file_list(path: &Path) -> anyhow::Result<Vec<FileEntry>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Reading file list {}", path.display()))?;
    parse_file_list(&text)
}

/// Parses `path,language` rows. Surplus columns are ignored, blank lines skipped.
pub fn parse_file_list(text: &str) -> anyhow::Result<Vec<FileEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| parse_line(line).with_context(|| format!("Line {}", number + 1)))
        .collect()
}

fn parse_line(line: &str) -> anyhow::Result<FileEntry> {
    let mut fields = line.split(',');

    let path = fields.next().map(str::trim).unwrap_or_default();
    let language = fields.next().map(str::trim).unwrap_or_default();

    anyhow::ensure!(!path.is_empty(), "Missing audio path: {line:?}");
    anyhow::ensure!(!language.is_empty(), "Missing language label: {line:?}");

    Ok(FileEntry {
        path: path.to_owned(),
        language: language.to_owned(),
    })
}
