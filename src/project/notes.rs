use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub trait NoteSource: Send + Sync {
    fn fetch_note(&self, node_id: &str) -> Result<String>;
}

pub struct FsNoteSource {
    dir: PathBuf,
}

impl FsNoteSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn note_path(&self, node_id: &str) -> PathBuf {
        let file_stem = node_id.replace(['/', '\\'], "_");
        self.dir.join(format!("{file_stem}.md"))
    }
}

impl NoteSource for FsNoteSource {
    fn fetch_note(&self, node_id: &str) -> Result<String> {
        let path = self.note_path(node_id);
        fs::read_to_string(&path)
            .with_context(|| format!("no note for `{node_id}` at {}", path.display()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteSegment<'a> {
    Text(&'a str),
    Reference(&'a str),
}

/// Splits note text into plain runs and `[[Concept]]` cross-references.
/// An unterminated `[[` is kept as text.
pub fn split_references(text: &str) -> Vec<NoteSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find("[[") {
        let after_open = &rest[open + 2..];
        let Some(close) = after_open.find("]]") else {
            break;
        };

        let target = &after_open[..close];
        if target.is_empty() || target.contains('[') {
            segments.push(NoteSegment::Text(&rest[..open + 2]));
            rest = after_open;
            continue;
        }

        if open > 0 {
            segments.push(NoteSegment::Text(&rest[..open]));
        }
        segments.push(NoteSegment::Reference(target));
        rest = &after_open[close + 2..];
    }

    if !rest.is_empty() {
        segments.push(NoteSegment::Text(rest));
    }
    segments
}
