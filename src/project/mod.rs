mod document;
mod notes;
mod store;

pub use document::{GraphDocument, NodePayload};
#[cfg(test)]
pub use document::{DocumentError, DocumentNode};
pub use notes::{FsNoteSource, NoteSegment, NoteSource, split_references};
pub use store::{FsProjectStore, ProjectStore};
