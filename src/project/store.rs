use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::document::GraphDocument;

pub trait ProjectStore: Send + Sync {
    fn fetch_document(&self, project_id: &str) -> Result<GraphDocument>;
}

pub struct FsProjectStore {
    root: PathBuf,
}

impl FsProjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidate_paths(&self, project_id: &str) -> [PathBuf; 2] {
        [
            self.root.join(format!("{project_id}.json")),
            self.root.join(project_id).join("graph.json"),
        ]
    }
}

fn read_document(path: &Path) -> Result<GraphDocument> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph document {}", path.display()))?;
    GraphDocument::from_json_str(&raw)
        .with_context(|| format!("rejected graph document {}", path.display()))
}

impl ProjectStore for FsProjectStore {
    fn fetch_document(&self, project_id: &str) -> Result<GraphDocument> {
        if project_id.is_empty() || project_id.contains(['/', '\\']) || project_id == ".." {
            return Err(anyhow!("invalid project id `{project_id}`"));
        }

        let candidates = self.candidate_paths(project_id);
        let path = candidates
            .iter()
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow!(
                    "project `{project_id}` not found under {}",
                    self.root.display()
                )
            })?;

        read_document(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::DocumentError;

    #[test]
    fn reads_flat_project_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("calculus.json"),
            r#"{"nodes": [{"id": "Limit"}, {"id": "Derivative", "inbound_links": ["Limit"]}]}"#,
        )
        .unwrap();

        let store = FsProjectStore::new(dir.path());
        let document = store.fetch_document("calculus").unwrap();
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[1].inbound_links, vec!["Limit".to_owned()]);
    }

    #[test]
    fn falls_back_to_project_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("algebra")).unwrap();
        fs::write(
            dir.path().join("algebra").join("graph.json"),
            r#"{"nodes": [{"id": "Group"}]}"#,
        )
        .unwrap();

        let store = FsProjectStore::new(dir.path());
        assert_eq!(store.fetch_document("algebra").unwrap().nodes[0].id, "Group");
    }

    #[test]
    fn unknown_project_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProjectStore::new(dir.path());
        assert!(store.fetch_document("missing").is_err());
    }

    #[test]
    fn path_like_ids_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsProjectStore::new(dir.path());
        assert!(store.fetch_document("../etc").is_err());
        assert!(store.fetch_document("").is_err());
    }

    #[test]
    fn malformed_document_keeps_its_cause() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), r#"{"nodes": "none"}"#).unwrap();

        let store = FsProjectStore::new(dir.path());
        let error = store.fetch_document("broken").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DocumentError>(),
            Some(DocumentError::NodesNotAList { found: "a string" })
        ));
    }
}
