//! Directory listing entries.

use serde::{Deserialize, Serialize};

/// Kind of a directory listing entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    #[serde(rename = "dir")]
    Directory,
    /// Symlinks, submodules and anything else the API reports.
    #[serde(other)]
    Other,
}

/// One entry of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Create a new entry.
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: EntryKind) -> Self {
        DirectoryEntry {
            name: name.into(),
            path: path.into(),
            kind,
        }
    }

    /// Check if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_listing_entries() {
        let json = r#"[
            {"type": "file", "name": "README.md", "path": "plugins/README.md", "sha": "abc"},
            {"type": "dir", "name": "tekton", "path": "plugins/tekton"},
            {"type": "symlink", "name": "link", "path": "plugins/link"}
        ]"#;

        let entries: Vec<DirectoryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::File);
        assert!(entries[1].is_dir());
        assert_eq!(entries[1].path, "plugins/tekton");
        assert_eq!(entries[2].kind, EntryKind::Other);
    }
}
