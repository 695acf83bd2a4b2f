//! Discovers and reads plain-text documents from a directory tree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::Document;

/// All `.txt` files under `root`, sorted by path.
pub fn list_txt_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::NotFound(format!("documents directory '{}'", root.display())));
    }
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    Ok(txt_files)
}

/// Reads one file as a [`Document`] named by its path relative to `root`.
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_document(root: &Path, path: &Path) -> Result<Document> {
    let bytes = fs::read(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), "document is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };
    let relative = path.strip_prefix(root).unwrap_or(path);
    let name = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
    Ok(Document::new(name, content))
}

/// Loads every `.txt` document under `root`.
///
/// Fails with [`Error::NotFound`] when `root` is not a directory and with
/// [`Error::EmptyCorpus`] when it holds no `.txt` files.
pub fn load_documents(root: &Path) -> Result<Vec<Document>> {
    let files = list_txt_files(root)?;
    if files.is_empty() {
        return Err(Error::EmptyCorpus(root.display().to_string()));
    }
    let documents = files.iter().map(|path| read_document(root, path)).collect::<Result<Vec<_>>>()?;
    info!(count = documents.len(), dir = %root.display(), "loaded documents");
    Ok(documents)
}
