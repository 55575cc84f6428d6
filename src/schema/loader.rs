//! Schema Document Loading
//!
//! Loads LinkML YAML documents from a filesystem directory, an explicit file
//! list, or an embedded directory, and computes a content hash over the raw
//! texts. Fetching from the network is a collaborator's concern; this module
//! covers the local-fallback path and test fixtures.
//!
//! A file that cannot be read or parsed is skipped with a warning rather
//! than failing the whole load — merged schemas tolerate partial input, and
//! an entirely empty load yields an empty schema downstream.

use include_dir::Dir;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{merge_documents, Schema, SchemaDocument};
use crate::error::{Result, SchemaGraphError};

/// Documents plus the content hash of their raw texts.
#[derive(Debug, Clone, Default)]
pub struct DocumentBundle {
    pub documents: Vec<SchemaDocument>,
    /// SHA-256 over raw document texts in load order
    pub bundle_hash: String,
}

impl DocumentBundle {
    /// Merge into a [`Schema`] carrying this bundle's hash and source label.
    pub fn into_schema(self, source: &str) -> Schema {
        let mut schema = merge_documents(&self.documents);
        schema.bundle_hash = self.bundle_hash;
        schema.source = Some(source.to_string());
        schema
    }
}

/// Load every `.yaml`/`.yml` document under a directory.
///
/// Entries are visited in sorted path order so the merge order (and thus
/// last-wins collisions) is deterministic across platforms.
pub fn load_from_directory(schema_dir: &Path) -> Result<DocumentBundle> {
    fs::metadata(schema_dir).map_err(|source| SchemaGraphError::Read {
        path: schema_dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = WalkDir::new(schema_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| is_yaml(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    paths.sort();

    Ok(load_from_files(&paths))
}

/// Load an explicit, ordered list of document files.
///
/// Order is significant: later files overwrite earlier ones on name
/// collisions during the merge. Missing or unparseable files are skipped.
pub fn load_from_files(paths: &[PathBuf]) -> DocumentBundle {
    let mut documents = Vec::with_capacity(paths.len());
    let mut hasher = Sha256::new();

    for path in paths {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable schema file");
                continue;
            }
        };
        hasher.update(content.as_bytes());

        match parse_document(&content) {
            Ok(document) => documents.push(document),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unparseable schema file");
            }
        }
    }

    tracing::debug!(loaded = documents.len(), requested = paths.len(), "loaded schema documents");

    DocumentBundle {
        documents,
        bundle_hash: format!("{:x}", hasher.finalize()),
    }
}

/// Load documents from an embedded directory (compiled via `include_dir!`).
///
/// This is how a binary ships its fallback schema set.
pub fn load_from_embedded(embedded_dir: &'static Dir<'static>) -> DocumentBundle {
    let mut files: Vec<(&Path, &str)> = Vec::new();
    collect_embedded_files(embedded_dir, &mut files);
    files.sort_by_key(|(path, _)| *path);

    let mut documents = Vec::with_capacity(files.len());
    let mut hasher = Sha256::new();

    for (path, content) in files {
        hasher.update(content.as_bytes());
        match parse_document(content) {
            Ok(document) => documents.push(document),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unparseable embedded schema");
            }
        }
    }

    DocumentBundle {
        documents,
        bundle_hash: format!("{:x}", hasher.finalize()),
    }
}

/// Parse one YAML document text.
pub fn parse_document(content: &str) -> std::result::Result<SchemaDocument, serde_yaml_ng::Error> {
    serde_yaml_ng::from_str(content)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Recursively collect YAML files from an embedded directory
fn collect_embedded_files<'a>(dir: &'a Dir<'static>, files: &mut Vec<(&'a Path, &'a str)>) {
    for file in dir.files() {
        if is_yaml(file.path()) {
            if let Some(content) = file.contents_utf8() {
                files.push((file.path(), content));
            }
        }
    }

    for subdir in dir.dirs() {
        collect_embedded_files(subdir, files);
    }
}
