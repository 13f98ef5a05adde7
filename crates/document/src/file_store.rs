use crate::error::Result;
use crate::store::DocumentStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Skeleton written by [`FileDocumentStore::init_document`]
pub const DEFAULT_DOCUMENT: &str = "# Document Title

## Lexicon

## Context, Aim & Integration

### Context

### Aim

### Integration

## Features

### Feature 1

#### Context, Aim & Integration

#### Constraints

#### User Stories

#### Technical Requirements

#### API

#### Data Layer

#### Validation

#### Dependencies

#### Other Notes

## Roadmap

### Milestone 1

#### Content

#### Validation

";

/// Reduce a document name to a file-name-safe stem: alphanumerics, `-` and `_` only.
#[must_use]
pub fn safe_document_name(raw: &str) -> String {
    let safe: String = raw
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_'))
        .collect();
    if safe.is_empty() {
        "default".to_string()
    } else {
        safe
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// The skeleton was written (fresh document, or `reset` requested)
    Initialized { reset: bool },
    /// The document already existed and was left alone
    Loaded,
}

/// Plain-text Markdown documents under a data directory, one `<name>.md` per document
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    data_dir: PathBuf,
}

impl FileDocumentStore {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;
        log::debug!("Document store at {}", data_dir.display());
        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.md", safe_document_name(name)))
    }

    /// Seed `name` with [`DEFAULT_DOCUMENT`] unless it exists; `reset` overwrites it.
    pub async fn init_document(&self, name: &str, reset: bool) -> Result<InitOutcome> {
        let path = self.document_path(name);
        if reset || !tokio::fs::try_exists(&path).await? {
            self.save_document(name, DEFAULT_DOCUMENT).await?;
            log::info!("Document '{name}' initialized (reset: {reset})");
            return Ok(InitOutcome::Initialized { reset });
        }
        log::info!("Document '{name}' loaded");
        Ok(InitOutcome::Loaded)
    }

    pub async fn save_document(&self, name: &str, content: &str) -> Result<()> {
        let path = self.document_path(name);
        let tmp = path.with_extension("md.tmp");
        tokio::fs::write(&tmp, content).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        log::debug!("Saved '{name}' ({} chars)", content.len());
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get_document(&self, doc_id: &str) -> Result<String> {
        let path = self.document_path(doc_id);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_names() {
        assert_eq!(safe_document_name("../etc/passwd"), "etcpasswd");
        assert_eq!(safe_document_name("my spec_v2-final"), "myspec_v2-final");
        assert_eq!(safe_document_name("///"), "default");
        assert_eq!(safe_document_name(""), "default");
    }
}
