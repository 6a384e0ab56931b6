use crate::error::{ExportError, Result};
use crate::page::Page;
use crate::writer::PdfWriter;
use chrono::{DateTime, Utc};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Document information written into the PDF info dictionary.
///
/// No date is recorded unless one is set explicitly, so two exports of the
/// same plan are byte-for-byte identical.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Software that created the original document
    pub creator: Option<String>,
    /// Software that produced the PDF
    pub producer: Option<String>,
    /// Date and time the document was created
    pub creation_date: Option<DateTime<Utc>>,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: None,
            author: None,
            subject: None,
            creator: Some("drillbook".to_string()),
            producer: Some(format!("drillbook v{}", env!("CARGO_PKG_VERSION"))),
            creation_date: None,
        }
    }
}

impl DocumentMetadata {
    pub fn for_plan(plan_name: impl Into<String>) -> Self {
        Self {
            title: Some(plan_name.into()),
            subject: Some("Training plan".to_string()),
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_creation_date(mut self, date: DateTime<Utc>) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Stamps the current time. Output is no longer reproducible afterwards.
    pub fn with_current_date(self) -> Self {
        self.with_creation_date(Utc::now())
    }
}

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub page_count: usize,
    pub bytes_written: u64,
}

/// The finished, paginated layout of a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pages: Vec<Page>,
    metadata: DocumentMetadata,
}

impl RenderedDocument {
    pub fn new(pages: Vec<Page>, metadata: DocumentMetadata) -> Self {
        Self { pages, metadata }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: DocumentMetadata) {
        self.metadata = metadata;
    }

    /// Serializes the document into any writer; returns the bytes written.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<u64> {
        let mut writer = PdfWriter::new_with_writer(writer);
        writer.write_document(self)?;
        Ok(writer.position())
    }

    /// Writes the document to a buffer.
    pub fn write(&self, buffer: &mut Vec<u8>) -> Result<()> {
        self.write_to(buffer)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write(&mut buffer)?;
        Ok(buffer)
    }

    /// Saves the document to `path`.
    ///
    /// The file is assembled in a temporary file next to the destination and
    /// renamed into place only once it is complete. On any failure the
    /// temporary file is removed and an existing file at `path` is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`ExportError::Persist`] when the temporary file cannot be created,
    /// synced or renamed; [`ExportError::Io`] or [`ExportError::Compression`]
    /// when serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<ExportSummary> {
        let path = path.as_ref();
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp =
            NamedTempFile::new_in(directory).map_err(|source| persist_error(path, source))?;
        debug!(temp = %temp.path().display(), "writing export to temporary file");

        let bytes_written = self.write_to(BufWriter::new(temp.as_file_mut()))?;
        temp.as_file()
            .sync_all()
            .map_err(|source| persist_error(path, source))?;
        temp.persist(path)
            .map_err(|err| persist_error(path, err.error))?;

        info!(
            path = %path.display(),
            pages = self.page_count(),
            bytes = bytes_written,
            "export finished"
        );

        Ok(ExportSummary {
            path: path.to_path_buf(),
            page_count: self.page_count(),
            bytes_written,
        })
    }
}

fn persist_error(path: &Path, source: io::Error) -> ExportError {
    ExportError::Persist {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::OpenPage;
    use std::fs;
    use tempfile::TempDir;

    fn document(pages: usize) -> RenderedDocument {
        let pages = (1..=pages)
            .map(|number| OpenPage::new(number, 595.0, 842.0).close(None))
            .collect();
        RenderedDocument::new(pages, DocumentMetadata::for_plan("Week 1"))
    }

    #[test]
    fn test_metadata_defaults_have_no_date() {
        let metadata = DocumentMetadata::default();
        assert_eq!(metadata.creation_date, None);
        assert_eq!(metadata.creator.as_deref(), Some("drillbook"));
        assert!(metadata.producer.unwrap().starts_with("drillbook v"));
    }

    #[test]
    fn test_metadata_builders() {
        let metadata = DocumentMetadata::for_plan("Week 1")
            .with_author("Coach")
            .with_current_date();
        assert_eq!(metadata.title.as_deref(), Some("Week 1"));
        assert_eq!(metadata.author.as_deref(), Some("Coach"));
        assert!(metadata.creation_date.is_some());
    }

    #[test]
    fn test_to_bytes_matches_write() {
        let document = document(2);
        let mut buffer = Vec::new();
        document.write(&mut buffer).unwrap();
        assert_eq!(document.to_bytes().unwrap(), buffer);
        assert!(buffer.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.pdf");

        let summary = document(1).save(&path).unwrap();
        assert_eq!(summary.path, path);
        assert_eq!(summary.page_count, 1);
        assert_eq!(fs::metadata(&path).unwrap().len(), summary.bytes_written);

        // Only the destination is left behind.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_save_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plan.pdf");
        fs::write(&path, b"old").unwrap();

        document(3).save(&path).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("plan.pdf");

        let err = document(1).save(&path).unwrap_err();
        assert!(err.is_io_error());
        assert!(matches!(err, ExportError::Persist { path: ref p, .. } if *p == path));
        assert!(!path.exists());
    }
}
