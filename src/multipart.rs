//! Multipart form body assembly

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::Result;

/// A file part for a multipart upload, held as an in-memory buffer.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl FilePart {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content,
        }
    }

    /// Read a file part from disk. The file handle is scoped to this call
    /// and released before it returns, on success and on error alike.
    pub async fn from_path(field_name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            field_name: field_name.into(),
            file_name,
            content,
        })
    }
}

/// Assemble a multipart form: the file part first when present, then the
/// fields in the order the caller supplied them.
pub(crate) fn build_form(file: Option<FilePart>, fields: &[(&str, &str)]) -> Form {
    let mut form = Form::new();
    if let Some(file) = file {
        let part = Part::bytes(file.content).file_name(file.file_name);
        form = form.part(file.field_name, part);
    }
    for (key, value) in fields {
        form = form.text(key.to_string(), value.to_string());
    }
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_part_keeps_buffer_and_names() {
        let part = FilePart::new("upload", "notes.txt", b"hello".to_vec());
        assert_eq!(part.field_name, "upload");
        assert_eq!(part.file_name, "notes.txt");
        assert_eq!(part.content, b"hello");
    }

    #[tokio::test]
    async fn from_path_missing_file_fails() {
        let result = FilePart::from_path("upload", "/no/such/file.txt").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn from_path_uses_final_component_as_file_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.csv");
        tokio::fs::write(&path, b"a,b\n1,2\n").await.expect("write");

        let part = FilePart::from_path("data", &path).await.expect("file part");
        assert_eq!(part.file_name, "report.csv");
        assert_eq!(part.content, b"a,b\n1,2\n");
    }
}
