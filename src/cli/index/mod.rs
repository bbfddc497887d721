//! Index command - chunk, embed and store one document

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::{Document, DocumentType, DomainError};

/// Arguments for the index command
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Text to index
    pub text: Option<String>,

    /// Path to a file to index
    #[arg(long)]
    pub filepath: Option<PathBuf>,

    /// Type of the document, used to pick how it is chunked
    #[arg(long, default_value = "text", value_parser = parse_document_type)]
    pub filetype: DocumentType,
}

fn parse_document_type(value: &str) -> Result<DocumentType, String> {
    value.parse().map_err(|e| match e {
        DomainError::Validation { message } => message,
        other => other.to_string(),
    })
}

impl IndexArgs {
    /// Build the document to index; literal text wins over a file path
    pub fn document(&self) -> anyhow::Result<Document> {
        if let Some(ref text) = self.text {
            return Ok(Document::from_text(text.clone()));
        }

        match self.filepath {
            Some(ref path) => Ok(Document::from_path(path, self.filetype)?),
            None => bail!("Either text or --filepath must be provided."),
        }
    }
}

/// Run the index command
pub async fn run(args: IndexArgs, config: &AppConfig) -> anyhow::Result<()> {
    let document = args.document()?;

    let pipeline = crate::create_index_document(config)?;
    info!(filetype = %args.filetype, "Indexing document");

    let report = pipeline.execute(document).await?;

    println!(
        "Indexed document: {} - {}",
        report.document_id, report.document_name
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<IndexArgs, clap::Error> {
        let mut argv = vec!["memorag", "index"];
        argv.extend_from_slice(args);

        Cli::try_parse_from(argv).map(|cli| match cli.command {
            Command::Index(args) => args,
            Command::Search(_) => unreachable!(),
        })
    }

    #[test]
    fn test_filetype_defaults_to_text() {
        let args = parse(&["hello"]).unwrap();

        assert_eq!(args.filetype, DocumentType::Text);
        assert_eq!(args.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_invalid_filetype_lists_choices() {
        let error = parse(&["--filepath", "a.doc", "--filetype", "docx"]).unwrap_err();

        assert!(error
            .to_string()
            .contains("Invalid filetype 'docx'. Choose one of: pdf, text, markdown, word, other"));
    }

    #[test]
    fn test_text_wins_over_filepath() {
        let args = parse(&["inline text", "--filepath", "/does/not/exist"]).unwrap();

        let document = args.document().unwrap();

        assert_eq!(document.name(), "text_document");
        assert_eq!(document.content(), b"inline text");
    }

    #[test]
    fn test_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"# Notes").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let args = parse(&["--filepath", &path, "--filetype", "markdown"]).unwrap();
        let document = args.document().unwrap();

        assert_eq!(document.document_type(), DocumentType::Markdown);
        assert_eq!(document.content(), b"# Notes");
    }

    #[test]
    fn test_neither_text_nor_file_is_an_error() {
        let args = parse(&[]).unwrap();

        let error = args.document().unwrap_err();

        assert_eq!(error.to_string(), "Either text or --filepath must be provided.");
    }
}
