//! Search command - retrieve, rerank and answer a query

use std::io::Write;

use anyhow::anyhow;
use clap::Args;
use futures::StreamExt;

use crate::config::AppConfig;
use crate::domain::{DomainError, PipelineError, Vector};

const RULE: &str = "--------------------------------------------------";

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Query text to search for similar documents
    pub query: String,

    /// Number of top similar documents to retrieve
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub top_k: u32,

    /// Output the retrieved content without LLM processing
    #[arg(long)]
    pub raw: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs, config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = crate::create_search_documents(config)?;

    let response = pipeline
        .execute(&args.query, args.top_k as usize, args.raw)
        .await
        .map_err(pipeline_failure)?;

    let (mut answer, sources) = response.into_parts();
    let mut stdout = std::io::stdout();

    writeln!(stdout, "{}", RULE)?;
    write!(stdout, "Answer: ")?;
    while let Some(fragment) = answer.next().await {
        let fragment = fragment.map_err(answer_failure)?;
        write!(stdout, "{}", fragment)?;
        stdout.flush()?;
    }
    writeln!(stdout, "\n{}", RULE)?;

    write_sources(&mut stdout, &sources)?;

    Ok(())
}

/// List sources in final order, numbered from 1
pub fn write_sources(out: &mut impl Write, sources: &[Vector]) -> std::io::Result<()> {
    writeln!(out, "\nSources (All might not be relevant):")?;

    for (i, source) in sources.iter().enumerate() {
        writeln!(
            out,
            "  [{}] - document name : {}, chunk id : {}, document id : {}",
            i + 1,
            source.document_name(),
            source.id(),
            source.document_id()
        )?;
    }

    Ok(())
}

fn pipeline_failure(error: PipelineError) -> anyhow::Error {
    match error {
        PipelineError::Capability {
            source: DomainError::Authentication { message, .. },
            ..
        } => anyhow!(message),
        other => other.into(),
    }
}

fn answer_failure(error: DomainError) -> anyhow::Error {
    match error {
        DomainError::Authentication { message, .. } => anyhow!(message),
        other => anyhow!("Answer generation failed: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use crate::domain::{Capability, DOCUMENT_ID_KEY, DOCUMENT_NAME_KEY};
    use chrono::Utc;
    use clap::Parser;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn parse(args: &[&str]) -> Result<SearchArgs, clap::Error> {
        let mut argv = vec!["memorag", "search"];
        argv.extend_from_slice(args);

        Cli::try_parse_from(argv).map(|cli| match cli.command {
            Command::Search(args) => args,
            Command::Index(_) => unreachable!(),
        })
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["what is rust"]).unwrap();

        assert_eq!(args.query, "what is rust");
        assert_eq!(args.top_k, 10);
        assert!(!args.raw);
    }

    #[test]
    fn test_top_k_must_be_positive() {
        assert!(parse(&["q", "--top-k", "0"]).is_err());
        assert_eq!(parse(&["q", "--top-k", "3", "--raw"]).unwrap().top_k, 3);
    }

    #[test]
    fn test_write_sources() {
        let id = Uuid::new_v4();
        let mut metadata = HashMap::new();
        metadata.insert(DOCUMENT_ID_KEY.to_string(), "doc-id".to_string());
        metadata.insert(DOCUMENT_NAME_KEY.to_string(), "notes.md".to_string());
        let sources = vec![
            Vector::new(id, vec![1.0], b"x".to_vec(), Utc::now()).with_metadata(metadata),
        ];

        let mut out = Vec::new();
        write_sources(&mut out, &sources).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains(&format!(
            "[1] - document name : notes.md, chunk id : {}, document id : doc-id",
            id
        )));
    }

    #[test]
    fn test_authentication_failure_message() {
        let error = PipelineError::capability(
            Capability::Generator,
            DomainError::authentication(
                "llm",
                "LLM authentication failed. Please check your API key.",
            ),
        );

        assert_eq!(
            pipeline_failure(error).to_string(),
            "LLM authentication failed. Please check your API key."
        );
    }
}
