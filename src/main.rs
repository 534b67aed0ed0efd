use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use docproc::{
    AwaitOptions, ChunkQuery, DocumentClient, JobHandle, ProcessingConfig, SubmissionConfig,
    UploadSource, config, logging,
};
use futures_util::{pin_mut, stream::StreamExt};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "docproc", about = "Upload documents and inspect processing jobs")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a file and wait for its chunks.
    Upload {
        path: PathBuf,
        /// Return the job handle without waiting.
        #[arg(long)]
        no_wait: bool,
        /// Print one progress event per line while waiting.
        #[arg(long, conflicts_with = "no_wait")]
        stream: bool,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        version_label: Option<String>,
        /// Link to an existing document; `--auto-link false` opts out explicitly.
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        auto_link: Option<bool>,
        #[arg(long)]
        auto_link_threshold: Option<f64>,
        #[arg(long)]
        chunk_size: Option<u32>,
        #[arg(long)]
        chunk_overlap: Option<u32>,
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Show the status of a variant.
    Status { id: String },
    /// Wait for a previously submitted variant.
    Wait {
        id: String,
        #[arg(long, default_value_t = 300_000)]
        max_wait_ms: u64,
        #[arg(long, default_value_t = 2_000)]
        poll_interval_ms: u64,
    },
    /// List chunks of a variant.
    Chunks {
        id: String,
        #[arg(long, default_value_t = 100)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u64,
        #[arg(long)]
        full_metadata: bool,
    },
    /// Ask the server to stop processing a variant.
    Cancel { id: String },
    /// Delete a variant, version, or document.
    Delete { kind: DeleteTarget, id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum DeleteTarget {
    Variant,
    Version,
    Document,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);
    if let Err(err) = run(cli.command).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    let config = config::init_config().context("failed to load configuration")?;
    let client = DocumentClient::from_config(config).context("failed to build client")?;

    match command {
        Command::Upload {
            path,
            no_wait,
            stream,
            parent,
            version_label,
            auto_link,
            auto_link_threshold,
            chunk_size,
            chunk_overlap,
            content_type,
        } => {
            let mut source = UploadSource::path(&path);
            if let Some(content_type) = content_type {
                source = source.with_content_type(content_type);
            }
            let submission = SubmissionConfig {
                processing: ProcessingConfig {
                    chunk_size,
                    chunk_overlap,
                    ..ProcessingConfig::default()
                },
                parent_document_id: parent,
                version_label,
                auto_link,
                auto_link_threshold,
            };
            let mut options = client.upload_options().with_submission(submission);
            if no_wait {
                options = options.no_wait();
            }

            if stream {
                let events = client.upload_stream(&source, &options);
                pin_mut!(events);
                while let Some(event) = events.next().await {
                    let event = event
                        .with_context(|| format!("processing {} failed", path.display()))?;
                    print_json(&event)?;
                }
                Ok(())
            } else {
                let result = client
                    .upload(&source, &options)
                    .await
                    .with_context(|| format!("processing {} failed", path.display()))?;
                print_json(&result)
            }
        }
        Command::Status { id } => print_json(&client.get_variant_status(&id).await?),
        Command::Wait {
            id,
            max_wait_ms,
            poll_interval_ms,
        } => {
            let options = AwaitOptions::new(
                Duration::from_millis(max_wait_ms),
                Duration::from_millis(poll_interval_ms),
            )
            .on_progress(|status| tracing::info!(state = %status.state, "Job status"));
            let status = client.wait_for_job(&JobHandle::new(id), options).await?;
            print_json(&status)
        }
        Command::Chunks {
            id,
            limit,
            offset,
            full_metadata,
        } => {
            let query = ChunkQuery {
                limit,
                offset,
                include_full_metadata: full_metadata,
            };
            print_json(&client.list_chunks(&id, query).await?)
        }
        Command::Cancel { id } => print_json(&client.cancel_variant(&id).await?),
        Command::Delete { kind, id } => {
            let result = match kind {
                DeleteTarget::Variant => client.delete_variant(&id).await?,
                DeleteTarget::Version => client.delete_version(&id).await?,
                DeleteTarget::Document => client.delete_document(&id).await?,
            };
            print_json(&result)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto_link(args: &[&str]) -> Option<bool> {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        match cli.command {
            Command::Upload { auto_link, .. } => auto_link,
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn bare_auto_link_flag_enables_linking() {
        assert_eq!(auto_link(&["docproc", "upload", "a.pdf", "--auto-link"]), Some(true));
    }

    #[test]
    fn auto_link_accepts_explicit_value() {
        assert_eq!(
            auto_link(&["docproc", "upload", "a.pdf", "--auto-link", "false"]),
            Some(false)
        );
        assert_eq!(auto_link(&["docproc", "upload", "a.pdf"]), None);
    }
}
