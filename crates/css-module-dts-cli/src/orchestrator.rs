//! Main orchestration logic.

use crate::cli::{Args, Command};
use crate::output::{Formatter, Summary};
use crate::protocol::{parse_requests, Status, TransformRequest, TransformResponse};
use camino::{Utf8Path, Utf8PathBuf};
use css_module_dts::{DtsGenerator, GenerateError, PluginConfig};
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Host errors. These abort the whole run; per-file problems are reported in
/// responses instead.
#[derive(Debug, Error)]
pub enum HostError {
    /// The working directory could not be determined.
    #[error("failed to determine current directory: {0}")]
    CurrentDir(std::io::Error),

    /// The project root is not a UTF-8 directory.
    #[error("project root is not a directory: {0}")]
    InvalidRoot(Utf8PathBuf),

    /// The request file could not be read.
    #[error("failed to read requests from {path}: {source}")]
    ReadRequests {
        /// The request file, or `-` for stdin.
        path: Utf8PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// The output directory could not be created.
    #[error(transparent)]
    Prepare(#[from] GenerateError),

    /// Reading stdin or writing stdout failed while serving.
    #[error("protocol I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be encoded.
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// A worker task ended abnormally.
    #[error("worker task failed: {0}")]
    Join(String),
}

/// Runs the selected command.
pub async fn run(args: Args) -> Result<Summary, HostError> {
    let root = resolve_root(&args.root)?;

    let mut config = PluginConfig::load(&root);
    if let Some(dir) = &args.dts_output_dir {
        config.dts_output_dir = dir.clone();
    }

    let generator = DtsGenerator::new(root, config).source_maps(args.source_maps());
    generator.prepare()?;
    tracing::debug!(output_dir = %generator.output_dir(), "output directory ready");

    match &args.command {
        Command::Generate { requests } => run_generate(&args, &generator, requests),
        Command::Serve => run_serve(Arc::new(generator)).await,
    }
}

/// Makes the root absolute and checks that it is a directory.
fn resolve_root(root: &Utf8Path) -> Result<Utf8PathBuf, HostError> {
    let root = if root.is_relative() {
        let current_dir = std::env::current_dir().map_err(HostError::CurrentDir)?;
        let current_dir = Utf8PathBuf::try_from(current_dir).map_err(|e| {
            HostError::InvalidRoot(e.into_path_buf().to_string_lossy().into_owned().into())
        })?;
        current_dir.join(root)
    } else {
        root.to_owned()
    };

    if !root.is_dir() {
        return Err(HostError::InvalidRoot(root));
    }
    Ok(root)
}

/// Processes a batch of requests in parallel and prints the report.
fn run_generate(
    args: &Args,
    generator: &DtsGenerator,
    requests: &Utf8Path,
) -> Result<Summary, HostError> {
    let input = read_requests(requests)?;

    let responses: Vec<TransformResponse> = parse_requests(&input)
        .into_par_iter()
        .map(|request| match request {
            Ok(request) => process(generator, request),
            Err(response) => response,
        })
        .collect();

    let summary: Summary = responses.iter().cloned().collect();
    println!("{}", Formatter::new(args.output).format(&responses, &summary));
    Ok(summary)
}

fn read_requests(path: &Utf8Path) -> Result<String, HostError> {
    let read = if path.as_str() == "-" {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input).map(|_| input)
    } else {
        fs::read_to_string(path)
    };
    read.map_err(|source| HostError::ReadRequests {
        path: path.to_owned(),
        source,
    })
}

/// Answers requests from stdin until it closes.
///
/// Requests run concurrently on the blocking pool; responses are written in
/// completion order by a single writer task.
async fn run_serve(generator: Arc<DtsGenerator>) -> Result<Summary, HostError> {
    let (tx, mut rx) = mpsc::channel::<TransformResponse>(100);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        let mut summary = Summary::default();
        while let Some(response) = rx.recv().await {
            summary.record(&response);
            let mut line = serde_json::to_string(&response)?;
            line.push('\n');
            stdout.write_all(line.as_bytes()).await?;
            stdout.flush().await?;
        }
        Ok::<_, HostError>(summary)
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let tx = tx.clone();
        let request = match serde_json::from_str::<TransformRequest>(&line) {
            Ok(request) => request,
            Err(e) => {
                let _ = tx.send(TransformResponse::invalid(e)).await;
                continue;
            }
        };

        let generator = Arc::clone(&generator);
        tokio::spawn(async move {
            let id = request.id.clone();
            let response =
                tokio::task::spawn_blocking(move || process(&generator, request))
                    .await
                    .unwrap_or_else(|e| {
                        tracing::error!(%id, "worker panicked: {}", e);
                        TransformResponse {
                            id: Some(id),
                            status: Status::Failed,
                            path: None,
                            keys: None,
                            error: Some(e.to_string()),
                        }
                    });
            let _ = tx.send(response).await;
        });
    }
    drop(tx);

    let summary = writer.await.map_err(|e| HostError::Join(e.to_string()))??;
    tracing::info!(
        written = summary.written,
        unchanged = summary.unchanged,
        failed = summary.failed,
        "stdin closed"
    );
    Ok(summary)
}

/// Handles one request.
fn process(generator: &DtsGenerator, request: TransformRequest) -> TransformResponse {
    let TransformRequest { id, code } = request;
    let result = generator.transform(&id, &code);
    TransformResponse::from_result(id, result)
}
