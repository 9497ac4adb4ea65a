use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::fs;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

use crate::config::{ServerConfig, SuggestConfig};
use crate::orchestrator::InputOrchestrator;
use crate::predictor::SuggestionEngine;
use crate::protocol::{
    DaemonRequest, DaemonResponse, ErrorCode, ErrorResponse, RequestBody, ResponseBody,
    SuggestionsResponse,
};

pub struct SuggestionServer {
    config: ServerConfig,
    debounce: Duration,
    engine: Arc<SuggestionEngine>,
}

impl SuggestionServer {
    pub fn new(config: ServerConfig, suggest: &SuggestConfig, engine: SuggestionEngine) -> Self {
        Self {
            config,
            debounce: Duration::from_millis(suggest.debounce_ms),
            engine: Arc::new(engine),
        }
    }

    pub async fn run(&self) -> Result<()> {
        self.prepare_socket_path().await?;
        if self.config.socket_path.exists() {
            fs::remove_file(&self.config.socket_path)
                .await
                .with_context(|| {
                    format!(
                        "failed to cleanup stale socket {}",
                        self.config.socket_path.display()
                    )
                })?;
        }

        let listener = UnixListener::bind(&self.config.socket_path).with_context(|| {
            format!(
                "failed to bind unix socket at {}",
                self.config.socket_path.display()
            )
        })?;
        info!(
            "nextword daemon listening on {}",
            self.config.socket_path.display()
        );

        loop {
            let (stream, _) = listener.accept().await?;
            let engine = self.engine.clone();
            let debounce = self.debounce;
            let timeout_ms = self.config.request_timeout_ms;
            tokio::spawn(async move {
                if let Err(error) = handle_connection(stream, engine, debounce, timeout_ms).await {
                    warn!("connection closed with error: {error:#}");
                }
            });
        }
    }

    async fn prepare_socket_path(&self) -> Result<()> {
        if let Some(parent) = Path::new(&self.config.socket_path).parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create socket directory {}", parent.display())
            })?;
        }
        Ok(())
    }
}

/// One connection is one typing session. Replies and pushed updates share
/// the same line-oriented writer.
async fn handle_connection(
    stream: UnixStream,
    engine: Arc<SuggestionEngine>,
    debounce: Duration,
    timeout_ms: u64,
) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let mut orchestrator = InputOrchestrator::new(engine.clone(), debounce, update_tx);
    debug!("session opened");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let response = process_line(&line, &mut orchestrator, &engine, timeout_ms).await;
                write_response(&mut writer, &response).await?;
            }
            Some(update) = update_rx.recv() => {
                let response = DaemonResponse::new(String::new(), update.into());
                write_response(&mut writer, &response).await?;
            }
        }
    }

    debug!("session closed");
    Ok(())
}

async fn write_response<W>(writer: &mut W, response: &DaemonResponse) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let payload = serde_json::to_string(response)?;
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    Ok(())
}

async fn process_line(
    line: &str,
    orchestrator: &mut InputOrchestrator,
    engine: &SuggestionEngine,
    timeout_ms: u64,
) -> DaemonResponse {
    match serde_json::from_str::<DaemonRequest>(line) {
        Ok(request) => handle_request(request, orchestrator, engine, timeout_ms).await,
        Err(error) => {
            error!("invalid request JSON: {error}");
            DaemonResponse::new(
                String::new(),
                ResponseBody::Error(ErrorResponse {
                    code: ErrorCode::InvalidRequest,
                    message: format!("invalid JSON payload: {error}"),
                }),
            )
        }
    }
}

async fn handle_request(
    request: DaemonRequest,
    orchestrator: &mut InputOrchestrator,
    engine: &SuggestionEngine,
    timeout_ms: u64,
) -> DaemonResponse {
    let id = request.id;
    let body = match request.body {
        RequestBody::Ping => ResponseBody::Pong,
        RequestBody::Input { text } => {
            orchestrator.on_text_changed(text).await;
            ResponseBody::Ack
        }
        RequestBody::Accept { word } => {
            let text = orchestrator.on_suggestion_accepted(&word).await;
            ResponseBody::Accepted { text }
        }
        RequestBody::Snapshot => ResponseBody::Snapshot(orchestrator.snapshot().await),
        RequestBody::Suggest { text } => {
            let effective_timeout_ms = timeout_ms.max(1);
            match timeout(
                Duration::from_millis(effective_timeout_ms),
                engine.compute_suggestions(&text),
            )
            .await
            {
                Ok(suggestions) => ResponseBody::Suggestions(SuggestionsResponse {
                    sequence: None,
                    text,
                    suggestions,
                }),
                Err(_) => ResponseBody::Error(ErrorResponse {
                    code: ErrorCode::Timeout,
                    message: format!("suggestion exceeded {effective_timeout_ms}ms"),
                }),
            }
        }
    };
    DaemonResponse::new(id, body)
}
