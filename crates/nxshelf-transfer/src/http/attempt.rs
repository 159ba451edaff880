//! One streaming GET, from request to terminal notification.

use std::path::PathBuf;

use futures_util::StreamExt;
use nxshelf_core::{
    ResumeToken, TransferError, TransportHandle, TransportNotification, TransportSignal,
};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_RANGE, ETAG, HeaderMap, IF_RANGE, RANGE};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::token::Checkpoint;

/// How an attempt ended.
#[derive(Debug)]
pub(super) enum Outcome {
    Finished(PathBuf),
    Failed(TransferError),
    Checkpoint(Option<ResumeToken>),
}

pub(super) struct Attempt {
    pub handle: TransportHandle,
    pub url: String,
    pub partial_path: PathBuf,
    /// Bytes already on disk from an earlier attempt.
    pub offset: u64,
    pub etag: Option<String>,
    pub cancel: CancellationToken,
    pub notifications: mpsc::UnboundedSender<TransportNotification>,
}

impl Attempt {
    /// Run to the end and report the outcome.
    pub(super) async fn run(mut self, client: reqwest::Client) -> Outcome {
        match self.fetch(&client).await {
            Ok(outcome) => outcome,
            Err(error) => Outcome::Failed(error),
        }
    }

    fn notify(&self, signal: TransportSignal) {
        // Receiver gone means nobody is listening any more.
        let _ = self
            .notifications
            .send(TransportNotification::new(self.handle, signal));
    }

    async fn fetch(&mut self, client: &reqwest::Client) -> Result<Outcome, TransferError> {
        let mut request = client.get(&self.url);
        if self.offset > 0 {
            request = request.header(RANGE, format!("bytes={}-", self.offset));
            if let Some(etag) = &self.etag {
                request = request.header(IF_RANGE, etag.as_str());
            }
        }

        let response = tokio::select! {
            biased;

            () = self.cancel.cancelled() => return self.checkpoint(self.offset),

            response = request.send() => response.map_err(|e| TransferError::transport(e.to_string()))?,
        };

        let status = response.status();
        if status == StatusCode::RANGE_NOT_SATISFIABLE
            && self.offset > 0
            && complete_length(response.headers()) == Some(self.offset)
        {
            // Paused after the last byte landed; nothing left to fetch.
            tracing::debug!(
                target: "nxshelf.transfer",
                handle = %self.handle,
                bytes = self.offset,
                "Partial file already complete"
            );
            self.notify(TransportSignal::Accepted);
            self.notify(TransportSignal::Progress {
                bytes_written: self.offset,
                total_bytes: Some(self.offset),
            });
            return Ok(Outcome::Finished(self.partial_path.clone()));
        }
        if !status.is_success() {
            return Err(TransferError::transport_with_status(
                format!("Server answered {status} for {}", self.url),
                status.as_u16(),
            ));
        }
        self.notify(TransportSignal::Accepted);

        let resumed = self.offset > 0 && status == StatusCode::PARTIAL_CONTENT;
        let mut written = if resumed { self.offset } else { 0 };
        if !resumed {
            if self.offset > 0 {
                tracing::debug!(
                    target: "nxshelf.transfer",
                    handle = %self.handle,
                    "Server ignored range request, restarting from zero"
                );
            }
            self.etag = response
                .headers()
                .get(ETAG)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
        }
        let total = response.content_length().map(|len| len + written);

        let mut file = open_partial(&self.partial_path, resumed).await?;
        let mut stream = response.bytes_stream();

        loop {
            tokio::select! {
                biased;

                () = self.cancel.cancelled() => {
                    flush(&mut file).await?;
                    if total == Some(written) {
                        return Ok(Outcome::Finished(self.partial_path.clone()));
                    }
                    return self.checkpoint(written);
                }

                chunk = stream.next() => match chunk {
                    Some(Ok(bytes)) => {
                        file.write_all(&bytes)
                            .await
                            .map_err(|e| TransferError::storage(format!("Cannot write {}: {e}", self.partial_path.display())))?;
                        written += bytes.len() as u64;
                        self.notify(TransportSignal::Progress {
                            bytes_written: written,
                            total_bytes: total,
                        });
                    }
                    Some(Err(e)) => {
                        flush(&mut file).await?;
                        return Err(TransferError::transport(e.to_string()));
                    }
                    None => break,
                },
            }
        }

        flush(&mut file).await?;
        Ok(Outcome::Finished(self.partial_path.clone()))
    }

    fn checkpoint(&self, written: u64) -> Result<Outcome, TransferError> {
        if written == 0 {
            return Ok(Outcome::Checkpoint(None));
        }
        let token = Checkpoint {
            url: self.url.clone(),
            partial_path: self.partial_path.clone(),
            bytes_written: written,
            etag: self.etag.clone(),
        }
        .encode()?;
        Ok(Outcome::Checkpoint(Some(token)))
    }
}

/// Full length from a `Content-Range: bytes */N` header, as sent with 416.
fn complete_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)?
        .to_str()
        .ok()?
        .strip_prefix("bytes */")?
        .trim()
        .parse()
        .ok()
}

async fn open_partial(path: &std::path::Path, append: bool) -> Result<File, TransferError> {
    let result = if append {
        OpenOptions::new().append(true).open(path).await
    } else {
        File::create(path).await
    };
    result.map_err(|e| TransferError::storage(format!("Cannot open {}: {e}", path.display())))
}

async fn flush(file: &mut File) -> Result<(), TransferError> {
    file.flush().await.map_err(|e| TransferError::from_io_error(&e))
}

impl From<Outcome> for TransportSignal {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Finished(local_temp_path) => Self::Finished { local_temp_path },
            Outcome::Failed(error) => Self::Failed { error },
            Outcome::Checkpoint(token) => Self::Checkpoint { token },
        }
    }
}
