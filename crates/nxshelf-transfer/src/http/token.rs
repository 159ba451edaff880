//! What a checkpoint remembers about an interrupted attempt.

use std::path::PathBuf;

use nxshelf_core::{ResumeToken, TransferError, TransferResult};
use serde::{Deserialize, Serialize};

/// Decoded form of a [`ResumeToken`] issued by `HttpTransport`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Checkpoint {
    pub url: String,
    /// File holding the bytes received so far.
    pub partial_path: PathBuf,
    pub bytes_written: u64,
    /// Validator for `If-Range`, when the server sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

impl Checkpoint {
    pub(crate) fn encode(&self) -> TransferResult<ResumeToken> {
        serde_json::to_vec(self)
            .map(ResumeToken::new)
            .map_err(|e| TransferError::transport(format!("Cannot encode checkpoint: {e}")))
    }

    pub(crate) fn decode(token: &ResumeToken) -> TransferResult<Self> {
        serde_json::from_slice(token.as_bytes())
            .map_err(|e| TransferError::transport(format!("Unrecognised resume token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_survives_storage_encoding() {
        let checkpoint = Checkpoint {
            url: "https://cdn.example/a.nsp".to_string(),
            partial_path: PathBuf::from("/tmp/h1.part"),
            bytes_written: 4096,
            etag: Some("\"abc\"".to_string()),
        };

        let stored = checkpoint.encode().unwrap().to_base64();
        let token = ResumeToken::from_base64(&stored).unwrap();
        assert_eq!(Checkpoint::decode(&token).unwrap(), checkpoint);
    }

    #[test]
    fn test_foreign_token_is_rejected() {
        let token = ResumeToken::new(b"not a checkpoint".to_vec());
        assert!(matches!(
            Checkpoint::decode(&token),
            Err(TransferError::Transport { .. })
        ));
    }
}
