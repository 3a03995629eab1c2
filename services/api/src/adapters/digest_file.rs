//! services/api/src/adapters/digest_file.rs
//!
//! The concrete implementation of the `DigestSource` port. The digest pipeline
//! writes `latest_digest.json` and `service_status.json`; this adapter only ever
//! reads them, on every request, so a freshly written digest is picked up
//! without restarting the server.

use async_trait::async_trait;
use news_digest_core::domain::Digest;
use news_digest_core::ports::{DigestSource, PortError, PortResult};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct JsonDigestStore {
    digest_path: PathBuf,
    status_path: PathBuf,
}

impl JsonDigestStore {
    pub fn new(digest_path: impl Into<PathBuf>, status_path: impl Into<PathBuf>) -> Self {
        Self {
            digest_path: digest_path.into(),
            status_path: status_path.into(),
        }
    }

    pub fn digest_path(&self) -> &Path {
        &self.digest_path
    }
}

/// Reads a file, mapping "does not exist" to `Ok(None)`.
async fn read_optional(path: &Path) -> std::io::Result<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl DigestSource for JsonDigestStore {
    async fn load_digest(&self) -> PortResult<Option<Digest>> {
        let Some(bytes) = read_optional(&self.digest_path).await.map_err(|e| {
            PortError::Unexpected(format!(
                "Failed to read digest {}: {}",
                self.digest_path.display(),
                e
            ))
        })?
        else {
            debug!("No digest at {}", self.digest_path.display());
            return Ok(None);
        };

        // A literal `null` document also means "nothing produced yet".
        serde_json::from_slice::<Option<Digest>>(&bytes).map_err(|e| {
            PortError::Unexpected(format!(
                "Failed to parse digest {}: {}",
                self.digest_path.display(),
                e
            ))
        })
    }

    async fn load_pipeline_status(&self) -> PortResult<Option<Value>> {
        let bytes = match read_optional(&self.status_path).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Could not read pipeline status {}: {}", self.status_path.display(), e);
                return Ok(None);
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Null) => Ok(None),
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                warn!("Ignoring unparsable pipeline status {}: {}", self.status_path.display(), e);
                Ok(None)
            }
        }
    }
}
