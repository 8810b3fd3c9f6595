//! A telemetry file held in memory next to its decoded model.
//!
//! The raw bytes are retained so the document can be written back exactly
//! as it was read; decoding never feeds back into the bytes.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::Result;
use crate::model::Container;
use crate::parser::{check_input_size, parse_telemetry, ParserOptions};

/// Loaded telemetry file.
#[derive(Debug, Clone)]
pub struct TelemetryDocument {
    container: Container,
    bytes: Vec<u8>,
    path: Option<PathBuf>,
}

impl TelemetryDocument {
    /// Read and decode the file at `path`.
    ///
    /// The size bound in `options` is checked against the file metadata
    /// before anything is read.
    pub fn open(path: &Path, options: &ParserOptions) -> Result<Self> {
        let size = fs::metadata(path)?.len();
        check_input_size(size, options)?;

        let bytes = fs::read(path)?;
        let mut document = Self::from_bytes(bytes, options)?;
        document.path = Some(path.to_path_buf());

        info!(path = %path.display(), bytes = size, "Telemetry document opened");
        Ok(document)
    }

    /// Decode an in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>, options: &ParserOptions) -> Result<Self> {
        let container = parse_telemetry(&bytes, options)?;
        Ok(TelemetryDocument {
            container,
            bytes,
            path: None,
        })
    }

    /// Write the original bytes to `path` and remember it as the document path.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        fs::write(path, &self.bytes)?;
        debug!(path = %path.display(), bytes = self.bytes.len(), "Telemetry document saved");
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn into_container(self) -> Container {
        self.container
    }

    /// Undecoded input.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Where the document was loaded from or last saved to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Hex SHA-256 of the raw bytes.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}
