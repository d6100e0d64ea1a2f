//! TLS material resolution for the HTTP listener.
//!
//! The certificate and the key can each come from a file path
//! (`SSL_CERT_FILE` / `SSL_KEY_FILE`) or from inline PEM content
//! (`SSL_CERT_DATA` / `SSL_KEY_DATA`). Inline content wins: it is written to
//! an owner-only temporary file and that file becomes the effective path.
//!
//! Resolution outcomes:
//! - certificate and key both present: TLS with those two paths
//! - neither present: plaintext
//! - only one present: configuration error
//!
//! PEM contents are not validated here; the listener fails at startup if the
//! pair cannot be loaded.
//!
//! Temporary files live as long as the [`TlsMaterial`] that owns them and are
//! removed when it is dropped.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Raw TLS inputs as read from the environment
#[derive(Clone, Default)]
pub struct TlsSource {
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
    pub cert_data: Option<String>,
    pub key_data: Option<String>,
}

// Inline key material stays out of logs.
impl std::fmt::Debug for TlsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsSource")
            .field("cert_file", &self.cert_file)
            .field("key_file", &self.key_file)
            .field("cert_data", &self.cert_data.as_ref().map(|_| "<inline>"))
            .field("key_data", &self.key_data.as_ref().map(|_| "<inline>"))
            .finish()
    }
}

/// Outcome of TLS resolution
#[derive(Debug)]
pub enum TlsMode {
    /// Serve plain HTTP
    Plaintext,
    /// Serve HTTPS with the given material
    Tls(TlsMaterial),
}

impl TlsMode {
    pub fn is_tls(&self) -> bool {
        matches!(self, TlsMode::Tls(_))
    }
}

/// One side of the pair: a caller-provided path or a temp file we wrote
#[derive(Debug)]
enum PemLocation {
    Path(PathBuf),
    Materialized(NamedTempFile),
}

impl PemLocation {
    fn path(&self) -> &Path {
        match self {
            PemLocation::Path(p) => p,
            PemLocation::Materialized(f) => f.path(),
        }
    }
}

/// Effective certificate and key paths.
///
/// Owns any temporary files created for inline PEM data; dropping it
/// deletes them.
#[derive(Debug)]
pub struct TlsMaterial {
    cert: PemLocation,
    key: PemLocation,
}

impl TlsMaterial {
    pub fn cert_path(&self) -> &Path {
        self.cert.path()
    }

    pub fn key_path(&self) -> &Path {
        self.key.path()
    }

    /// Whether any part of the pair was written from inline data
    pub fn is_materialized(&self) -> bool {
        matches!(self.cert, PemLocation::Materialized(_))
            || matches!(self.key, PemLocation::Materialized(_))
    }
}

impl TlsSource {
    /// True when no TLS variable is set at all
    pub fn is_empty(&self) -> bool {
        self.cert_file.is_none()
            && self.key_file.is_none()
            && self.cert_data.is_none()
            && self.key_data.is_none()
    }

    /// Decide between TLS and plaintext, writing inline PEM data to
    /// owner-only temp files where needed.
    pub fn resolve(&self) -> Result<TlsMode> {
        let cert = locate(self.cert_data.as_deref(), self.cert_file.as_deref(), "cert")?;
        let key = locate(self.key_data.as_deref(), self.key_file.as_deref(), "key")?;

        match (cert, key) {
            (Some(cert), Some(key)) => {
                let material = TlsMaterial { cert, key };
                info!(
                    cert = %material.cert_path().display(),
                    key = %material.key_path().display(),
                    inline = material.is_materialized(),
                    "TLS enabled"
                );
                Ok(TlsMode::Tls(material))
            }
            (None, None) => {
                debug!("No TLS material configured, serving plaintext");
                Ok(TlsMode::Plaintext)
            }
            (Some(_), None) => Err(Error::TlsIncomplete("certificate", "key")),
            (None, Some(_)) => Err(Error::TlsIncomplete("key", "certificate")),
        }
    }
}

fn locate(data: Option<&str>, path: Option<&Path>, label: &str) -> Result<Option<PemLocation>> {
    if let Some(data) = data {
        return Ok(Some(PemLocation::Materialized(materialize(data, label)?)));
    }
    Ok(path.map(|p| PemLocation::Path(p.to_path_buf())))
}

/// Write PEM content verbatim to a fresh temp file readable only by us.
fn materialize(data: &str, label: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("akx-{label}-"))
        .suffix(".pem")
        .tempfile()?;

    // tempfile already creates 0600 files on unix; make it explicit.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(data.as_bytes())?;
    file.flush()?;
    debug!("Wrote inline TLS {} to {}", label, file.path().display());
    Ok(file)
}
