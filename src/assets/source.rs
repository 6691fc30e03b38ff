use std::path::{Path, PathBuf};

use anyhow::Context;
use base64::Engine as _;

use crate::assets::decode::ImageOrigin;
use crate::foundation::error::{NewscardError, NewscardResult};

/// Raw bytes of one image source plus where they came from.
#[derive(Clone, Debug)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub origin: ImageOrigin,
}

/// How an image source string is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    DataUrl,
    Remote,
    File,
}

impl SourceKind {
    pub fn classify(source: &str) -> Self {
        let lower = source.get(..8).unwrap_or(source).to_ascii_lowercase();
        if lower.starts_with("data:") {
            SourceKind::DataUrl
        } else if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceKind::Remote
        } else {
            SourceKind::File
        }
    }
}

/// Turns an image source string into bytes.
pub trait SourceFetcher {
    fn fetch(&self, source: &str) -> NewscardResult<FetchedBytes>;
}

impl<F> SourceFetcher for F
where
    F: Fn(&str) -> NewscardResult<FetchedBytes>,
{
    fn fetch(&self, source: &str) -> NewscardResult<FetchedBytes> {
        self(source)
    }
}

/// Data URLs, local files (relative to `base_dir`) and, with the `remote` feature, HTTP(S).
pub struct DefaultFetcher {
    base_dir: Option<PathBuf>,
    #[cfg(feature = "remote")]
    client: reqwest::blocking::Client,
}

impl DefaultFetcher {
    pub fn new() -> NewscardResult<Self> {
        Ok(Self {
            base_dir: None,
            #[cfg(feature = "remote")]
            client: reqwest::blocking::Client::builder()
                .build()
                .context("build http client")?,
        })
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve_path(&self, source: &str) -> PathBuf {
        let raw = source.strip_prefix("file://").unwrap_or(source);
        let path = Path::new(raw);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    #[cfg(feature = "remote")]
    fn fetch_remote(&self, source: &str) -> NewscardResult<FetchedBytes> {
        let resp = self
            .client
            .get(source)
            .send()
            .with_context(|| format!("GET {source}"))?
            .error_for_status()
            .with_context(|| format!("GET {source}"))?;
        let cors_ok = resp
            .headers()
            .contains_key(reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN);
        let bytes = resp.bytes().context("read response body")?.to_vec();
        Ok(FetchedBytes {
            bytes,
            origin: ImageOrigin::Remote { cors_ok },
        })
    }

    #[cfg(not(feature = "remote"))]
    fn fetch_remote(&self, source: &str) -> NewscardResult<FetchedBytes> {
        Err(NewscardError::asset(format!(
            "remote source '{}' needs the `remote` feature",
            short_source(source)
        )))
    }
}

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, source: &str) -> NewscardResult<FetchedBytes> {
        match SourceKind::classify(source) {
            SourceKind::DataUrl => Ok(FetchedBytes {
                bytes: decode_data_url(source)?,
                origin: ImageOrigin::Local,
            }),
            SourceKind::Remote => self.fetch_remote(source),
            SourceKind::File => {
                let path = self.resolve_path(source);
                let bytes = std::fs::read(&path)
                    .with_context(|| format!("read image '{}'", path.display()))?;
                Ok(FetchedBytes {
                    bytes,
                    origin: ImageOrigin::Local,
                })
            }
        }
    }
}

/// Payload of a base64 `data:` URL.
pub fn decode_data_url(source: &str) -> NewscardResult<Vec<u8>> {
    let rest = source
        .strip_prefix("data:")
        .ok_or_else(|| NewscardError::asset("not a data URL"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| NewscardError::asset("data URL has no payload"))?;
    if !meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(NewscardError::asset("data URL must be base64-encoded"));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .context("decode data URL payload")?;
    Ok(bytes)
}

/// Encode bytes as a `data:` URL, the form uploaded templates are stored in.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Source string shortened for log lines; data URLs can be megabytes long.
pub fn short_source(source: &str) -> String {
    const MAX: usize = 64;
    if source.chars().count() <= MAX {
        return source.to_string();
    }
    let head: String = source.chars().take(MAX).collect();
    format!("{head}...")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
