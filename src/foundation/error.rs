/// Convenience result type used across the crate.
pub type NewscardResult<T> = Result<T, NewscardError>;

/// Remediation shown when a cross-origin template blocks export.
pub const TAINTED_EXPORT_MESSAGE: &str = "下載失敗：原因通常是遠端圖片的安全限制 (CORS)。\n\n\
解決方法：\n\
1. 請先手動下載圖卡到電腦。\n\
2. 點擊「切換類別」旁的『我自己上傳圖卡』功能上傳。\n\
3. 使用本地圖片製作即可順利下載。";

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum NewscardError {
    /// Invalid user-provided data (state JSON, config, store keys).
    #[error("validation error: {0}")]
    Validation(String),

    /// A single image source could not be fetched or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Backend invariant violations while executing a plan.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding or writing the exported image failed.
    #[error("export error: {0}")]
    Export(String),

    /// The rendered frame contains cross-origin pixels and cannot be serialized.
    #[error("{TAINTED_EXPORT_MESSAGE}")]
    Tainted,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NewscardError {
    /// Build a [`NewscardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NewscardError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`NewscardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`NewscardError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
