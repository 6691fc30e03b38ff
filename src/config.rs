//! Render configuration file.
//!
//! ```json
//! { "fonts": { "regular": "fonts/NotoSansTC-Regular.ttf", "black": "fonts/NotoSansTC-Black.ttf" },
//!   "clear_rgba": [0, 0, 0, 255] }
//! ```
//!
//! Relative font paths resolve against the directory holding the config file.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{NewscardError, NewscardResult};
use crate::render::backend::RenderSettings;
use crate::text::engine::{FontConfig, TextEngine};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub fonts: FontConfig,
    /// Straight RGBA8 the surface is cleared to before the background is drawn.
    pub clear_rgba: Option<[u8; 4]>,
}

impl RenderConfig {
    pub fn from_json(json: &str) -> NewscardResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| NewscardError::validation(format!("invalid render config: {e}")))
    }

    pub fn load(path: &Path) -> NewscardResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let config = Self::from_json(&json)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Ok(config.relative_to(base))
    }

    /// Rebase relative font paths onto `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        for slot in [
            &mut self.fonts.regular,
            &mut self.fonts.bold,
            &mut self.fonts.black,
            &mut self.fonts.brand,
        ] {
            if let Some(p) = slot.as_mut()
                && p.is_relative()
            {
                *p = base.join(&*p);
            }
        }
        self
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self.clear_rgba,
        }
    }

    /// Load every configured face into a fresh engine.
    pub fn text_engine(&self) -> NewscardResult<TextEngine> {
        TextEngine::from_config(&self.fonts)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
