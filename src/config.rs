use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{ThumbError, ThumbResult},
    state::policy::DEFAULT_GRID_SPACING,
    typography::fonts::FontFiles,
};

pub const ENV_FONTS_DIR: &str = "THUMBFORGE_FONTS_DIR";
pub const ENV_HTTP_TIMEOUT_MS: &str = "THUMBFORGE_HTTP_TIMEOUT_MS";

/// Host configuration for a studio. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioConfig {
    pub fonts_dir: PathBuf,
    pub font_files: FontFiles,
    /// Grid spacing for the empty-state background, in pixels.
    pub grid_spacing: u32,
    /// Remote image fetch timeout; `None` waits indefinitely.
    pub http_timeout_ms: Option<u64>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            fonts_dir: PathBuf::from("assets/fonts"),
            font_files: FontFiles::default(),
            grid_spacing: DEFAULT_GRID_SPACING,
            http_timeout_ms: None,
        }
    }
}

impl StudioConfig {
    pub fn from_json_str(s: &str) -> ThumbResult<Self> {
        let cfg: Self =
            serde_json::from_str(s).map_err(|e| ThumbError::serde(format!("config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> ThumbResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn validate(&self) -> ThumbResult<()> {
        if self.grid_spacing == 0 {
            return Err(ThumbError::validation("config gridSpacing must be > 0"));
        }
        if self.http_timeout_ms == Some(0) {
            return Err(ThumbError::validation("config httpTimeoutMs must be > 0 when set"));
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> ThumbResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `lookup`. Blank values are ignored.
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ThumbResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_FONTS_DIR) {
            self.fonts_dir = PathBuf::from(dir.trim());
        }
        if let Some(ms) = get(ENV_HTTP_TIMEOUT_MS) {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                ThumbError::validation(format!(
                    "{ENV_HTTP_TIMEOUT_MS} must be an integer, got \"{ms}\""
                ))
            })?;
            self.http_timeout_ms = Some(ms);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
