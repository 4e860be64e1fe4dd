use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Fps, Rgba8};
use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Frames an editor holds at most unless configured otherwise.
pub const DEFAULT_MAX_FRAMES: usize = 32;

/// Alpha (out of 255) of the onion-skin overlay.
pub const DEFAULT_ONION_ALPHA: u8 = 25;

/// Tunables for an [`Editor`](crate::Editor) session.
///
/// Every field has a default, so a config file only needs the keys it overrides:
///
/// ```json
/// { "max_frames": 16, "fps": { "num": 8, "den": 1 } }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Upper bound on the number of frames in a project.
    pub max_frames: usize,
    /// Playback and export frame rate.
    pub fps: Fps,
    /// Fill colour of new and cleared frames.
    pub background: Rgba8,
    /// Whether the previous frame is overlaid while editing.
    pub onion_skin: bool,
    /// Overlay strength of the previous frame.
    pub onion_alpha: u8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            fps: Fps::default(),
            background: Rgba8::WHITE,
            onion_skin: true,
            onion_alpha: DEFAULT_ONION_ALPHA,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> FlipbookResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| FlipbookError::serde(format!("parse editor config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> FlipbookResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read editor config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.max_frames == 0 {
            return Err(FlipbookError::validation("max_frames must be > 0"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
