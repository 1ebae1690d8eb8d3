//! Presentation attributes carried by each ball
//!
//! The simulation never reads these. They ride along so a renderer can draw
//! a ball from the snapshot alone.

use serde::{Deserialize, Serialize};

/// Fill used for balls without a recognized color
pub const DEFAULT_BALL_COLOR: &str = "#eeeeee";

/// Optional look of a ball
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallStyle {
    /// Named color (`red`, `blue`, `slate`) or anything else
    pub color: Option<String>,
    /// Icon drawn instead of the label text
    pub icon_path: Option<String>,
    /// Extra description shown when the ball is delivered
    pub paragraphs: Vec<String>,
}

impl BallStyle {
    /// Fill color for the simulation view
    pub fn background_color(&self) -> &'static str {
        match self.color.as_deref() {
            Some("red") => "#ef4444",
            Some("blue") => "#3b82f6",
            Some("slate") => "#020617",
            _ => DEFAULT_BALL_COLOR,
        }
    }

    /// Whether the ball shows an icon rather than its label
    pub fn has_icon(&self) -> bool {
        self.icon_path.as_deref().is_some_and(|path| !path.is_empty())
    }
}
