pub mod blank;
pub mod feedback;
pub mod rote;
pub mod study;

use std::time::Duration;

use crate::config::Config;

pub const ATTEMPT_PROMPT: &str = ">>> ";

/// Presentation knobs shared by every drill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrillSettings {
    /// Pause after feedback so it can be read before the next redraw.
    pub pause: Duration,
    pub clear_screen: bool,
}

impl DrillSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            pause: Duration::from_millis(config.feedback_pause_ms),
            clear_screen: config.clear_screen,
        }
    }
}

impl Default for DrillSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// True if an attempt line asks to leave the drill.
pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}
