use serde::{Deserialize, Serialize};

/// Modifier parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FitConfig {
    /// Align and measure using only points whose inclusion flag is set.
    #[serde(default = "default_true")]
    pub selected_only: bool,
    /// Trajectory frame every other frame is superimposed onto.
    #[serde(default)]
    pub reference_frame: usize,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            selected_only: true,
            reference_frame: 0,
        }
    }
}

fn default_true() -> bool {
    true
}
