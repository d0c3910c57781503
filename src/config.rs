use clap::Args;

use crate::error::GradingResult;
use crate::scale::{GradeScale, BASE_SCALE};

/// Grading settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GradingConfig {
    /// Maximum GPA of the institution's scale
    #[arg(long, env = "GRADEBOOK_GPA_SCALE", default_value_t = BASE_SCALE, global = true)]
    pub gpa_scale: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            gpa_scale: BASE_SCALE,
        }
    }
}

impl GradingConfig {
    pub fn scale(&self) -> GradingResult<GradeScale> {
        GradeScale::new(self.gpa_scale)
    }
}
