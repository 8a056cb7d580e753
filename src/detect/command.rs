//! Regions printed as JSON by an external program.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use super::{parse_options, Detector};
use crate::error::FaceCropError;
use crate::region::{regions_from_json_slice, DetectedRegion};

pub(super) const NAME: &str = "command";
const COLOR: &str = "magenta";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandOptions {
    program: String,
    #[serde(default)]
    args: Vec<String>,
}

/// Runs `program args... <image>` and parses its stdout as a JSON array of
/// regions.
///
/// The program must exit successfully; its stderr is included in the error
/// otherwise.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
}

impl CommandDetector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn failure(&self, message: String) -> FaceCropError {
        FaceCropError::Detection {
            detector: NAME.to_string(),
            message,
        }
    }
}

impl Detector for CommandDetector {
    fn name(&self) -> &str {
        NAME
    }

    fn detect(&self, image: &Path) -> Result<Vec<DetectedRegion>, FaceCropError> {
        tracing::debug!(program = %self.program, image = %image.display(), "running detector command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image)
            .output()
            .map_err(|e| self.failure(format!("failed to execute '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let regions = regions_from_json_slice(&output.stdout).map_err(|e| {
            self.failure(format!(
                "failed to parse output of '{}': {e} | raw output: {}",
                self.program,
                String::from_utf8_lossy(&output.stdout).trim()
            ))
        })?;

        Ok(regions
            .into_iter()
            .map(|region| region.or_color(COLOR))
            .collect())
    }
}

pub(super) fn build(options: &serde_json::Value) -> Result<Box<dyn Detector>, FaceCropError> {
    let options: CommandOptions = parse_options(NAME, options)?;
    Ok(Box::new(CommandDetector::new(options.program, options.args)))
}
