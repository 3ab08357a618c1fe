use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::Instrument;

use super::TranscodeError;

/// External media encoder producing one scaled variant per call.
#[async_trait]
pub trait VideoEncoder: Send + Sync {
    async fn encode(&self, input: &Path, output: &Path, width: u32) -> Result<(), TranscodeError>;
}

pub struct FfmpegEncoder {
    binary: String,
}

impl FfmpegEncoder {
    pub fn new(binary: impl Into<String>) -> Self {
        FfmpegEncoder {
            binary: binary.into(),
        }
    }

    pub fn arguments(input: &Path, output: &Path, width: u32) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-vf".to_string(),
            format!("scale={}:-1", width),
            output.display().to_string(),
        ]
    }
}

#[async_trait]
impl VideoEncoder for FfmpegEncoder {
    async fn encode(&self, input: &Path, output: &Path, width: u32) -> Result<(), TranscodeError> {
        let span = tracing::info_span!("Running encoder", binary = %self.binary, width);
        let result = Command::new(&self.binary)
            .args(Self::arguments(input, output, width))
            .kill_on_drop(true)
            .output()
            .instrument(span)
            .await?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            let lines: Vec<&str> = stderr.lines().collect();
            let tail = lines[lines.len().saturating_sub(5)..].join("\n");
            return Err(TranscodeError::Encoder(format!(
                "{} exited with {}: {}",
                self.binary, result.status, tail
            )));
        }
        Ok(())
    }
}
