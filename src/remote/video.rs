use std::{fmt, str::FromStr};

use futures::stream::{self, BoxStream, StreamExt as _};
use serde::{Deserialize, Serialize};

use crate::{
    assets::source::ImageSource,
    foundation::error::{ThumbError, ThumbResult},
    state::model::AspectRatio,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VideoResolution {
    #[default]
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
}

impl VideoResolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

impl fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoResolution {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "720p" => Ok(Self::P720),
            "1080p" => Ok(Self::P1080),
            other => Err(ThumbError::validation(format!(
                "unsupported video resolution \"{other}\" (expected 720p or 1080p)"
            ))),
        }
    }
}

/// A clip request. Start and end frames are optional keyframe images.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub resolution: VideoResolution,
    pub start_image: Option<ImageSource>,
    pub end_image: Option<ImageSource>,
}

impl VideoRequest {
    pub fn new(prompt: impl Into<String>, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio,
            resolution: VideoResolution::default(),
            start_image: None,
            end_image: None,
        }
    }

    pub fn resolution(mut self, resolution: VideoResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn start_image(mut self, source: ImageSource) -> Self {
        self.start_image = Some(source);
        self
    }

    pub fn end_image(mut self, source: ImageSource) -> Self {
        self.end_image = Some(source);
        self
    }

    pub fn validate(&self) -> ThumbResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(ThumbError::validation("video prompt must be non-empty"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPhase {
    Initializing,
    Generating,
    Finalizing,
    Downloading,
    Done,
    Failed,
}

impl VideoPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub phase: VideoPhase,
    pub progress_message: String,
    /// Set once the clip is available.
    pub result_url: Option<String>,
}

impl VideoStatus {
    pub fn new(phase: VideoPhase, progress_message: impl Into<String>) -> Self {
        Self {
            phase,
            progress_message: progress_message.into(),
            result_url: None,
        }
    }

    pub fn done(result_url: impl Into<String>) -> Self {
        Self {
            phase: VideoPhase::Done,
            progress_message: "Your clip is ready.".to_string(),
            result_url: Some(result_url.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(VideoPhase::Failed, message)
    }
}

/// A long-running remote clip job.
///
/// `status()` is lazy and restartable: nothing happens until the stream is polled, and every
/// call yields a fresh stream observing the job from its current point.
pub trait VideoJob {
    fn status(&self) -> BoxStream<'_, VideoStatus>;
}

pub trait VideoGenerator {
    type Job: VideoJob;

    fn start(&self, request: VideoRequest) -> impl Future<Output = ThumbResult<Self::Job>>;
}

/// Drive a job to its last status. `None` if the stream ended without any.
pub async fn final_status<J: VideoJob + ?Sized>(job: &J) -> Option<VideoStatus> {
    let mut stream = job.status();
    let mut last = None;
    while let Some(status) = stream.next().await {
        tracing::debug!(phase = ?status.phase, message = %status.progress_message, "video status");
        let terminal = status.phase.is_terminal();
        last = Some(status);
        if terminal {
            break;
        }
    }
    last
}

/// Job replaying a fixed list of statuses. Used offline and in tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedVideoJob {
    steps: Vec<VideoStatus>,
}

impl ScriptedVideoJob {
    pub fn new(steps: Vec<VideoStatus>) -> Self {
        Self { steps }
    }

    /// The usual progression ending at `result_url`.
    pub fn succeeding(result_url: impl Into<String>) -> Self {
        Self::new(vec![
            VideoStatus::new(VideoPhase::Initializing, "Starting the video engine..."),
            VideoStatus::new(
                VideoPhase::Generating,
                "Generating your clip, this usually takes one to three minutes...",
            ),
            VideoStatus::new(VideoPhase::Finalizing, "Polishing the last frames..."),
            VideoStatus::new(VideoPhase::Downloading, "Fetching the finished clip..."),
            VideoStatus::done(result_url),
        ])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(vec![
            VideoStatus::new(VideoPhase::Initializing, "Starting the video engine..."),
            VideoStatus::failed(message),
        ])
    }

    pub fn steps(&self) -> &[VideoStatus] {
        &self.steps
    }
}

impl VideoJob for ScriptedVideoJob {
    fn status(&self) -> BoxStream<'_, VideoStatus> {
        stream::iter(self.steps.iter().cloned()).boxed()
    }
}

/// Generator answering every valid request with the same script.
#[derive(Clone, Debug)]
pub struct ScriptedVideoGenerator {
    script: ScriptedVideoJob,
}

impl ScriptedVideoGenerator {
    pub fn new(script: ScriptedVideoJob) -> Self {
        Self { script }
    }
}

impl VideoGenerator for ScriptedVideoGenerator {
    type Job = ScriptedVideoJob;

    async fn start(&self, request: VideoRequest) -> ThumbResult<Self::Job> {
        request.validate()?;
        tracing::debug!(
            resolution = %request.resolution,
            aspect = %request.aspect_ratio,
            "starting scripted video job"
        );
        Ok(self.script.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/video.rs"]
mod tests;
