//! Audio Module
//!
//! Fire-and-forget background music. A missing or undecodable file is logged
//! and skipped; audio problems never stop the game. Playback goes through
//! rodio when the `audio` feature is enabled.

use std::path::{Path, PathBuf};

/// Something that can start a background track.
pub trait AudioTrigger {
    /// Play `path` as the background track if the file exists.
    fn play_background(&mut self, path: &Path);
}

/// Audio trigger that only records requested tracks.
#[derive(Debug, Default, Clone)]
pub struct RecordedAudio {
    pub played: Vec<PathBuf>,
}

impl AudioTrigger for RecordedAudio {
    fn play_background(&mut self, path: &Path) {
        self.played.push(path.to_path_buf());
    }
}

/// Background music player backed by the default output device.
pub struct MusicPlayer {
    #[cfg(feature = "audio")]
    output: Option<(rodio::OutputStream, rodio::OutputStreamHandle)>,
    #[cfg(feature = "audio")]
    sink: Option<rodio::Sink>,
}

impl Default for MusicPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MusicPlayer {
    #[cfg(feature = "audio")]
    pub fn new() -> Self {
        let output = match rodio::OutputStream::try_default() {
            Ok(output) => Some(output),
            Err(e) => {
                tracing::warn!(error = %e, "no audio output device, music disabled");
                None
            }
        };
        Self { output, sink: None }
    }

    #[cfg(not(feature = "audio"))]
    pub fn new() -> Self {
        Self {}
    }

    #[cfg(feature = "audio")]
    fn start(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let Some((_, handle)) = &self.output else {
            return Ok(());
        };
        let file = std::fs::File::open(path)?;
        let source = rodio::Decoder::new(std::io::BufReader::new(file))?;
        let sink = rodio::Sink::try_new(handle)?;
        sink.append(source);
        // Replacing the old sink stops the previous track.
        self.sink = Some(sink);
        Ok(())
    }

    #[cfg(not(feature = "audio"))]
    fn start(&mut self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        tracing::info!(track = %path.display(), "built without audio support, track not played");
        Ok(())
    }
}

impl AudioTrigger for MusicPlayer {
    fn play_background(&mut self, path: &Path) {
        if !path.exists() {
            tracing::debug!(track = %path.display(), "background track not found, skipping");
            return;
        }
        match self.start(path) {
            Ok(()) => tracing::info!(track = %path.display(), "background track started"),
            Err(e) => tracing::warn!(track = %path.display(), error = %e, "failed to play background track"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_skipped() {
        let mut player = MusicPlayer::new();
        player.play_background(Path::new("definitely/not/here.ogg"));
    }

    #[test]
    fn test_recorded_audio_keeps_order() {
        let mut audio = RecordedAudio::default();
        audio.play_background(Path::new("a.ogg"));
        audio.play_background(Path::new("b.ogg"));
        assert_eq!(audio.played, vec![PathBuf::from("a.ogg"), PathBuf::from("b.ogg")]);
    }
}
