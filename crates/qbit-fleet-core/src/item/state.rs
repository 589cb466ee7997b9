//! Engine state strings, as sent in the `state` field of the torrent list.

use std::fmt;

/// Engine-reported torrent state.
///
/// `stoppedDL` / `stoppedUP` are the names newer engines use for the paused
/// states; they parse to the same variants. Strings the controller has no
/// policy for are kept verbatim in [`EngineState::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EngineState {
    Downloading,
    StalledDownloading,
    PausedDownloading,
    Uploading,
    StalledUploading,
    ForcedUploading,
    QueuedUploading,
    PausedUploading,
    Error,
    MissingFiles,
    Other(String),
}

impl EngineState {
    pub fn parse(s: &str) -> Self {
        match s {
            "downloading" => EngineState::Downloading,
            "stalledDL" => EngineState::StalledDownloading,
            "pausedDL" | "stoppedDL" => EngineState::PausedDownloading,
            "uploading" => EngineState::Uploading,
            "stalledUP" => EngineState::StalledUploading,
            "forcedUP" => EngineState::ForcedUploading,
            "queuedUP" => EngineState::QueuedUploading,
            "pausedUP" | "stoppedUP" => EngineState::PausedUploading,
            "error" => EngineState::Error,
            "missingFiles" => EngineState::MissingFiles,
            other => EngineState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EngineState::Downloading => "downloading",
            EngineState::StalledDownloading => "stalledDL",
            EngineState::PausedDownloading => "pausedDL",
            EngineState::Uploading => "uploading",
            EngineState::StalledUploading => "stalledUP",
            EngineState::ForcedUploading => "forcedUP",
            EngineState::QueuedUploading => "queuedUP",
            EngineState::PausedUploading => "pausedUP",
            EngineState::Error => "error",
            EngineState::MissingFiles => "missingFiles",
            EngineState::Other(s) => s,
        }
    }

    /// Seeding-side states: the payload is complete whatever `progress` says.
    pub fn is_seeding(&self) -> bool {
        matches!(
            self,
            EngineState::Uploading
                | EngineState::StalledUploading
                | EngineState::ForcedUploading
                | EngineState::QueuedUploading
                | EngineState::PausedUploading
        )
    }

    /// States that hold a transfer slot.
    pub fn is_transferring(&self) -> bool {
        matches!(
            self,
            EngineState::Downloading | EngineState::StalledDownloading
        )
    }

    /// States in which an incomplete torrent is not running.
    pub fn is_halted(&self) -> bool {
        matches!(
            self,
            EngineState::PausedDownloading | EngineState::Error | EngineState::MissingFiles
        )
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
