use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of the browser tab that owns a media session.
///
/// Assigned by the host, unique among registered sessions at any instant,
/// and reusable once a prior session for the same tab is fully removed.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a media-session controller.
///
/// Carried by every controller event so handlers can resolve the target
/// session without relying on delivery order.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub u64);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Media-session action vocabulary shared by controllers and the engine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKey {
    /// Toggle between playing and paused.
    PlayPause,
    /// Skip to the previous track.
    PreviousTrack,
    /// Skip to the next track.
    NextTrack,
    /// Seek forward by a fixed offset.
    SeekForward,
    /// Seek backward by a fixed offset.
    SeekBackward,
}

impl MediaKey {
    /// Every key, in row-button order.
    pub const ALL: [MediaKey; 5] = [
        MediaKey::PlayPause,
        MediaKey::PreviousTrack,
        MediaKey::NextTrack,
        MediaKey::SeekForward,
        MediaKey::SeekBackward,
    ];

    /// Wire/attribute name for this key.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKey::PlayPause => "play-pause",
            MediaKey::PreviousTrack => "previous-track",
            MediaKey::NextTrack => "next-track",
            MediaKey::SeekForward => "seek-forward",
            MediaKey::SeekBackward => "seek-backward",
        }
    }
}

/// One artwork image from a metadata snapshot.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtworkImage {
    /// Image URL.
    pub src: String,
    /// Size hint as reported by the session (for example `512x512`).
    pub sizes: Option<String>,
}

/// Metadata snapshot exposed by a media-session controller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaMetadata {
    /// Track or stream title.
    pub title: String,
    /// Artist or channel name.
    pub artist: String,
    /// Artwork candidates, smallest first.
    pub artwork: Vec<ArtworkImage>,
}

impl MediaMetadata {
    /// Largest artwork candidate (sessions list theirs smallest first).
    pub fn best_artwork(&self) -> Option<&ArtworkImage> {
        self.artwork.last()
    }
}

/// Authoritative playback position report from a controller.
///
/// Delivered on seek and track change only; the engine extrapolates
/// between reports.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PositionState {
    /// Elapsed playback time, in seconds.
    pub position: f64,
    /// Total media duration, in seconds.
    pub duration: f64,
}

impl PositionState {
    /// Elapsed fraction in `[0, 1]`.
    ///
    /// A zero, negative, or non-finite duration yields `0.0` rather than
    /// an indeterminate division.
    pub fn fraction(&self) -> f64 {
        if !self.position.is_finite() || !self.duration.is_finite() || self.duration <= 0.0 {
            return 0.0;
        }
        (self.position / self.duration).clamp(0.0, 1.0)
    }
}
