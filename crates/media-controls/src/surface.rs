//! Collaborator traits for the toolbar/panel UI surface.
//!
//! Template parsing and widget rendering stay on the host side; the
//! engine identifies rows solely by the tab id it tags them with.

use std::fmt;
use std::sync::Arc;

use media_controls_types::{MediaKey, MediaMetadata, TabId};

/// Errors reported by the UI surface collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// Template/markup resources were not available.
    MissingResources(String),
    /// A row could not be created for this tab.
    RowUnavailable(TabId),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::MissingResources(what) => {
                write!(f, "missing surface resources: {what}")
            }
            SurfaceError::RowUnavailable(tab_id) => {
                write!(f, "surface could not create a row for tab {tab_id}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Container owning the toolbar entry point and the per-session rows.
pub trait ControlSurface: Send + Sync {
    /// Verify template resources are present. Checked once at init; on
    /// failure the whole feature stays inert.
    fn ensure_ready(&self) -> Result<(), SurfaceError>;
    /// Clone the row template and append a row tagged with `tab_id`.
    fn create_row(&self, tab_id: TabId) -> Result<Arc<dyn SessionRow>, SurfaceError>;
    /// Remove the row tagged with `tab_id`, if present.
    fn remove_row(&self, tab_id: TabId);
    /// Enable or disable the toolbar entry point.
    fn set_toolbar_enabled(&self, enabled: bool);
}

/// One session's row inside the panel.
pub trait SessionRow: Send + Sync {
    /// Toggle the `playing` presentation flag.
    fn set_playing(&self, playing: bool);
    /// Seed the seekbar's duration attribute, in seconds.
    fn set_seek_range(&self, duration: f64);
    /// Move the seekbar thumb; `fraction` is elapsed/duration in `[0, 1]`.
    fn set_seek_fraction(&self, fraction: f64);
    /// Enable or disable one capability-gated button.
    fn set_key_enabled(&self, key: MediaKey, enabled: bool);
    /// Refresh title, artist, and artwork.
    fn set_metadata(&self, metadata: &MediaMetadata);
    /// Refresh favicon and site host text.
    fn set_source_info(&self, icon_url: Option<String>, host: Option<String>);
    /// Toggle the floating-presentation attribute.
    fn set_pip_active(&self, active: bool);
    /// Toggle the `can-pip` attribute (eligible stream count > 0).
    fn set_can_pip(&self, can_pip: bool);
}
