//! Engine context object.
//!
//! A single, explicitly constructed instance wires the registry, the UI
//! surface, the picture-in-picture launcher, and the config together,
//! and exposes the host-facing entry points: activation and tab-closed
//! notifications on one side, row interactions on the other.

use std::fmt;
use std::sync::Arc;

use media_controls_types::TabId;

use crate::config::ControlsConfig;
use crate::controller::{ControllerEventSink, MediaController, PipLauncher, TabSource};
use crate::interaction::{self, RowButton};
use crate::registry::SessionRegistry;
use crate::subscription::SessionEventSink;
use crate::surface::{ControlSurface, SurfaceError};

/// Errors surfaced once at engine construction.
#[derive(Debug)]
pub enum InitError {
    /// The UI surface is missing its template resources; the feature
    /// stays inert and the entry point stays disabled.
    SurfaceUnavailable(SurfaceError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::SurfaceUnavailable(err) => {
                write!(f, "media controls surface unavailable: {err}")
            }
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::SurfaceUnavailable(err) => Some(err),
        }
    }
}

/// The media controls engine.
///
/// Owns the session registry; observes (but never owns) controllers and
/// sources. Dropping the engine tears every session down and leaves the
/// toolbar disabled.
pub struct MediaControls {
    registry: Arc<SessionRegistry>,
    sink: Arc<SessionEventSink>,
    config: ControlsConfig,
}

impl std::fmt::Debug for MediaControls {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaControls")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MediaControls {
    /// Construct the engine.
    ///
    /// Fails once when the surface reports its template resources
    /// missing; callers report the error and leave the feature inert
    /// rather than retrying.
    pub fn init(
        surface: Arc<dyn ControlSurface>,
        pip: Arc<dyn PipLauncher>,
        config: ControlsConfig,
    ) -> Result<Self, InitError> {
        if let Err(err) = surface.ensure_ready() {
            tracing::error!(error = %err, "media controls disabled: surface not ready");
            return Err(InitError::SurfaceUnavailable(err));
        }
        surface.set_toolbar_enabled(false);
        let registry = Arc::new(SessionRegistry::new(surface, pip));
        let sink = Arc::new(SessionEventSink::new(
            Arc::downgrade(&registry),
            config.poll_interval,
        ));
        Ok(Self {
            registry,
            sink,
            config,
        })
    }

    /// Activation notification: audio/video playback began in a tab.
    ///
    /// Idempotent for an already-active session; a rejected activation
    /// (inactive controller, surface failure) changes no state.
    pub fn playback_started(
        &self,
        controller: Arc<dyn MediaController>,
        source: Arc<dyn TabSource>,
    ) {
        let tab_id = source.tab_id();
        let sink: Arc<dyn ControllerEventSink> = self.sink.clone();
        if let Err(err) = self.registry.upsert(controller, source, sink) {
            tracing::warn!(tab_id = %tab_id, error = %err, "media session activation rejected");
        }
    }

    /// Tab closed or discarded: remove its session, if one is tracked.
    pub fn tab_closed(&self, source: &dyn TabSource) {
        self.registry.remove(source.tab_id());
    }

    /// Number of currently tracked sessions.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Button press inside a session row.
    pub fn button_pressed(&self, tab_id: TabId, button: RowButton) {
        interaction::handle_button(&self.registry, &self.config, tab_id, button);
    }

    /// Seek drag began on a row's seekbar.
    pub fn seek_drag_started(&self, tab_id: TabId) {
        interaction::seek_drag_started(&self.registry, tab_id);
    }

    /// Seek drag committed at `fraction` of the seekbar range.
    pub fn seek_committed(&self, tab_id: TabId, fraction: f64) {
        interaction::seek_committed(&self.registry, tab_id, fraction);
    }

    /// Click on the non-button area of a session row.
    pub fn row_clicked(&self, tab_id: TabId) {
        interaction::row_clicked(&self.registry, tab_id);
    }

    /// Tear down every session and disable the toolbar. Idempotent.
    pub fn shutdown(&self) {
        self.registry.clear();
    }
}

impl Drop for MediaControls {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
