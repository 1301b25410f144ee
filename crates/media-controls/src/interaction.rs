//! Interaction routing from row input to controller commands.
//!
//! Capability-gated actions re-check the controller's supported keys at
//! call time, so a click queued before a capability change never
//! reaches the controller. Unknown tab ids are silent no-ops.

use std::sync::Arc;

use media_controls_types::{MediaKey, TabId};

use crate::config::ControlsConfig;
use crate::controller::MediaController;
use crate::registry::SessionRegistry;

/// Buttons present on every session row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowButton {
    PlayPause,
    PreviousTrack,
    NextTrack,
    SeekForward,
    SeekBackward,
    PictureInPicture,
    Focus,
}

/// Dispatch one button press against the owning session.
pub(crate) fn handle_button(
    registry: &SessionRegistry,
    config: &ControlsConfig,
    tab_id: TabId,
    button: RowButton,
) {
    match button {
        RowButton::PlayPause => {
            let _ = registry.with_entry(tab_id, |entry| {
                gated(entry.controller.as_ref(), MediaKey::PlayPause, |c| {
                    if c.is_playing() {
                        c.pause();
                    } else {
                        c.play();
                    }
                });
            });
        }
        RowButton::PreviousTrack => {
            let _ = registry.with_entry(tab_id, |entry| {
                gated(entry.controller.as_ref(), MediaKey::PreviousTrack, |c| {
                    c.previous_track();
                });
            });
        }
        RowButton::NextTrack => {
            let _ = registry.with_entry(tab_id, |entry| {
                gated(entry.controller.as_ref(), MediaKey::NextTrack, |c| {
                    c.next_track();
                });
            });
        }
        RowButton::SeekForward => {
            let step = config.seek_step;
            let _ = registry.with_entry(tab_id, |entry| {
                gated(entry.controller.as_ref(), MediaKey::SeekForward, |c| {
                    c.seek_forward(step);
                });
            });
        }
        RowButton::SeekBackward => {
            let step = config.seek_step;
            let _ = registry.with_entry(tab_id, |entry| {
                gated(entry.controller.as_ref(), MediaKey::SeekBackward, |c| {
                    c.seek_backward(step);
                });
            });
        }
        RowButton::PictureInPicture => {
            let source = registry.with_entry(tab_id, |entry| Arc::clone(&entry.source));
            if let Some(source) = source {
                registry.pip().request_toggle(source.as_ref());
            }
        }
        RowButton::Focus => {
            let _ = registry.with_entry(tab_id, |entry| entry.controller.focus());
        }
    }
}

/// Seek drag began: pause immediately so authoritative position events
/// stop fighting the user's thumb. No registry mutation.
pub(crate) fn seek_drag_started(registry: &SessionRegistry, tab_id: TabId) {
    let _ = registry.with_entry(tab_id, |entry| entry.controller.pause());
}

/// Seek committed at `fraction` of the last authoritative duration,
/// then playback resumes. Ignored before any position report has
/// carried a usable duration.
pub(crate) fn seek_committed(registry: &SessionRegistry, tab_id: TabId, fraction: f64) {
    let _ = registry.with_entry(tab_id, |entry| {
        let Some(duration) = entry.last_duration else {
            tracing::trace!(tab_id = %tab_id, "seek commit before any position report ignored");
            return;
        };
        let target = fraction.clamp(0.0, 1.0) * duration;
        entry.controller.seek_to(target);
        entry.controller.play();
    });
}

/// Click on the non-button area of a row focuses the owning session.
pub(crate) fn row_clicked(registry: &SessionRegistry, tab_id: TabId) {
    let _ = registry.with_entry(tab_id, |entry| entry.controller.focus());
}

/// Run `action` only when the controller currently supports `key`.
fn gated(
    controller: &dyn MediaController,
    key: MediaKey,
    action: impl FnOnce(&dyn MediaController),
) {
    if controller.supported_keys().contains(&key) {
        action(controller);
    } else {
        tracing::trace!(key = key.as_str(), "unsupported media action ignored");
    }
}
