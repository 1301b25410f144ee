//! Controller event subscription management.
//!
//! One listener object is attached per controller on activation and
//! detached on removal. Every handler resolves its target entry through
//! the controller id carried by the event, never through iteration
//! order, so interleaved deliveries from concurrent sessions can never
//! touch the wrong row.

use std::sync::{Arc, Weak};
use std::time::Duration;

use media_controls_types::ControllerId;

use crate::controller::{ControllerEvent, ControllerEventSink};
use crate::registry::{self, SessionRegistry};

/// The engine's controller-event listener.
///
/// Holds only a weak registry reference, so a sink still referenced by a
/// slow host after teardown can neither keep the engine alive nor act on
/// a dropped registry.
pub struct SessionEventSink {
    registry: Weak<SessionRegistry>,
    poll_interval: Duration,
}

impl SessionEventSink {
    pub fn new(registry: Weak<SessionRegistry>, poll_interval: Duration) -> Self {
        Self {
            registry,
            poll_interval,
        }
    }
}

impl ControllerEventSink for SessionEventSink {
    fn handle_event(&self, controller_id: ControllerId, event: ControllerEvent) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match event {
            ControllerEvent::PositionState(state) => {
                registry.position_changed(controller_id, state, self.poll_interval);
            }
            ControllerEvent::PlaybackState => {
                let _ = registry.with_controller_entry(controller_id, |entry| {
                    entry.row.set_playing(entry.controller.is_playing());
                });
            }
            ControllerEvent::SupportedKeys => {
                let _ = registry.with_controller_entry(controller_id, |entry| {
                    registry::apply_key_gating(
                        entry.row.as_ref(),
                        &entry.controller.supported_keys(),
                    );
                });
            }
            ControllerEvent::Metadata => {
                let _ = registry.with_controller_entry(controller_id, |entry| {
                    entry.row.set_metadata(&entry.controller.metadata());
                });
            }
            ControllerEvent::Deactivated => {
                // Self-detach during the controller's own dispatch is
                // required: the listener must be gone before the row is.
                if let Some(tab_id) = registry.tab_for_controller(controller_id) {
                    registry.remove(tab_id);
                }
            }
            ControllerEvent::PipMode { active } => {
                let _ = registry.with_controller_entry(controller_id, |entry| {
                    entry.row.set_pip_active(active);
                });
            }
        }
    }
}
