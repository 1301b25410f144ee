//! Per-session position poller.
//!
//! Authoritative position reports only arrive on seek or track change;
//! the poll worker fills the gap with locally extrapolated ticks and
//! stops itself once the controller reports it is no longer playing.
//! Drift is bounded by resynchronization on every authoritative report.

use std::sync::Weak;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};

use media_controls_types::{PositionState, TabId};

use crate::registry::{PollTick, SessionRegistry};

/// Handle to one live poll worker, owned by its session entry.
///
/// Dropping the handle signals the worker to stop without blocking; a
/// tick already racing the registry lock re-checks entry presence and
/// generation before touching the row.
pub(crate) struct PollerHandle {
    stop: Sender<()>,
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        let _ = self.stop.try_send(());
    }
}

/// Spawn the poll worker for `tab_id`, seeded with an authoritative
/// position report.
pub(crate) fn spawn(
    registry: Weak<SessionRegistry>,
    tab_id: TabId,
    generation: u64,
    mut state: PositionState,
    interval: Duration,
) -> PollerHandle {
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let dt = interval.as_secs_f64();
    thread::spawn(move || {
        loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            let Some(registry) = registry.upgrade() else {
                break;
            };
            if matches!(
                registry.poll_tick(tab_id, generation, &mut state, dt),
                PollTick::Stop
            ) {
                break;
            }
        }
    });
    PollerHandle { stop: stop_tx }
}
