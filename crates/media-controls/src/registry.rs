//! In-memory media session registry.
//!
//! Single source of truth for which sessions currently have a row in the
//! panel. Listener attachment, row creation, and map insertion happen
//! atomically under one lock, so an entry is never observable with
//! listeners but no UI or vice versa.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use media_controls_types::{ControllerId, MediaKey, PositionState, TabId};

use crate::controller::{ControllerEventSink, ListenerToken, MediaController, PipLauncher, TabSource};
use crate::poller::{self, PollerHandle};
use crate::surface::{ControlSurface, SessionRow, SurfaceError};
use crate::visibility;

/// Errors produced by [`SessionRegistry::upsert`].
///
/// Upsert fails closed: on any error no listeners were attached and no
/// row was created.
#[derive(Debug)]
pub enum UpsertError {
    /// The controller reported inactive; the activation is ignored.
    ControllerInactive(TabId),
    /// The UI surface could not produce a row for this session.
    Surface(SurfaceError),
}

impl fmt::Display for UpsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertError::ControllerInactive(tab_id) => {
                write!(f, "controller for tab {tab_id} is not active")
            }
            UpsertError::Surface(err) => write!(f, "surface rejected session row: {err}"),
        }
    }
}

impl std::error::Error for UpsertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpsertError::Surface(err) => Some(err),
            UpsertError::ControllerInactive(_) => None,
        }
    }
}

impl From<SurfaceError> for UpsertError {
    fn from(err: SurfaceError) -> Self {
        UpsertError::Surface(err)
    }
}

/// One tracked session: collaborator handles plus poll state.
pub(crate) struct SessionEntry {
    pub(crate) controller: Arc<dyn MediaController>,
    pub(crate) source: Arc<dyn TabSource>,
    pub(crate) row: Arc<dyn SessionRow>,
    /// Detach token for the entry's controller subscription.
    listener: ListenerToken,
    /// At most one live poll worker per entry.
    poller: Option<PollerHandle>,
    /// Bumped on every poller restart; ticks from superseded workers
    /// compare against it and stop without touching the row.
    poll_generation: u64,
    /// Latest authoritative duration, used to resolve seek commits.
    pub(crate) last_duration: Option<f64>,
}

#[derive(Default)]
struct RegistryInner {
    by_tab: HashMap<TabId, SessionEntry>,
    by_controller: HashMap<ControllerId, TabId>,
}

/// Outcome of one poll tick.
pub(crate) enum PollTick {
    Continue,
    Stop,
}

/// Registry of active sessions, shared between the engine, the event
/// listener, and the poll workers.
pub struct SessionRegistry {
    surface: Arc<dyn ControlSurface>,
    pip: Arc<dyn PipLauncher>,
    inner: Mutex<RegistryInner>,
}

impl SessionRegistry {
    pub fn new(surface: Arc<dyn ControlSurface>, pip: Arc<dyn PipLauncher>) -> Self {
        Self {
            surface,
            pip,
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Number of registered sessions.
    pub fn len(&self) -> usize {
        self.lock().by_tab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.lock().by_tab.contains_key(&tab_id)
    }

    pub(crate) fn pip(&self) -> &Arc<dyn PipLauncher> {
        &self.pip
    }

    /// Resolve the tab owning `controller_id`, if any.
    pub(crate) fn tab_for_controller(&self, controller_id: ControllerId) -> Option<TabId> {
        self.lock().by_controller.get(&controller_id).copied()
    }

    /// Register a session or refresh an existing one in place.
    ///
    /// Re-activation of a known tab never duplicates UI or listeners.
    /// When a recycled tab id arrives bound to a different controller,
    /// the entry is rebound: the old subscription detaches, the poller
    /// resets, and the existing row is reused.
    pub fn upsert(
        &self,
        controller: Arc<dyn MediaController>,
        source: Arc<dyn TabSource>,
        sink: Arc<dyn ControllerEventSink>,
    ) -> Result<(), UpsertError> {
        let tab_id = source.tab_id();
        if !controller.is_active() {
            return Err(UpsertError::ControllerInactive(tab_id));
        }

        let session_count = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            if inner.by_tab.contains_key(&tab_id) {
                let mut stale_controller = None;
                if let Some(entry) = inner.by_tab.get_mut(&tab_id) {
                    if entry.controller.id() != controller.id() {
                        stale_controller = Some(entry.controller.id());
                        entry.controller.remove_listener(entry.listener);
                        entry.poller = None;
                        entry.poll_generation = entry.poll_generation.wrapping_add(1);
                        entry.last_duration = None;
                        entry.listener = controller.add_listener(Arc::clone(&sink));
                        entry.controller = Arc::clone(&controller);
                        entry.source = Arc::clone(&source);
                        tracing::info!(
                            tab_id = %tab_id,
                            controller_id = %controller.id(),
                            "rebound recycled tab to a new controller"
                        );
                    }
                    Self::refresh_entry(entry, self.pip.as_ref());
                }
                if let Some(old_id) = stale_controller {
                    if inner.by_controller.get(&old_id) == Some(&tab_id) {
                        inner.by_controller.remove(&old_id);
                    }
                    inner.by_controller.insert(controller.id(), tab_id);
                }
            } else {
                let row = self.surface.create_row(tab_id)?;
                let listener = controller.add_listener(Arc::clone(&sink));
                inner.by_controller.insert(controller.id(), tab_id);
                let entry = SessionEntry {
                    controller,
                    source,
                    row,
                    listener,
                    poller: None,
                    poll_generation: 0,
                    last_duration: None,
                };
                Self::refresh_entry(&entry, self.pip.as_ref());
                inner.by_tab.insert(tab_id, entry);
                tracing::info!(
                    tab_id = %tab_id,
                    sessions = inner.by_tab.len(),
                    "media session registered"
                );
            }
            inner.by_tab.len()
        };
        visibility::sync(self.surface.as_ref(), session_count);
        Ok(())
    }

    /// Remove a session and tear down its listener, poller, and row.
    ///
    /// No-op when the tab is not registered, so a deactivation event
    /// racing a tab-closed notification stays harmless. Listeners are
    /// detached before the row is discarded, even when the removal was
    /// triggered from inside the controller's own event dispatch.
    pub fn remove(&self, tab_id: TabId) {
        let (entry, remaining) = {
            let mut guard = self.lock();
            let inner = &mut *guard;
            let Some(entry) = inner.by_tab.remove(&tab_id) else {
                return;
            };
            let controller_id = entry.controller.id();
            if inner.by_controller.get(&controller_id) == Some(&tab_id) {
                inner.by_controller.remove(&controller_id);
            }
            (entry, inner.by_tab.len())
        };
        entry.controller.remove_listener(entry.listener);
        // Dropping the entry stops its poll worker; a tick already racing
        // the lock re-checks presence before touching the row.
        drop(entry);
        self.surface.remove_row(tab_id);
        visibility::sync(self.surface.as_ref(), remaining);
        tracing::info!(tab_id = %tab_id, sessions = remaining, "media session removed");
    }

    /// Remove every session. Used at engine teardown.
    pub fn clear(&self) {
        let tabs: Vec<TabId> = self.lock().by_tab.keys().copied().collect();
        for tab_id in tabs {
            self.remove(tab_id);
        }
    }

    /// Run `f` against the entry for `tab_id`, if present.
    pub(crate) fn with_entry<R>(
        &self,
        tab_id: TabId,
        f: impl FnOnce(&mut SessionEntry) -> R,
    ) -> Option<R> {
        self.lock().by_tab.get_mut(&tab_id).map(f)
    }

    /// Run `f` against the entry owning `controller_id`, if present.
    ///
    /// Unknown controller ids are a silent no-op; stale events from a
    /// just-removed session land here.
    pub(crate) fn with_controller_entry<R>(
        &self,
        controller_id: ControllerId,
        f: impl FnOnce(&mut SessionEntry) -> R,
    ) -> Option<R> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(&tab_id) = inner.by_controller.get(&controller_id) else {
            tracing::trace!(controller_id = %controller_id, "event for unknown controller ignored");
            return None;
        };
        inner.by_tab.get_mut(&tab_id).map(f)
    }

    /// Authoritative position report: reseed the seekbar and restart the
    /// entry's poll worker with the new baseline.
    pub(crate) fn position_changed(
        self: &Arc<Self>,
        controller_id: ControllerId,
        state: PositionState,
        interval: Duration,
    ) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(&tab_id) = inner.by_controller.get(&controller_id) else {
            tracing::trace!(controller_id = %controller_id, "position report for unknown controller ignored");
            return;
        };
        let Some(entry) = inner.by_tab.get_mut(&tab_id) else {
            return;
        };
        entry.last_duration = (state.duration.is_finite() && state.duration > 0.0)
            .then_some(state.duration);
        entry.row.set_seek_range(state.duration);
        entry.row.set_seek_fraction(state.fraction());
        entry.poll_generation = entry.poll_generation.wrapping_add(1);
        // Replacing the handle stops any previous worker for this entry.
        entry.poller = Some(poller::spawn(
            Arc::downgrade(self),
            tab_id,
            entry.poll_generation,
            state,
            interval,
        ));
        tracing::debug!(
            tab_id = %tab_id,
            position = state.position,
            duration = state.duration,
            "position resync"
        );
    }

    /// Advance one poll tick for `tab_id`.
    ///
    /// Stops the worker when the entry is gone or superseded. When the
    /// controller is no longer playing, the stored handle is cleared and
    /// the worker terminates itself rather than waiting for an external
    /// stop signal.
    pub(crate) fn poll_tick(
        &self,
        tab_id: TabId,
        generation: u64,
        state: &mut PositionState,
        dt: f64,
    ) -> PollTick {
        let mut guard = self.lock();
        let Some(entry) = guard.by_tab.get_mut(&tab_id) else {
            return PollTick::Stop;
        };
        if entry.poll_generation != generation {
            return PollTick::Stop;
        }
        if !entry.controller.is_playing() {
            entry.poller = None;
            return PollTick::Stop;
        }
        state.position += dt;
        entry.row.set_seek_fraction(state.fraction());
        PollTick::Continue
    }

    /// Push the controller's current state into the entry's row.
    fn refresh_entry(entry: &SessionEntry, pip: &dyn PipLauncher) {
        entry.row.set_playing(entry.controller.is_playing());
        entry.row.set_metadata(&entry.controller.metadata());
        entry
            .row
            .set_source_info(entry.source.icon_url(), entry.source.host());
        apply_key_gating(entry.row.as_ref(), &entry.controller.supported_keys());
        entry
            .row
            .set_can_pip(pip.eligible_video_count(entry.source.as_ref()) > 0);
    }
}

/// Enable exactly the capability buttons present in `keys`.
pub(crate) fn apply_key_gating(row: &dyn SessionRow, keys: &[MediaKey]) {
    for key in MediaKey::ALL {
        row.set_key_enabled(key, keys.contains(&key));
    }
}

#[cfg(test)]
impl SessionRegistry {
    pub(crate) fn poller_active(&self, tab_id: TabId) -> bool {
        self.lock()
            .by_tab
            .get(&tab_id)
            .map(|entry| entry.poller.is_some())
            .unwrap_or(false)
    }

    pub(crate) fn poll_generation(&self, tab_id: TabId) -> Option<u64> {
        self.lock().by_tab.get(&tab_id).map(|entry| entry.poll_generation)
    }
}
