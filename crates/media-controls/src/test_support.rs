//! Shared test doubles for the collaborator traits.
//!
//! The mocks record every call so tests assert on observable effects
//! (commands sent, row attributes written) instead of internals.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use media_controls_types::{ControllerId, MediaKey, MediaMetadata, TabId};

use crate::controller::{
    ControllerEvent, ControllerEventSink, ListenerToken, MediaController, PipLauncher, TabSource,
};
use crate::surface::{ControlSurface, SessionRow, SurfaceError};

/// A command the engine issued against a controller, in issue order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Cmd {
    Play,
    Pause,
    SeekTo(f64),
    SeekForward(f64),
    SeekBackward(f64),
    PreviousTrack,
    NextTrack,
    Focus,
}

#[derive(Default)]
struct ControllerState {
    playing: bool,
    keys: Vec<MediaKey>,
    metadata: MediaMetadata,
    commands: Vec<Cmd>,
    listeners: HashMap<ListenerToken, Arc<dyn ControllerEventSink>>,
}

/// Scriptable [`MediaController`].
pub(crate) struct MockController {
    id: ControllerId,
    active: AtomicBool,
    next_token: AtomicU64,
    state: Mutex<ControllerState>,
}

impl MockController {
    pub(crate) fn new(id: u64) -> Arc<Self> {
        Arc::new(Self {
            id: ControllerId(id),
            active: AtomicBool::new(true),
            next_token: AtomicU64::new(1),
            state: Mutex::new(ControllerState::default()),
        })
    }

    pub(crate) fn id(&self) -> ControllerId {
        self.id
    }

    pub(crate) fn clone_dyn(self: &Arc<Self>) -> Arc<dyn MediaController> {
        Arc::clone(self) as Arc<dyn MediaController>
    }

    pub(crate) fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub(crate) fn set_playing(&self, playing: bool) {
        self.state.lock().unwrap().playing = playing;
    }

    pub(crate) fn set_keys(&self, keys: &[MediaKey]) {
        self.state.lock().unwrap().keys = keys.to_vec();
    }

    pub(crate) fn set_metadata(&self, title: &str, artist: &str) {
        let mut state = self.state.lock().unwrap();
        state.metadata.title = title.to_string();
        state.metadata.artist = artist.to_string();
    }

    pub(crate) fn commands(&self) -> Vec<Cmd> {
        self.state.lock().unwrap().commands.clone()
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }

    /// Deliver `event` to every attached listener.
    ///
    /// Listeners are snapshotted before dispatch so a handler that
    /// detaches itself (deactivation) never deadlocks on the mock's own
    /// lock.
    pub(crate) fn emit(&self, event: ControllerEvent) {
        let listeners: Vec<Arc<dyn ControllerEventSink>> = {
            let state = self.state.lock().unwrap();
            state.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener.handle_event(self.id, event.clone());
        }
    }

    fn push(&self, cmd: Cmd) {
        self.state.lock().unwrap().commands.push(cmd);
    }
}

impl MediaController for MockController {
    fn id(&self) -> ControllerId {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn supported_keys(&self) -> Vec<MediaKey> {
        self.state.lock().unwrap().keys.clone()
    }

    fn metadata(&self) -> MediaMetadata {
        self.state.lock().unwrap().metadata.clone()
    }

    fn play(&self) {
        self.push(Cmd::Play);
    }

    fn pause(&self) {
        self.push(Cmd::Pause);
    }

    fn seek_to(&self, position: f64) {
        self.push(Cmd::SeekTo(position));
    }

    fn seek_forward(&self, offset: f64) {
        self.push(Cmd::SeekForward(offset));
    }

    fn seek_backward(&self, offset: f64) {
        self.push(Cmd::SeekBackward(offset));
    }

    fn previous_track(&self) {
        self.push(Cmd::PreviousTrack);
    }

    fn next_track(&self) {
        self.push(Cmd::NextTrack);
    }

    fn focus(&self) {
        self.push(Cmd::Focus);
    }

    fn add_listener(&self, sink: Arc<dyn ControllerEventSink>) -> ListenerToken {
        let token = ListenerToken(self.next_token.fetch_add(1, Ordering::SeqCst));
        self.state.lock().unwrap().listeners.insert(token, sink);
        token
    }

    fn remove_listener(&self, token: ListenerToken) {
        self.state.lock().unwrap().listeners.remove(&token);
    }
}

/// Scriptable [`TabSource`].
pub(crate) struct MockSource {
    tab_id: TabId,
    host: Mutex<Option<String>>,
}

impl MockSource {
    pub(crate) fn new(tab_id: u64) -> Arc<Self> {
        Arc::new(Self {
            tab_id: TabId(tab_id),
            host: Mutex::new(None),
        })
    }

    pub(crate) fn clone_dyn(self: &Arc<Self>) -> Arc<dyn TabSource> {
        Arc::clone(self) as Arc<dyn TabSource>
    }

    pub(crate) fn with_host(self: Arc<Self>, host: &str) -> Arc<Self> {
        *self.host.lock().unwrap() = Some(host.to_string());
        self
    }
}

impl TabSource for MockSource {
    fn tab_id(&self) -> TabId {
        self.tab_id
    }

    fn icon_url(&self) -> Option<String> {
        self.host
            .lock()
            .unwrap()
            .as_ref()
            .map(|host| format!("https://{host}/favicon.ico"))
    }

    fn host(&self) -> Option<String> {
        self.host.lock().unwrap().clone()
    }
}

/// [`PipLauncher`] with a fixed eligible-stream count.
pub(crate) struct MockPip {
    eligible: usize,
    toggles: Mutex<Vec<TabId>>,
}

impl MockPip {
    pub(crate) fn new(eligible: usize) -> Arc<Self> {
        Arc::new(Self {
            eligible,
            toggles: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn toggles(&self) -> Vec<TabId> {
        self.toggles.lock().unwrap().clone()
    }
}

impl PipLauncher for MockPip {
    fn eligible_video_count(&self, _source: &dyn TabSource) -> usize {
        self.eligible
    }

    fn request_toggle(&self, source: &dyn TabSource) {
        self.toggles.lock().unwrap().push(source.tab_id());
    }
}

#[derive(Default)]
struct RowState {
    playing: Option<bool>,
    seek_duration: Option<f64>,
    fractions: Vec<f64>,
    keys: HashMap<MediaKey, bool>,
    metadata: Option<MediaMetadata>,
    icon_url: Option<String>,
    host: Option<String>,
    pip_active: Option<bool>,
    can_pip: Option<bool>,
}

/// Recording [`SessionRow`]. Every setter stores its latest value;
/// seek fractions keep full history so tick tests can count writes.
#[derive(Default)]
pub(crate) struct MockRow {
    state: Mutex<RowState>,
}

impl MockRow {
    pub(crate) fn playing(&self) -> Option<bool> {
        self.state.lock().unwrap().playing
    }

    pub(crate) fn seek_duration(&self) -> Option<f64> {
        self.state.lock().unwrap().seek_duration
    }

    pub(crate) fn fractions(&self) -> Vec<f64> {
        self.state.lock().unwrap().fractions.clone()
    }

    pub(crate) fn last_fraction(&self) -> Option<f64> {
        self.state.lock().unwrap().fractions.last().copied()
    }

    pub(crate) fn key_enabled(&self, key: MediaKey) -> Option<bool> {
        self.state.lock().unwrap().keys.get(&key).copied()
    }

    pub(crate) fn metadata_title(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .metadata
            .as_ref()
            .map(|m| m.title.clone())
    }

    pub(crate) fn metadata_artist(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .metadata
            .as_ref()
            .map(|m| m.artist.clone())
    }

    pub(crate) fn icon_url(&self) -> Option<String> {
        self.state.lock().unwrap().icon_url.clone()
    }

    pub(crate) fn host(&self) -> Option<String> {
        self.state.lock().unwrap().host.clone()
    }

    pub(crate) fn pip_active(&self) -> Option<bool> {
        self.state.lock().unwrap().pip_active
    }

    pub(crate) fn can_pip(&self) -> Option<bool> {
        self.state.lock().unwrap().can_pip
    }
}

impl SessionRow for MockRow {
    fn set_playing(&self, playing: bool) {
        self.state.lock().unwrap().playing = Some(playing);
    }

    fn set_seek_range(&self, duration: f64) {
        self.state.lock().unwrap().seek_duration = Some(duration);
    }

    fn set_seek_fraction(&self, fraction: f64) {
        self.state.lock().unwrap().fractions.push(fraction);
    }

    fn set_key_enabled(&self, key: MediaKey, enabled: bool) {
        self.state.lock().unwrap().keys.insert(key, enabled);
    }

    fn set_metadata(&self, metadata: &MediaMetadata) {
        self.state.lock().unwrap().metadata = Some(metadata.clone());
    }

    fn set_source_info(&self, icon_url: Option<String>, host: Option<String>) {
        let mut state = self.state.lock().unwrap();
        state.icon_url = icon_url;
        state.host = host;
    }

    fn set_pip_active(&self, active: bool) {
        self.state.lock().unwrap().pip_active = Some(active);
    }

    fn set_can_pip(&self, can_pip: bool) {
        self.state.lock().unwrap().can_pip = Some(can_pip);
    }
}

/// Recording [`ControlSurface`].
pub(crate) struct MockSurface {
    missing: Option<String>,
    fail_rows: AtomicBool,
    rows_created: AtomicUsize,
    toolbar: AtomicBool,
    rows: Mutex<HashMap<TabId, Arc<MockRow>>>,
}

impl MockSurface {
    /// A surface whose template resources are all present.
    pub(crate) fn ready() -> Arc<Self> {
        Arc::new(Self {
            missing: None,
            fail_rows: AtomicBool::new(false),
            rows_created: AtomicUsize::new(0),
            toolbar: AtomicBool::new(false),
            rows: Mutex::new(HashMap::new()),
        })
    }

    /// A surface missing the named template resource.
    pub(crate) fn not_ready(what: &str) -> Arc<Self> {
        Arc::new(Self {
            missing: Some(what.to_string()),
            fail_rows: AtomicBool::new(false),
            rows_created: AtomicUsize::new(0),
            toolbar: AtomicBool::new(false),
            rows: Mutex::new(HashMap::new()),
        })
    }

    /// Make subsequent row creation fail.
    pub(crate) fn fail_rows(&self, fail: bool) {
        self.fail_rows.store(fail, Ordering::SeqCst);
    }

    /// Rows currently present.
    pub(crate) fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    /// Rows ever created, including since-removed ones.
    pub(crate) fn rows_created(&self) -> usize {
        self.rows_created.load(Ordering::SeqCst)
    }

    pub(crate) fn toolbar_enabled(&self) -> bool {
        self.toolbar.load(Ordering::SeqCst)
    }

    pub(crate) fn row(&self, tab_id: TabId) -> Option<Arc<MockRow>> {
        self.rows.lock().unwrap().get(&tab_id).cloned()
    }
}

impl ControlSurface for MockSurface {
    fn ensure_ready(&self) -> Result<(), SurfaceError> {
        match &self.missing {
            Some(what) => Err(SurfaceError::MissingResources(what.clone())),
            None => Ok(()),
        }
    }

    fn create_row(&self, tab_id: TabId) -> Result<Arc<dyn SessionRow>, SurfaceError> {
        if self.fail_rows.load(Ordering::SeqCst) {
            return Err(SurfaceError::RowUnavailable(tab_id));
        }
        let row = Arc::new(MockRow::default());
        self.rows.lock().unwrap().insert(tab_id, Arc::clone(&row));
        self.rows_created.fetch_add(1, Ordering::SeqCst);
        Ok(row)
    }

    fn remove_row(&self, tab_id: TabId) {
        self.rows.lock().unwrap().remove(&tab_id);
    }

    fn set_toolbar_enabled(&self, enabled: bool) {
        self.toolbar.store(enabled, Ordering::SeqCst);
    }
}

/// Event sink that discards everything. For tests that drive the
/// registry directly.
pub(crate) struct NullSink;

impl NullSink {
    pub(crate) fn shared() -> Arc<dyn ControllerEventSink> {
        Arc::new(NullSink)
    }
}

impl ControllerEventSink for NullSink {
    fn handle_event(&self, _controller_id: ControllerId, _event: ControllerEvent) {}
}
