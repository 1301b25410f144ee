//! Collaborator traits for session controllers and tab sources.
//!
//! The engine commands controllers and observes their events but never
//! owns their lifecycle; hosts implement these traits over whatever the
//! real browser objects are.

use std::sync::Arc;

use media_controls_types::{ControllerId, MediaKey, MediaMetadata, PositionState, TabId};

/// Event payloads emitted by a media-session controller.
///
/// Events for one controller arrive in emission order; events across
/// controllers may interleave arbitrarily. Every delivery carries the
/// emitting controller's id so handlers match on identity, never on
/// order.
#[derive(Clone, Debug, PartialEq)]
pub enum ControllerEvent {
    /// Authoritative position report (emitted on seek or track change).
    PositionState(PositionState),
    /// Playing/paused flipped; the current state is read back from the
    /// controller.
    PlaybackState,
    /// The supported action set changed; the current set is read back
    /// from the controller.
    SupportedKeys,
    /// The metadata snapshot changed; the current snapshot is read back
    /// from the controller.
    Metadata,
    /// The session ended on the controller side.
    Deactivated,
    /// Floating/picture-in-picture presentation toggled.
    PipMode {
        /// True while the session is shown in a floating presentation.
        active: bool,
    },
}

/// Receiver half of a controller subscription.
pub trait ControllerEventSink: Send + Sync {
    /// Handle one controller event.
    fn handle_event(&self, controller_id: ControllerId, event: ControllerEvent);
}

/// Token returned by [`MediaController::add_listener`].
///
/// Detachment is a direct token removal rather than a closure-identity
/// comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(pub u64);

/// Command-and-state surface of one media session.
pub trait MediaController: Send + Sync {
    /// Stable controller id, identical to the id carried in its events.
    fn id(&self) -> ControllerId;
    /// False once the underlying session has gone away.
    fn is_active(&self) -> bool;
    /// Current playing/paused state.
    fn is_playing(&self) -> bool;
    /// Currently supported action keys.
    fn supported_keys(&self) -> Vec<MediaKey>;
    /// Latest metadata snapshot.
    fn metadata(&self) -> MediaMetadata;

    fn play(&self);
    fn pause(&self);
    /// Seek to an absolute position in seconds.
    fn seek_to(&self, position: f64);
    /// Seek forward by `offset` seconds.
    fn seek_forward(&self, offset: f64);
    /// Seek backward by `offset` seconds.
    fn seek_backward(&self, offset: f64);
    fn previous_track(&self);
    fn next_track(&self);
    /// Bring the owning tab to the foreground.
    fn focus(&self);

    /// Attach an event listener; events flow until the token is removed.
    fn add_listener(&self, sink: Arc<dyn ControllerEventSink>) -> ListenerToken;
    /// Detach a previously attached listener. Unknown tokens are ignored.
    fn remove_listener(&self, token: ListenerToken);
}

/// Handle to the browser tab that owns a session.
pub trait TabSource: Send + Sync {
    /// Stable tab identity; the registry's primary key.
    fn tab_id(&self) -> TabId;
    /// Favicon URL, if known.
    fn icon_url(&self) -> Option<String>;
    /// Host name of the page currently playing.
    fn host(&self) -> Option<String>;
}

/// Picture-in-picture eligibility and launch collaborator.
pub trait PipLauncher: Send + Sync {
    /// Number of candidate streams that could be presented floating.
    fn eligible_video_count(&self, source: &dyn TabSource) -> usize;
    /// Ask the host to toggle the floating presentation for this source.
    fn request_toggle(&self, source: &dyn TabSource);
}
