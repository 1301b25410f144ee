//! Toolbar entry-point enablement.
//!
//! Pure derived state: the entry point is enabled exactly when at least
//! one session is registered. Re-evaluated synchronously after every
//! registry mutation; there is no storage beyond the registry's size.

use crate::surface::ControlSurface;

/// Entry-point enablement rule.
pub fn toolbar_enabled(session_count: usize) -> bool {
    session_count > 0
}

/// Push the current enablement to the surface.
pub(crate) fn sync(surface: &dyn ControlSurface, session_count: usize) {
    surface.set_toolbar_enabled(toolbar_enabled(session_count));
}
