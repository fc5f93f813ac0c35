pub mod setup_flow;
pub mod ui_state;

pub use setup_flow::{SetupEvent, SetupFlow};
pub use ui_state::{DashboardUiState, UiAction, apply};

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

/// In-memory holder of the dashboard UI state. Cloning shares it.
#[derive(Clone, Default)]
pub struct UiStore {
    state: Arc<RwLock<DashboardUiState>>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardUiState {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Applies `action` and returns the resulting state.
    pub fn dispatch(&self, action: UiAction) -> DashboardUiState {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        debug!(?action, "Applying UI action");
        *state = apply(std::mem::take(&mut *state), action);
        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_is_visible_to_clones() {
        let store = UiStore::new();
        let other = store.clone();

        store.dispatch(UiAction::MarkSetupModalSeen);

        assert!(other.snapshot().preferences.setup_modal_seen);
    }

    #[test]
    fn store_keeps_working_after_a_panicking_writer() {
        let store = UiStore::new();
        store.dispatch(UiAction::MarkSetupModalSeen);

        let holder = store.clone();
        let crashed = std::thread::spawn(move || {
            let _guard = holder.state.write().unwrap();
            panic!("worker died holding the lock");
        })
        .join();
        assert!(crashed.is_err());

        assert!(store.snapshot().preferences.setup_modal_seen);
        let state = store.dispatch(UiAction::Reset);
        assert!(state.preferences.setup_modal_seen);
    }
}
