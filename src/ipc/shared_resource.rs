use parking_lot::Mutex;
use std::sync::Arc;

use crate::calibration::RomBounds;

/// Settings a calibration pass reads from and publishes into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionState {
    pub bounds: RomBounds,
    pub inverted: bool,
    pub prevent_filtering: bool,
}

// Shared session settings (bounds are replaced as a whole, never field by field)
#[derive(Clone)]
pub struct SessionSettings {
    data: Arc<Mutex<SessionState>>,
}

impl SessionSettings {
    pub fn new(state: SessionState) -> Self {
        Self { data: Arc::new(Mutex::new(state)) }
    }

    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SessionState),
    {
        let mut state = self.data.lock();
        f(&mut *state);
    }

    pub fn get(&self) -> SessionState {
        *self.data.lock()
    }

    pub fn publish_bounds(&self, bounds: RomBounds) {
        self.update(|state| state.bounds = bounds);
    }
}
