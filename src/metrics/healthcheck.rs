use std::fmt;

use parking_lot::Mutex;

type Probe = Box<dyn Fn(&Healthcheck) + Send + Sync>;

/// A user-supplied probe plus the error from its latest run.
///
/// The probe reports its verdict by calling [`healthy`](Self::healthy) or
/// [`unhealthy`](Self::unhealthy) on the healthcheck it is handed.
pub struct Healthcheck {
    probe: Probe,
    error: Mutex<Option<String>>,
}

impl Healthcheck {
    pub fn new<F>(probe: F) -> Self
    where
        F: Fn(&Healthcheck) + Send + Sync + 'static,
    {
        Self {
            probe: Box::new(probe),
            error: Mutex::new(None),
        }
    }

    /// Run the probe synchronously on the calling thread.
    pub fn check(&self) {
        (self.probe)(self);
    }

    /// Latest error, `None` before the first check or while healthy.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    pub fn healthy(&self) {
        *self.error.lock() = None;
    }

    pub fn unhealthy(&self, err: impl fmt::Display) {
        *self.error.lock() = Some(err.to_string());
    }
}

impl fmt::Debug for Healthcheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Healthcheck")
            .field("error", &*self.error.lock())
            .finish_non_exhaustive()
    }
}
