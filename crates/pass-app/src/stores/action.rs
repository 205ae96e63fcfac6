use pass_core::BackendError;

/// Loading and error flags for one asynchronous operation.
///
/// The error stays visible until the next attempt of the same operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl ActionStatus {
    /// Mark a new attempt: loading, previous error cleared.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.loading = false;
    }

    /// Record `err` as display text, using `fallback` when it carries none.
    pub fn fail(&mut self, err: &BackendError, fallback: &str) {
        self.loading = false;
        self.error = Some(err.display_or(fallback));
    }
}
