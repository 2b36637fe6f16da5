use std::time::Duration;

use review::DEFAULT_MAX_BATCH_SIZE;

/// Overall timeout of a single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Quiet period a batch rating lookup waits for before it is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub debounce: Duration,
    pub max_batch_size: usize,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    pub fn debounce(mut self, value: Duration) -> Self {
        self.debounce = value;
        self
    }

    pub fn batch_size(mut self, value: usize) -> Self {
        self.max_batch_size = value;
        self
    }
}
