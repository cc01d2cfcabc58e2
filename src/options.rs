use std::time::Duration;

/// Configures per-attempt timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutorOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Total number of attempts, including the first one.
    pub max_attempts: usize,
    /// Constant delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 5_000,
            max_attempts: 3,
            retry_delay_ms: 2_000,
        }
    }
}

impl ExecutorOptions {
    /// Builds a descriptor for `url` from these options.
    pub fn descriptor(&self, url: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor::new(url)
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_max_attempts(self.max_attempts)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
    }
}

/// One GET to perform: where, how long each attempt may take, how many
/// attempts, and how long to wait between them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestDescriptor {
    url: String,
    timeout: Duration,
    max_attempts: usize,
    retry_delay: Duration,
}

impl RequestDescriptor {
    /// Creates a descriptor with the default options.
    pub fn new(url: impl Into<String>) -> Self {
        let defaults = ExecutorOptions::default();
        Self {
            url: url.into(),
            timeout: Duration::from_millis(defaults.timeout_ms),
            max_attempts: defaults.max_attempts,
            retry_delay: Duration::from_millis(defaults.retry_delay_ms),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the attempt budget. Zero is treated as one.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}
