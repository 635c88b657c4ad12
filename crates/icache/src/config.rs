/// Configuration for a [`crate::Cache`]'s ring queue.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Number of queue slots. The original `probe_icache` hardcodes this as
    /// `PROBE_IQUEUE_CAPACITY`; here it is a deployment-tunable knob rather
    /// than a compile-time constant.
    pub capacity: usize,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero — a zero-capacity queue can never hold
    /// an entry, making `submit` and `barrier` block forever.
    pub const fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        Self { capacity }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

/// A small queue for low-memory or tightly-bounded-backpressure deployments.
pub const SMALL_CONFIG: Config = Config::new(16);

/// A large queue for high-throughput producers that should rarely block.
pub const HIGH_THROUGHPUT_CONFIG: Config = Config::new(8192);
