//! Channel configuration.

use serde::{Deserialize, Serialize};

/// Default initial capacity of the ring buffer.
pub const DEFAULT_INIT_BUFFER_SIZE: usize = 2;

/// ChannX configuration.
///
/// All sizes are fixed once the channel is built. A zero channel size
/// makes that side a rendezvous channel, as with
/// `crossbeam::channel::bounded(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity of the input channel.
    pub in_chan_size: usize,
    /// Capacity of the output channel.
    pub out_chan_size: usize,
    /// Initial ring buffer capacity. Values of zero are coerced to 1.
    pub init_buffer_size: usize,
    /// Maximum ring buffer capacity; zero means unbounded.
    pub max_buffer_size: usize,
    /// Drop data still in the ring buffer and the input channel once the
    /// channel is closed. Data already in the output channel stays readable.
    pub drop_closed_buffer_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            in_chan_size: 0,
            out_chan_size: 0,
            init_buffer_size: DEFAULT_INIT_BUFFER_SIZE,
            max_buffer_size: 0,
            drop_closed_buffer_data: false,
        }
    }
}

impl Config {
    /// Create a config with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set input channel capacity.
    pub fn with_in_chan_size(mut self, size: usize) -> Self {
        self.in_chan_size = size;
        self
    }

    /// Set output channel capacity.
    pub fn with_out_chan_size(mut self, size: usize) -> Self {
        self.out_chan_size = size;
        self
    }

    /// Set the initial ring buffer capacity. Zero is ignored.
    pub fn with_init_buffer_size(mut self, size: usize) -> Self {
        if size > 0 {
            self.init_buffer_size = size;
        }
        self
    }

    /// Set the maximum ring buffer capacity. Zero means unbounded.
    pub fn with_max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// Drop buffered data after close instead of flushing it.
    pub fn with_drop_closed_buffer_data(mut self, drop: bool) -> Self {
        self.drop_closed_buffer_data = drop;
        self
    }
}
