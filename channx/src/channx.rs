//! The self-adaptive channel handle.

use std::thread;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use tracing::debug;
use zkit_buffer::RingBuffer;

use crate::config::Config;
use crate::dispatch::Dispatcher;

/// A self-adaptive channel with a ring buffer.
///
/// `ChannX<T>` pairs a bounded input channel with a bounded output channel
/// and moves values between them on a dedicated dispatch thread. Values the
/// output cannot take yet are parked in a ring buffer that grows with the
/// backlog (up to [`Config::max_buffer_size`]) and shrinks back to its
/// initial size once drained, so a slow consumer does not stall a fast
/// producer. With an unbounded buffer it behaves as an unbounded channel.
///
/// # Semantics
///
/// - **Send**: `input().send()` blocks only while the input channel is full
/// - **Receive**: `output().recv()` yields values in the order they were sent
/// - **Close**: [`close`](ChannX::close) flushes everything sent so far to
///   the output and then disconnects it. With
///   [`Config::drop_closed_buffer_data`] set, pending data is dropped
///   instead, except what already sits in the output channel.
///
/// Dropping the handle closes the channel.
///
/// # Example
///
/// ```
/// use zkit_channx::{ChannX, Config};
///
/// let ch = ChannX::new(Config::new().with_init_buffer_size(4));
///
/// // No consumer yet: values pile up in the ring buffer.
/// for i in 0..100 {
///     ch.input().send(i).unwrap();
/// }
/// ch.close();
///
/// let got: Vec<i32> = ch.output().iter().collect();
/// assert_eq!(got, (0..100).collect::<Vec<_>>());
/// ```
pub struct ChannX<T> {
    input: Sender<T>,
    output: Receiver<T>,
    // Dropping the sender is the close signal.
    close: Mutex<Option<Sender<()>>>,
}

impl<T: Send + 'static> ChannX<T> {
    /// Creates a channel and starts its dispatch thread.
    pub fn new(config: Config) -> Self {
        let (in_tx, in_rx) = channel::bounded(config.in_chan_size);
        let (out_tx, out_rx) = channel::bounded(config.out_chan_size);
        let (close_tx, close_rx) = channel::bounded(0);

        let buffer = RingBuffer::new(config.init_buffer_size, config.max_buffer_size);
        let dispatcher = Dispatcher::new(in_rx, out_tx, close_rx, buffer, config.drop_closed_buffer_data);
        thread::spawn(move || dispatcher.run());

        ChannX {
            input: in_tx,
            output: out_rx,
            close: Mutex::new(Some(close_tx)),
        }
    }
}

impl<T: Send + 'static> Default for ChannX<T> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<T> ChannX<T> {
    /// Returns the producer side of the channel.
    ///
    /// Clone the sender to share it between producers. After close, sends
    /// are still accepted and delivered while the flush runs, and fail with
    /// `SendError` once it has finished. A send that lands after the final
    /// drain found the input empty, but before the input was released, is
    /// accepted and then dropped.
    pub fn input(&self) -> &Sender<T> {
        &self.input
    }

    /// Returns the consumer side of the channel.
    ///
    /// Clone the receiver to share it between consumers. Receiving reports
    /// disconnection after close, once every flushed value was taken.
    pub fn output(&self) -> &Receiver<T> {
        &self.output
    }

    /// Closes the channel. Safe to call any number of times from any thread.
    pub fn close(&self) {
        if let Some(signal) = self.close.lock().take() {
            drop(signal);
            debug!("channx: close requested");
        }
    }

    /// Returns true once [`close`](ChannX::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.close.lock().is_none()
    }
}

impl<T> Drop for ChannX<T> {
    fn drop(&mut self) {
        self.close();
    }
}
