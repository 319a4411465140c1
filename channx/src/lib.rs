//! Self-adaptive unbounded channel.
//!
//! [`ChannX<T>`] is a FIFO channel assembled from two bounded crossbeam
//! channels and a growable [`RingBuffer`](zkit_buffer::RingBuffer) in
//! between. A dispatch thread owns the ring buffer and is the only party
//! that reads the input or writes the output:
//!
//! ```text
//!  producers ──▶ input ──▶ [dispatcher + ring buffer] ──▶ output ──▶ consumers
//! ```
//!
//! While the ring buffer is empty, values go straight to the output when it
//! has room. Otherwise they queue in the ring buffer, which grows up to the
//! configured maximum. A capped, full buffer applies backpressure: the
//! dispatcher stops reading the input until a consumer takes a value.
//!
//! # Configuration
//!
//! ```
//! use zkit_channx::{ChannX, Config};
//!
//! let ch: ChannX<String> = ChannX::new(
//!     Config::new()
//!         .with_in_chan_size(16)
//!         .with_out_chan_size(16)
//!         .with_init_buffer_size(64)
//!         .with_max_buffer_size(4096),
//! );
//! ch.input().send("hello".to_string()).unwrap();
//! assert_eq!(ch.output().recv().unwrap(), "hello");
//! ```
//!
//! [`Config`] also derives serde's `Serialize`/`Deserialize`, so it can be
//! embedded in an application's config file.
//!
//! # Closing
//!
//! The input is never closed by the caller. [`ChannX::close`] (or dropping
//! the handle) tells the dispatcher to flush pending data and disconnect
//! the output.

mod channx;
mod config;
mod dispatch;

pub use channx::ChannX;
pub use config::{Config, DEFAULT_INIT_BUFFER_SIZE};
