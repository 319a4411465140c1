//! Self-adaptive ring buffer.
//!
//! [`RingBuffer<T>`] is a circular buffer that grows when it runs out of
//! slots and can be shrunk back to its initial size once drained. It is the
//! elastic storage behind `zkit-channx`'s unbounded channel, but works as a
//! plain single-owner FIFO queue as well.
//!
//! # Growth
//!
//! Growth follows the usual amortized policy for growable sequences: the
//! capacity doubles while it is below [`GROW_THRESHOLD`] slots and then grows
//! by roughly 1.25x. An optional maximum caps the capacity; once a capped
//! buffer is full, [`RingBuffer::put`] hands the value back.
//!
//! ```
//! use zkit_buffer::{grow_cap, RingBuffer, GROW_THRESHOLD};
//!
//! assert_eq!(grow_cap(100, 0), 200);
//! assert_eq!(grow_cap(4096, 0), 4096 + (4096 + 3 * GROW_THRESHOLD) / 4);
//! assert_eq!(grow_cap(100, 150), 150);
//!
//! let mut buf = RingBuffer::new(2, 0);
//! for i in 0..10 {
//!     buf.put(i).unwrap();
//! }
//! assert_eq!(buf.len(), 10);
//! assert!(buf.cap() >= 10);
//! ```
//!
//! # Shrinking
//!
//! The buffer never shrinks on its own. The owner checks
//! [`RingBuffer::need_reset`] after draining and calls [`RingBuffer::reset`]:
//!
//! ```
//! use zkit_buffer::RingBuffer;
//!
//! let mut buf = RingBuffer::new(2, 0);
//! for i in 0..8 {
//!     buf.put(i).unwrap();
//! }
//! while buf.pop().is_some() {}
//!
//! if buf.need_reset() {
//!     buf.reset();
//! }
//! assert_eq!(buf.cap(), 2);
//! ```
//!
//! # Thread Safety
//!
//! `RingBuffer<T>` has no internal locking. It is `Send` when `T` is, and all
//! mutation goes through `&mut self`, so sharing it across threads requires
//! the owner to serialize access.

mod ring_buffer;

pub use ring_buffer::{grow_cap, RingBuffer, GROW_THRESHOLD};
