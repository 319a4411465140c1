//! Self-adaptive ring buffer implementation.

/// Capacity at which growth switches from doubling to ~1.25x.
pub const GROW_THRESHOLD: usize = 1024;

// Largest capacity a growth step may produce.
const MAX_CAP: usize = isize::MAX as usize;

/// A growable circular buffer.
///
/// `RingBuffer<T>` starts with `init_size` slots and grows whenever a
/// [`put`](RingBuffer::put) fills the last free slot, up to `max_size`
/// (`0` means unbounded). It never shrinks on its own: the owner calls
/// [`reset`](RingBuffer::reset) once [`need_reset`](RingBuffer::need_reset)
/// reports that the buffer is empty and larger than its baseline.
///
/// The buffer has no interior synchronization. Every mutator takes
/// `&mut self`, so it is meant to be owned by exactly one thread.
///
/// # Semantics
///
/// - **Put**: Never blocks, grows on demand, rejects only when capped and full
/// - **Pop**: Returns the oldest value, `None` when empty
/// - **Reset**: Shrinks back to `init_size`, discarding anything still queued
///
/// # Example
///
/// ```
/// use zkit_buffer::RingBuffer;
///
/// let mut buf = RingBuffer::new(2, 5);
/// for i in 0..5 {
///     assert!(buf.put(i).is_ok());
/// }
///
/// // Capped at 5 and full: the value is handed back.
/// assert_eq!(buf.put(5), Err(5));
/// assert!(buf.is_full());
///
/// assert_eq!(buf.pop(), Some(0));
/// assert!(!buf.is_full());
/// ```
#[derive(Debug)]
pub struct RingBuffer<T> {
    buf: Vec<Option<T>>,
    init_size: usize,
    max_size: usize,
    read: usize,
    write: usize,
    // read == write is ambiguous; this marks the full case.
    full: bool,
}

impl<T> RingBuffer<T> {
    /// Creates a ring buffer with `init_size` slots that may grow up to
    /// `max_size` slots.
    ///
    /// An `init_size` of `0` is treated as `1`. A `max_size` of `0` means
    /// the buffer grows without limit. A bounded buffer never starts larger
    /// than its `max_size`.
    pub fn new(init_size: usize, max_size: usize) -> Self {
        let mut init_size = init_size.max(1);
        if max_size > 0 && init_size > max_size {
            init_size = max_size;
        }

        RingBuffer {
            buf: empty_slots(init_size),
            init_size,
            max_size,
            read: 0,
            write: 0,
            full: false,
        }
    }

    /// Inserts a value at the tail.
    ///
    /// Returns `Err(value)` without touching the buffer when it is full and
    /// already at `max_size`. When the insert occupies the last free slot
    /// the buffer grows; if it cannot, it is marked full and the insert
    /// still succeeds.
    pub fn put(&mut self, value: T) -> Result<(), T> {
        if self.full {
            return Err(value);
        }

        self.buf[self.write] = Some(value);
        self.write += 1;
        if self.write == self.buf.len() {
            self.write = 0;
        }

        if self.write == self.read && !self.grow() {
            self.full = true;
        }
        Ok(())
    }

    /// Returns a reference to the oldest value without removing it.
    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.buf[self.read].as_ref()
    }

    /// Removes and returns the oldest value.
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = self.buf[self.read].take();
        self.read += 1;
        if self.read == self.buf.len() {
            self.read = 0;
        }
        self.full = false;
        value
    }

    /// Returns the number of queued values.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        if self.write > self.read {
            return self.write - self.read;
        }
        self.buf.len() - self.read + self.write
    }

    /// Returns the current number of slots.
    pub fn cap(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no values are queued.
    pub fn is_empty(&self) -> bool {
        !self.full && self.read == self.write
    }

    /// Returns true if the buffer is at `max_size` and every slot is taken.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Returns true when the buffer is empty and has grown past its
    /// initial size, i.e. a [`reset`](RingBuffer::reset) would free memory.
    pub fn need_reset(&self) -> bool {
        self.is_empty() && self.buf.len() > self.init_size
    }

    /// Shrinks the buffer back to its initial size.
    ///
    /// Only call this on an empty buffer: any values still queued are
    /// dropped without notice.
    pub fn reset(&mut self) {
        self.buf = empty_slots(self.init_size);
        self.read = 0;
        self.write = 0;
        self.full = false;
    }

    // Reallocates into a larger store, laying the queued values out from
    // index 0. Only called when read == write after a put, so every slot
    // is occupied. Returns false when no larger capacity is allowed.
    fn grow(&mut self) -> bool {
        let size = self.buf.len();
        let new_cap = grow_cap(size, self.max_size);
        if new_cap <= size {
            return false;
        }

        let mut head = std::mem::take(&mut self.buf);
        let tail = head.split_off(self.read);

        let mut buf = Vec::with_capacity(new_cap);
        buf.extend(tail);
        buf.extend(head);
        buf.resize_with(new_cap, || None);

        self.buf = buf;
        self.read = 0;
        self.write = size;
        true
    }
}

/// Computes the next capacity for a buffer of `size` slots.
///
/// Doubles below [`GROW_THRESHOLD`], then grows by
/// `(size + 3 * GROW_THRESHOLD) / 4`. Results past `isize::MAX` saturate.
/// With a non-zero `max_size` the result is clamped to it, and a buffer
/// already at or past `max_size` keeps its size.
pub fn grow_cap(size: usize, max_size: usize) -> usize {
    if max_size > 0 && size >= max_size {
        return size;
    }

    let grown = if size < GROW_THRESHOLD {
        size.checked_mul(2)
    } else {
        size.checked_add(3 * GROW_THRESHOLD)
            .and_then(|add| size.checked_add(add / 4))
    };
    let mut new_cap = match grown {
        Some(cap) if cap <= MAX_CAP => cap,
        _ => MAX_CAP,
    };

    if max_size > 0 && new_cap > max_size {
        new_cap = max_size;
    }
    new_cap
}

fn empty_slots<T>(n: usize) -> Vec<Option<T>> {
    let mut buf = Vec::with_capacity(n);
    buf.resize_with(n, || None);
    buf
}
