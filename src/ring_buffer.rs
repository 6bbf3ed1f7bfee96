/// Fixed-capacity FIFO of per-window values with a running sum.
///
/// Pushing into a full buffer evicts the oldest value. The most recently
/// pushed slot can be overwritten in place while its window is still open.
#[derive(Clone, Debug)]
pub(crate) struct RingBuffer {
    buffer: Vec<f64>,
    head: usize,
    tail: usize,
    len: usize,
    capacity: usize,
    /// Maintained incrementally via add/subtract, may accumulate FP rounding
    /// drift over very long runs.
    sum: f64,
}

impl RingBuffer {
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            head: 0,
            tail: 0,
            len: 0,
            capacity,
            sum: 0.0,
        }
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub(crate) fn push(&mut self, value: f64) -> Option<f64> {
        self.sum += value;

        if self.is_full() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;
            self.sum -= old;

            self.tail = self.head;
            self.head += 1;
            if self.head == self.capacity {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.tail = self.len;
            self.len += 1;

            None
        }
    }

    /// Overwrites the most recently pushed value. Must not be called on an
    /// empty buffer.
    #[inline]
    pub(crate) fn replace(&mut self, value: f64) -> f64 {
        debug_assert!(!self.is_empty(), "replace on empty ring buffer");

        let old = self.buffer[self.tail];

        self.buffer[self.tail] = value;
        self.sum += value - old;

        old
    }

    /// Arithmetic mean of the buffered values, `None` when empty.
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn mean(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.sum / self.len as f64)
    }
}
