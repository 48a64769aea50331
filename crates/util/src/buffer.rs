// Buffer queue with availability notification.
//
// A producer (capture thread, network reader) pushes buffers into a
// `BufferSender`; consumers register a callback to learn that a new
// buffer is available and pop at their own pace. No semantics are
// attached to the byte block or its metadata beyond the typed slots
// below.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::geom::Rect;

/// Metadata slots that occur frequently alongside buffer data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaKey {
    /// Source bounds of the data, a [`Rect`].
    Bounds,
    /// Capture time in milliseconds, clock-relative.
    Timestamp,
    /// Mime-type-like content tag, e.g. `"raw"` or `"image/jpeg"`.
    MimeType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Rect(Rect),
    Millis(u64),
    Text(String),
}

/// Binary data block with associated metadata.
#[derive(Debug, Default)]
pub struct Buffer {
    data: Vec<u8>,
    meta: HashMap<MetaKey, MetaValue>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `data` without copying it.
    pub fn with_data(data: Vec<u8>) -> Self {
        Self { data, meta: HashMap::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn meta(&self, key: MetaKey) -> Option<&MetaValue> {
        self.meta.get(&key)
    }

    pub fn set_meta(&mut self, key: MetaKey, value: MetaValue) {
        self.meta.insert(key, value);
    }
}

type AvailableCallback = Arc<dyn Fn() + Send + Sync>;

/// Queue of buffers handed from a producer to its consumers.
///
/// An optional maximum length bounds the queue: when full, the oldest
/// buffers are dropped *before* the new one is enqueued, so a slow
/// consumer sees recent data rather than a growing backlog.
pub struct BufferSender {
    queue: Mutex<VecDeque<Arc<Buffer>>>,
    max_len: usize,
    callbacks: Mutex<Vec<AvailableCallback>>,
}

impl BufferSender {
    /// A sender without a queue limit.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// A sender that keeps at most `max_len` buffers (0 = unbounded).
    pub fn with_capacity(max_len: usize) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            max_len,
            callbacks: Mutex::new(Vec::new()),
        }
    }

    /// Registers a callback fired after each push. Callbacks run on
    /// the producer's thread, outside both internal locks, so a
    /// callback may pop, push or register further callbacks.
    pub fn on_available(&self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks.lock().unwrap().push(Arc::new(callback));
    }

    /// Enqueues a buffer, evicting the oldest entries first if the
    /// queue is at capacity, then notifies registered callbacks.
    pub fn push(&self, buffer: Buffer) {
        {
            let mut queue = self.queue.lock().unwrap();
            if self.max_len > 0 {
                while queue.len() >= self.max_len {
                    queue.pop_front();
                    log::debug!("buffer queue at capacity, dropping oldest");
                }
            }
            queue.push_back(Arc::new(buffer));
        }

        // Snapshot first: invoking under the lock would deadlock any
        // callback that touches the sender again.
        let callbacks: Vec<AvailableCallback> = self.callbacks.lock().unwrap().clone();
        for callback in &callbacks {
            callback();
        }
    }

    /// Removes and returns the oldest available buffer.
    pub fn pop(&self) -> Option<Arc<Buffer>> {
        self.queue.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}

impl Default for BufferSender {
    fn default() -> Self {
        Self::new()
    }
}
