//! Serial receive path: byte framing and line handoff.
//!
//! The receiving side (interrupt handler or reader thread) feeds raw bytes
//! into an [`RxProducer`]; the control loop polls complete lines from the
//! matching [`RxConsumer`]. Lines travel through a lock-free single-producer
//! single-consumer queue, so the producer never blocks and the consumer
//! never sees a half-written line.
//!
//! Framing:
//! - `CR LF` ends a line; neither byte is part of it.
//! - `CR` followed by anything else discards the partial line.
//! - A partial line reaching `RX_BUFFER_LEN` bytes is discarded.

use heapless::spsc::{Consumer, Producer, Queue};
use tracing::warn;

use lf_common::consts::{RX_BUFFER_LEN, RX_QUEUE_DEPTH};

const CR: u8 = 0x0D;
const LF: u8 = 0x0A;

/// One received line, framing bytes stripped.
pub type Line = heapless::Vec<u8, RX_BUFFER_LEN>;

// ─── Framing ────────────────────────────────────────────────────────

/// Byte-at-a-time line framer.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Line,
    saw_cr: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns the line it completes, if any.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        if self.saw_cr {
            self.saw_cr = false;
            if byte == LF {
                return Some(core::mem::take(&mut self.buf));
            }
            self.buf.clear();
            return None;
        }

        if byte == CR {
            self.saw_cr = true;
            return None;
        }

        // Length never exceeds RX_BUFFER_LEN - 1 here, so the push fits.
        let _ = self.buf.push(byte);
        if self.buf.len() > RX_BUFFER_LEN - 1 {
            self.buf.clear();
        }
        None
    }

    /// Bytes of the line currently being assembled.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }
}

// ─── Handoff ────────────────────────────────────────────────────────

/// Backing storage for the line queue. Holds `RX_QUEUE_DEPTH - 1` lines.
pub struct RxChannel {
    queue: Queue<Line, RX_QUEUE_DEPTH>,
}

impl RxChannel {
    pub const fn new() -> Self {
        Self {
            queue: Queue::new(),
        }
    }

    /// Split into the receiving and polling halves.
    pub fn split(&mut self) -> (RxProducer<'_>, RxConsumer<'_>) {
        let (producer, consumer) = self.queue.split();
        (
            RxProducer {
                assembler: LineAssembler::new(),
                producer,
                dropped: 0,
            },
            RxConsumer { consumer },
        )
    }
}

impl Default for RxChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half: frames bytes and publishes complete lines.
pub struct RxProducer<'a> {
    assembler: LineAssembler,
    producer: Producer<'a, Line, RX_QUEUE_DEPTH>,
    dropped: u64,
}

impl RxProducer<'_> {
    /// Feed one received byte.
    ///
    /// A line completed while the queue is full is dropped and counted.
    pub fn on_byte(&mut self, byte: u8) {
        let Some(line) = self.assembler.push(byte) else {
            return;
        };
        if self.producer.enqueue(line).is_err() {
            self.dropped += 1;
            warn!(dropped = self.dropped, "rx queue full, line dropped");
        }
    }

    /// Feed a run of bytes.
    pub fn on_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.on_byte(b);
        }
    }

    /// Lines lost to a full queue.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Polling half: takes complete lines out of the queue.
pub struct RxConsumer<'a> {
    consumer: Consumer<'a, Line, RX_QUEUE_DEPTH>,
}

impl RxConsumer<'_> {
    /// Take the oldest complete line, freeing its slot.
    #[inline]
    pub fn poll(&mut self) -> Option<Line> {
        self.consumer.dequeue()
    }

    /// Whether a complete line is waiting.
    #[inline]
    pub fn ready(&self) -> bool {
        self.consumer.ready()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
