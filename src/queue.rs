//! Outbound queue and message sender
//!
//! The UART only holds one byte at a time, so a message is staged in an [`OutboundQueue`] and fed
//! to the transmitter one byte per transmit-complete interrupt. [`OutboundQueue::send`] resets
//! the queue, stages CRLF followed by the message, and hands back the first byte, which the
//! caller writes to the transmit register to start the chain. Every later byte comes out of
//! [`OutboundQueue::next_byte`].
//!
//! Only one message can be in flight. What happens when a second send arrives before the first
//! has drained is decided by [`SendPolicy`].

use crate::config::{SendPolicy, LINE_PREFIX, MESSAGE_CAPACITY, QUEUE_CAPACITY};
use core::fmt;

/// Errors returned by [`OutboundQueue::send`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// A message is still in flight and the policy is [`SendPolicy::Reject`].
    Busy,
    /// CRLF plus the message does not fit in the queue.
    TooLong {
        /// Length of the message body
        len: usize,
        /// Longest body the queue accepts
        capacity: usize,
    },
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Busy => f.write_str("previous message still in flight"),
            SendError::TooLong { len, capacity } => {
                write!(f, "message of {} bytes exceeds {} byte queue", len, capacity)
            }
        }
    }
}

/// Byte queue drained by the transmit-complete handler.
///
/// `read <= write` always holds. The queue is drained once `read == write`.
#[derive(Clone, Debug)]
pub struct OutboundQueue {
    buf: [u8; QUEUE_CAPACITY],
    // One past the last staged byte
    write: usize,
    // Next byte to hand to the transmitter
    read: usize,
}

impl OutboundQueue {
    /// Creates an empty, drained queue.
    pub const fn new() -> Self {
        OutboundQueue {
            buf: [0; QUEUE_CAPACITY],
            write: 0,
            read: 0,
        }
    }

    /// Whether staged bytes remain that have not been handed to the transmitter.
    #[inline(always)]
    pub fn is_in_flight(&self) -> bool {
        self.read < self.write
    }

    /// Number of staged bytes not yet handed to the transmitter.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.write - self.read
    }

    /// Stage CRLF followed by `msg`, and return the first byte to write to the transmit
    /// register. The queue counts that byte as already sent.
    ///
    /// Fails with [`SendError::TooLong`] without touching the queue if the message does not fit,
    /// and with [`SendError::Busy`] if a message is in flight and `policy` is
    /// [`SendPolicy::Reject`].
    pub fn send(&mut self, msg: &[u8], policy: SendPolicy) -> Result<u8, SendError> {
        if msg.len() > MESSAGE_CAPACITY {
            warn!("dropping oversized message of {} bytes", msg.len());
            return Err(SendError::TooLong {
                len: msg.len(),
                capacity: MESSAGE_CAPACITY,
            });
        }

        if self.is_in_flight() {
            match policy {
                SendPolicy::Reject => {
                    trace!("send rejected, {} bytes still queued", self.remaining());
                    return Err(SendError::Busy);
                }
                SendPolicy::Overwrite => {
                    warn!("overwriting in-flight message, {} bytes lost", self.remaining());
                }
            }
        }

        let end = LINE_PREFIX.len() + msg.len();
        self.buf[..LINE_PREFIX.len()].copy_from_slice(LINE_PREFIX);
        self.buf[LINE_PREFIX.len()..end].copy_from_slice(msg);
        self.write = end;
        // Byte 0 goes straight to the transmit register
        self.read = 1;
        Ok(self.buf[0])
    }

    /// Next byte to transmit, or `None` once the queue has drained.
    #[inline]
    pub fn next_byte(&mut self) -> Option<u8> {
        if self.read < self.write {
            let byte = self.buf[self.read];
            self.read += 1;
            Some(byte)
        } else {
            None
        }
    }

    /// Take back the byte most recently handed out, because the transmitter refused it. The
    /// next call to [`next_byte`](Self::next_byte) returns it again.
    #[inline]
    pub fn unread(&mut self) {
        self.read = self.read.saturating_sub(1);
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        OutboundQueue::new()
    }
}
