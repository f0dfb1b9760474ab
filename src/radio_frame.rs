//! # Radio Frame Module
//!
//! Low-level frame structure for radio transmission and reception.
//!
//! ## Architecture
//!
//! `RadioFrame` represents the wire format exchanged with the transceiver. Each
//! frame contains:
//! - Raw data buffer of fixed size (`RADIO_FRAME_SIZE`)
//! - Actual data length
//!
//! ## Frame Discrimination
//!
//! The first byte of a frame decides its class: `b'C'` marks an ASCII command
//! packet, anything else is treated as a telemetry frame and relayed verbatim.
//! The full command grammar lives in the `command_parser` module.
//!
//! ## Design Considerations
//!
//! - **Public Fields**: `data` and `length` are public for zero-copy handoff to
//!   radio hardware interfaces
//! - **Fixed Size**: all frames occupy the same storage for predictable memory
//!   usage in the bounded queues

use crate::RADIO_FRAME_SIZE;

/// Marker byte distinguishing command packets from telemetry frames.
pub const COMMAND_MARKER: u8 = b'C';

/// Fixed-size frame exchanged with the radio transceiver.
///
/// The `data` buffer always spans `RADIO_FRAME_SIZE` bytes; only the first
/// `length` bytes are valid.
///
/// # Example
/// ```rust
/// use cansat_radio_lib::RadioFrame;
///
/// let frame = RadioFrame::from_slice(b"CMD,2764,CX,ON");
/// assert_eq!(frame.as_slice(), b"CMD,2764,CX,ON");
/// assert!(frame.is_command());
/// ```
#[derive(Clone)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct RadioFrame {
    /// Raw frame data buffer of fixed size
    pub data: [u8; RADIO_FRAME_SIZE],

    /// Actual number of valid bytes in the data buffer
    pub length: usize,
}

impl RadioFrame {
    /// Creates an empty frame.
    pub const fn new() -> Self {
        RadioFrame {
            data: [0u8; RADIO_FRAME_SIZE],
            length: 0,
        }
    }

    /// Creates a frame holding a copy of `bytes`.
    ///
    /// Input longer than `RADIO_FRAME_SIZE` is truncated to the buffer; the
    /// transport cannot carry more than one frame's worth of payload anyway.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut frame = RadioFrame::new();
        let length = bytes.len().min(RADIO_FRAME_SIZE);
        frame.data[..length].copy_from_slice(&bytes[..length]);
        frame.length = length;
        frame
    }

    /// Returns the valid portion of the frame.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.length]
    }

    /// Returns true when the frame carries an ASCII command packet.
    ///
    /// Empty frames are not commands.
    pub fn is_command(&self) -> bool {
        self.length > 0 && self.data[0] == COMMAND_MARKER
    }

    /// Returns the number of valid bytes in the frame.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns true when the frame holds no data.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl Default for RadioFrame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_copies_data() {
        let frame = RadioFrame::from_slice(b"CMD,2764,SP1X,ON");
        assert_eq!(frame.len(), 16);
        assert_eq!(frame.as_slice(), b"CMD,2764,SP1X,ON");
    }

    #[test]
    fn from_slice_truncates_oversized_input() {
        let oversized = [0x55u8; RADIO_FRAME_SIZE + 40];
        let frame = RadioFrame::from_slice(&oversized);
        assert_eq!(frame.len(), RADIO_FRAME_SIZE);
    }

    #[test]
    fn command_discrimination() {
        assert!(RadioFrame::from_slice(b"CMD,2764,CX,ON").is_command());
        assert!(!RadioFrame::from_slice(b"1000,CONTAINER,12:01:03").is_command());
        assert!(!RadioFrame::new().is_command());
    }
}
