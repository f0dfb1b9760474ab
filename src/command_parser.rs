//! # Command Parser Module
//!
//! Fixed-offset decoder for the ASCII ground command protocol.
//!
//! ## Packet Layout
//!
//! Command packets follow a rigid, pre-agreed comma-delimited layout:
//!
//! ```text
//! CMD,<4-digit-id>,<TYPE>,<value...>
//! 0         ^9 type field starts here
//! ```
//!
//! The parser does not tokenize; it discriminates on the bytes at fixed
//! offsets, matching the calibration of the ground protocol:
//!
//! - `CMD,2764,CX,ON` - enable container telemetry
//! - `CMD,2764,SIM,ENABLE` / `CMD,1000,SIM,ACTIVATE` - simulation mode control
//! - `CMD,1000,SIMP,101325` - simulated pressure reading (Pascals)
//! - `CMD,2764,SP1X,ON` - relay an activation command to science payload 1
//! - `CMD,2764,ST,13:35:59` - set the RTC wall-clock time
//!
//! ## Fail-Closed Decoding
//!
//! Every offset access is bounds-checked; a frame too short for the field a
//! decode path needs is rejected without any state change. The RTC time-set
//! decode is stricter still: exact 20-byte length, `ST` type marker and three
//! range-valid 2-digit decimal fields, applied atomically or not at all.

use crate::{PayloadId, RtcTime, SimulationMode};

// Fixed offsets of the command grammar. Offsets are relative to the start of
// the frame, including the `CMD,<id>,` prefix.
const TYPE_OFFSET: usize = 9;
const CX_VALUE_OFFSET: usize = 12;
const SIM_DISCRIMINATOR_OFFSET: usize = 12;
const SIM_MODE_OFFSET: usize = 13;
const SIMP_VALUE_OFFSET: usize = 14;
const SP_TARGET_OFFSET: usize = 11;
const SP_VALUE_OFFSET: usize = 14;

const TIME_SET_FRAME_LENGTH: usize = 20;
const TIME_SET_HOUR_OFFSET: usize = 12;
const TIME_SET_MINUTE_OFFSET: usize = 15;
const TIME_SET_SECOND_OFFSET: usize = 18;

/// Classification of one received frame.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum ParsedPacket {
    /// A recognized command packet carrying the decoded action.
    Command(CommandAction),
    /// A telemetry frame to be relayed verbatim toward the ground station.
    Telemetry,
    /// A malformed frame; dropped with no state change and no echo.
    Rejected(RejectReason),
}

/// Decoded effect of a command packet.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum CommandAction {
    /// CX directive: enable or disable container telemetry transmission.
    SetContainerTelemetry(bool),
    /// SIM directive: change the simulation mode.
    SetSimulationMode(SimulationMode),
    /// SIMP directive: store a simulated pressure reading in Pascals.
    SetSimulatedPressure(i32),
    /// SPnX directive: queue an activate/deactivate token for one payload.
    PayloadPower { target: PayloadId, enable: bool },
    /// ST directive: set the RTC wall-clock time.
    SetRtcTime(RtcTime),
    /// A well-formed command with an unknown type code; echoed, no effect.
    Unrecognized,
}

/// Reason a frame was dropped by the decoder.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum RejectReason {
    /// The frame holds no data at all.
    Empty,
    /// The frame ends before a field the decode path requires.
    TooShort,
    /// A SIMP value that is not a decimal integer.
    InvalidPressureValue,
    /// An ST frame that fails the strict time-set decode.
    InvalidTimeSet,
}

impl RejectReason {
    /// Short diagnostic label, usable from `no_std` log lines.
    pub fn description(&self) -> &'static str {
        match self {
            RejectReason::Empty => "empty frame",
            RejectReason::TooShort => "frame too short",
            RejectReason::InvalidPressureValue => "invalid pressure value",
            RejectReason::InvalidTimeSet => "invalid time set",
        }
    }
}

/// Classifies a raw frame and decodes the command action, if any.
///
/// Frames whose first byte is not the command marker are telemetry and pass
/// through untouched. Command frames are dispatched on their type field; an
/// unknown type code is accepted as a no-op (the ground operator still sees
/// it in the command echo).
pub fn parse_packet(bytes: &[u8]) -> ParsedPacket {
    if bytes.is_empty() {
        return ParsedPacket::Rejected(RejectReason::Empty);
    }
    if bytes[0] != crate::radio_frame::COMMAND_MARKER {
        return ParsedPacket::Telemetry;
    }

    let type_byte = match bytes.get(TYPE_OFFSET) {
        Some(&b) => b,
        None => return ParsedPacket::Rejected(RejectReason::TooShort),
    };

    match type_byte {
        b'C' => {
            // CX: two value bytes equal to "ON" enable telemetry; any other
            // or missing value reads as OFF.
            let enable = bytes.get(CX_VALUE_OFFSET..CX_VALUE_OFFSET + 2) == Some(b"ON".as_slice());
            ParsedPacket::Command(CommandAction::SetContainerTelemetry(enable))
        }
        b'S' => match bytes.get(TYPE_OFFSET + 1) {
            Some(&b'I') => parse_sim_family(bytes),
            Some(&b'P') => parse_payload_power(bytes),
            Some(&b'T') => match decode_rtc_time(bytes) {
                Some(time) => ParsedPacket::Command(CommandAction::SetRtcTime(time)),
                None => ParsedPacket::Rejected(RejectReason::InvalidTimeSet),
            },
            Some(_) => ParsedPacket::Command(CommandAction::Unrecognized),
            None => ParsedPacket::Rejected(RejectReason::TooShort),
        },
        _ => ParsedPacket::Command(CommandAction::Unrecognized),
    }
}

/// SIM vs SIMP: a comma right after the type field means the bare `SIM`
/// directive, anything else is `SIMP` with a numeric value.
fn parse_sim_family(bytes: &[u8]) -> ParsedPacket {
    match bytes.get(SIM_DISCRIMINATOR_OFFSET) {
        Some(&b',') => match bytes.get(SIM_MODE_OFFSET) {
            Some(&b'D') => ParsedPacket::Command(CommandAction::SetSimulationMode(SimulationMode::Disabled)),
            Some(&b'E') => ParsedPacket::Command(CommandAction::SetSimulationMode(SimulationMode::Enabled)),
            Some(_) => ParsedPacket::Command(CommandAction::SetSimulationMode(SimulationMode::Activated)),
            None => ParsedPacket::Rejected(RejectReason::TooShort),
        },
        Some(_) => {
            let value = match bytes.get(SIMP_VALUE_OFFSET..) {
                Some(v) if !v.is_empty() => v,
                _ => return ParsedPacket::Rejected(RejectReason::TooShort),
            };
            match parse_decimal_i32(value) {
                Some(pascals) => ParsedPacket::Command(CommandAction::SetSimulatedPressure(pascals)),
                None => ParsedPacket::Rejected(RejectReason::InvalidPressureValue),
            }
        }
        None => ParsedPacket::Rejected(RejectReason::TooShort),
    }
}

fn parse_payload_power(bytes: &[u8]) -> ParsedPacket {
    // Selector byte '1' addresses payload 1; any other byte addresses
    // payload 2, matching the ground protocol calibration.
    let target = match bytes.get(SP_TARGET_OFFSET) {
        Some(&b'1') => PayloadId::Payload1,
        Some(_) => PayloadId::Payload2,
        None => return ParsedPacket::Rejected(RejectReason::TooShort),
    };
    let enable = bytes.get(SP_VALUE_OFFSET..SP_VALUE_OFFSET + 2) == Some(b"ON".as_slice());
    ParsedPacket::Command(CommandAction::PayloadPower { target, enable })
}

/// Strict RTC time-set decode.
///
/// The frame must be exactly 20 bytes (`CMD,<4-digit-id>,ST,HH:MM:SS`) with
/// the `ST` type marker in place; the three 2-digit decimal fields must be
/// digits in valid wall-clock ranges. Any deviation yields `None` and the RTC
/// is left untouched.
pub fn decode_rtc_time(bytes: &[u8]) -> Option<RtcTime> {
    if bytes.len() != TIME_SET_FRAME_LENGTH || bytes[TYPE_OFFSET] != b'S' || bytes[TYPE_OFFSET + 1] != b'T' {
        return None;
    }

    let hour = parse_two_digits(bytes, TIME_SET_HOUR_OFFSET)?;
    let minute = parse_two_digits(bytes, TIME_SET_MINUTE_OFFSET)?;
    let second = parse_two_digits(bytes, TIME_SET_SECOND_OFFSET)?;

    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    Some(RtcTime { hour, minute, second })
}

fn parse_two_digits(bytes: &[u8], offset: usize) -> Option<u8> {
    let field = bytes.get(offset..offset + 2)?;
    if !field[0].is_ascii_digit() || !field[1].is_ascii_digit() {
        return None;
    }
    Some((field[0] - b'0') * 10 + (field[1] - b'0'))
}

fn parse_decimal_i32(bytes: &[u8]) -> Option<i32> {
    core::str::from_utf8(bytes).ok()?.parse::<i32>().ok()
}
