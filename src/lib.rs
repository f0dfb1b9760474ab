//! # CanSat Container Radio Library
//!
//! Onboard communication controller for a competition CubeSat-class
//! "container" vehicle. A single half-duplex radio link is multiplexed across
//! three traffic classes - commands to two tethered science payloads and
//! telemetry/commands to/from a ground station - using a fixed time-division
//! schedule derived from the real-time clock. The ASCII command protocol
//! received over that link is parsed and dispatched here as well.
//!
//! ## Execution Model
//!
//! Everything is single-threaded, cooperative and non-blocking: the host
//! application calls [`CommunicationController::tick`] once per control-loop
//! iteration, fast enough to resolve the sub-250 ms slot boundaries. Nothing
//! blocks; waiting for a radio response is modeled as the transport reporting
//! no event this tick.
//!
//! ## Collaborators
//!
//! The physical radio, the hardware clock and the vehicle state that commands
//! mutate are all external; the controller consumes them through the
//! [`RadioTransport`], [`ClockSource`] and [`CommandSink`] traits injected at
//! construction. [`RadioTransportSimulator`] implements the transport over
//! in-memory queues for host testing.

#![cfg_attr(not(feature = "std"), no_std)]

use core::cell::Cell;

pub mod bounded_queue;
pub mod command_parser;
pub mod controller;
pub mod radio_frame;
pub mod radio_transport;
pub mod radio_transport_simulator;
pub mod slot_scheduler;

// Hardware dependent constant: the transport's maximum application payload,
// which bounds every frame this module stores or forwards.
pub const RADIO_FRAME_SIZE: usize = 84;

// Capacity constants only affect how much traffic the container can absorb
// between scheduled slots, not protocol compatibility.
pub const COMMAND_QUEUE_SIZE: usize = 8;
pub const TELEMETRY_QUEUE_SIZE: usize = 8;
pub const LAST_COMMAND_ECHO_SIZE: usize = 32;

/// Command token relayed to a payload to begin telemetry transmissions.
pub const PAYLOAD_ACTIVATE_TOKEN: u8 = b'1';
/// Command token relayed to a payload to stop telemetry transmissions.
pub const PAYLOAD_DEACTIVATE_TOKEN: u8 = b'0';

pub use bounded_queue::{BoundedQueue, CommandQueue, EnqueueError, TelemetryQueue};
pub use command_parser::{CommandAction, ParsedPacket, RejectReason, decode_rtc_time, parse_packet};
pub use controller::{CommunicationController, ControllerStats};
pub use radio_frame::RadioFrame;
pub use radio_transport::{NetworkId, NodeAddress, RadioTransport, TransportEvent};
pub use radio_transport_simulator::RadioTransportSimulator;
pub use slot_scheduler::{CommSlot, SlotScheduler};

/// Radio addressing for one mission deployment.
///
/// Network ids select the logical radio network shared with either the
/// payload pair or the ground station; node addresses identify the individual
/// transceivers.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct CommConfiguration {
    /// Network shared with the two science payloads
    pub payloads_network: NetworkId,
    /// Network shared with the ground station
    pub ground_network: NetworkId,
    pub payload1_address: NodeAddress,
    pub payload2_address: NodeAddress,
    pub ground_address: NodeAddress,
}

/// Tethered science payload selector.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum PayloadId {
    Payload1,
    Payload2,
}

/// Simulation mode of the container, controlled by the SIM command family.
///
/// Simulation must be enabled and then activated by two separate commands
/// before simulated pressure readings are honored.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum SimulationMode {
    Disabled,
    Enabled,
    Activated,
}

/// RTC wall-clock value carried by a validated time-set command.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct RtcTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Vehicle state mutated by decoded ground commands.
///
/// One setter per settable quantity, injected into the controller at
/// construction; setters are invoked synchronously as side effects of a
/// successful command decode.
pub trait CommandSink {
    /// CX directive: container telemetry transmission on/off.
    fn set_container_telemetry(&mut self, enabled: bool);

    /// SIM directive: simulation mode change.
    fn set_simulation_mode(&mut self, mode: SimulationMode);

    /// SIMP directive: latest simulated pressure reading in Pascals.
    fn set_simulated_pressure(&mut self, pascals: i32);

    /// ST directive: the validated wall-clock value, applied atomically.
    fn set_rtc_time(&mut self, time: RtcTime);
}

/// Platform-agnostic clock facility.
///
/// Abstracts the hardware RTC and a monotonic millisecond counter so the
/// scheduler can be driven deterministically in host tests.
pub trait ClockSource {
    /// Current RTC wall-clock seconds (0-59).
    fn rtc_seconds(&self) -> u8;

    /// Monotonic milliseconds since an arbitrary origin.
    fn monotonic_millis(&self) -> u64;
}

/// Controllable clock for deterministic tests.
///
/// RTC seconds and monotonic milliseconds are set independently; the slot
/// scheduler's behavior at a second boundary depends on exactly how the two
/// advance relative to each other, and tests need to exercise both.
///
/// # Example
/// ```rust
/// use cansat_radio_lib::{ClockSource, MockClock};
///
/// let clock = MockClock::new();
/// clock.set_seconds(10);
/// clock.advance_millis(250);
/// assert_eq!(clock.rtc_seconds(), 10);
/// assert_eq!(clock.monotonic_millis(), 250);
/// ```
#[derive(Clone, Default)]
pub struct MockClock {
    seconds: Cell<u8>,
    millis: Cell<u64>,
}

impl MockClock {
    /// Creates a clock at second 0, millisecond 0.
    pub fn new() -> Self {
        MockClock {
            seconds: Cell::new(0),
            millis: Cell::new(0),
        }
    }

    /// Sets the RTC seconds value.
    pub fn set_seconds(&self, seconds: u8) {
        self.seconds.set(seconds);
    }

    /// Sets the monotonic counter to an absolute value.
    pub fn set_millis(&self, millis: u64) {
        self.millis.set(millis);
    }

    /// Advances the monotonic counter.
    pub fn advance_millis(&self, millis: u64) {
        self.millis.set(self.millis.get() + millis);
    }
}

impl ClockSource for MockClock {
    fn rtc_seconds(&self) -> u8 {
        self.seconds.get()
    }

    fn monotonic_millis(&self) -> u64 {
        self.millis.get()
    }
}
