//! # Communication Controller
//!
//! Top-level driver of the container's radio link, invoked once per
//! control-loop tick. Each tick runs the receive-dispatch-and-schedule cycle:
//!
//! 1. In the pre-operational RTC-setup state, only a strict time-set command
//!    is accepted from the ground; everything else on the air is ignored.
//! 2. Operationally, the slot scheduler is re-evaluated first (slot entry
//!    actions happen before any inbound processing in the same tick), then the
//!    transport is polled exactly once and the single reported event is
//!    dispatched: inbound frames go through the protocol parser, delivery
//!    statuses drive the head-dequeue of the active slot's send queue, network
//!    acknowledgments are logged.
//!
//! ## Retry Model
//!
//! Only the head of a queue is ever transmitted, and it is removed only on a
//! confirmed delivery. A failed or unanswered transmission leaves the head in
//! place; the next scheduled visit to its slot re-presents it. There are no
//! retry counters and no backoff; link-quality problems surface as repeated
//! transmissions of the same head on each cycle.

use log::{Level, log};

use crate::bounded_queue::{CommandQueue, EnqueueError, TelemetryQueue};
use crate::command_parser::{self, CommandAction, ParsedPacket};
use crate::radio_frame::RadioFrame;
use crate::radio_transport::{RadioTransport, TransportEvent};
use crate::slot_scheduler::{CommSlot, SlotScheduler};
use crate::{ClockSource, CommConfiguration, CommandSink, PayloadId};
use crate::{LAST_COMMAND_ECHO_SIZE, PAYLOAD_ACTIVATE_TOKEN, PAYLOAD_DEACTIVATE_TOKEN};

/// Diagnostic counters for ground-link troubleshooting.
///
/// Nothing in the communication module is fatal; these counters are the
/// observable trace of everything the module absorbs silently.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct ControllerStats {
    /// Application frames received from the transport
    pub frames_received: u32,
    /// Payload directives discarded because a command queue was full
    pub command_queue_rejections: u32,
    /// Telemetry frames discarded because the relay queue was full
    pub telemetry_queue_rejections: u32,
    /// Transmissions reported as not delivered
    pub delivery_failures: u32,
    /// Error events reported by the transport
    pub transport_errors: u32,
}

/// The container's communication controller.
///
/// Owns the per-payload command queues, the telemetry relay queue, the slot
/// scheduler and the command echo buffer; the radio transport, the clock and
/// the command sink are injected at construction.
pub struct CommunicationController<T, C, S>
where
    T: RadioTransport,
    C: ClockSource,
    S: CommandSink,
{
    transport: T,
    clock: C,
    sink: S,
    config: CommConfiguration,
    scheduler: SlotScheduler,
    payload1_commands: CommandQueue,
    payload2_commands: CommandQueue,
    telemetry_frames: TelemetryQueue,
    last_command_echo: [u8; LAST_COMMAND_ECHO_SIZE],
    last_command_echo_length: usize,
    rtc_synced: bool,
    stats: ControllerStats,
}

impl<T, C, S> CommunicationController<T, C, S>
where
    T: RadioTransport,
    C: ClockSource,
    S: CommandSink,
{
    /// Creates a controller in the pre-operational RTC-setup state.
    pub fn new(transport: T, clock: C, sink: S, config: CommConfiguration) -> Self {
        CommunicationController {
            transport,
            clock,
            sink,
            config,
            scheduler: SlotScheduler::new(),
            payload1_commands: CommandQueue::new(),
            payload2_commands: CommandQueue::new(),
            telemetry_frames: TelemetryQueue::new(),
            last_command_echo: [0u8; LAST_COMMAND_ECHO_SIZE],
            last_command_echo_length: 0,
            rtc_synced: false,
            stats: ControllerStats::default(),
        }
    }

    /// Runs one control-loop tick.
    pub fn tick(&mut self) {
        if self.scheduler.current_slot() == CommSlot::RtcSetup {
            self.tick_rtc_setup();
            return;
        }

        let rtc_seconds = self.clock.rtc_seconds();
        let now_millis = self.clock.monotonic_millis();
        if let Some(slot) = self.scheduler.update(rtc_seconds, now_millis) {
            self.enter_slot(slot);
        }

        match self.transport.poll() {
            TransportEvent::None => {}
            TransportEvent::Received { frame, acknowledged } => {
                if !acknowledged {
                    log!(Level::Trace, "Frame received but sender did not get a link-level ack");
                }
                self.handle_frame(&frame);
            }
            TransportEvent::DeliveryStatus { delivered } => self.handle_delivery_status(delivered),
            TransportEvent::NetworkAck { accepted } => {
                if accepted {
                    log!(Level::Debug, "Network switch acknowledged");
                } else {
                    log!(Level::Warn, "Network switch rejected by the radio");
                }
            }
            TransportEvent::Error(code) => {
                self.stats.transport_errors += 1;
                log!(Level::Warn, "Transport error, code {}", code);
            }
        }
    }

    /// Pre-operational branch: only a strict RTC time-set is accepted.
    fn tick_rtc_setup(&mut self) {
        if let TransportEvent::Received { frame, .. } = self.transport.poll() {
            if let Some(time) = command_parser::decode_rtc_time(frame.as_slice()) {
                self.sink.set_rtc_time(time);
                self.rtc_synced = true;
                log!(Level::Info, "RTC time set from ground: {:02}:{:02}:{:02}", time.hour, time.minute, time.second);
            }
        }
    }

    /// Leaves the RTC-setup state and starts the operational slot cycle.
    ///
    /// The decision to start operations is external (taken once a valid RTC
    /// time has been established); it is not an internal transition.
    pub fn enter_operational(&mut self) {
        let rtc_seconds = self.clock.rtc_seconds();
        let now_millis = self.clock.monotonic_millis();
        self.scheduler.enter_operational(rtc_seconds, now_millis);
        self.enter_slot(CommSlot::Payload1);
    }

    /// Queues a locally produced telemetry frame for relay to the ground.
    pub fn queue_telemetry(&mut self, frame: RadioFrame) -> Result<(), EnqueueError<RadioFrame>> {
        match self.telemetry_frames.enqueue(frame) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.stats.telemetry_queue_rejections += 1;
                log!(Level::Warn, "Telemetry queue full, dropping local frame");
                Err(err)
            }
        }
    }

    /// Performs a slot's entry action: network switch and head transmission.
    fn enter_slot(&mut self, slot: CommSlot) {
        match slot {
            CommSlot::Payload1 => {
                if let Some(&token) = self.payload1_commands.peek_head() {
                    self.transport.configure_network(self.config.payloads_network);
                    self.transport.transmit(self.config.payload1_address, &[token]);
                }
            }
            CommSlot::Payload2 => {
                if let Some(&token) = self.payload2_commands.peek_head() {
                    self.transport.transmit(self.config.payload2_address, &[token]);
                }
            }
            CommSlot::Ground1 => {
                self.transport.configure_network(self.config.ground_network);
                if let Some(frame) = self.telemetry_frames.peek_head() {
                    self.transport.transmit(self.config.ground_address, frame.as_slice());
                }
            }
            CommSlot::Ground2 | CommSlot::Ground3 => {
                if let Some(frame) = self.telemetry_frames.peek_head() {
                    self.transport.transmit(self.config.ground_address, frame.as_slice());
                }
            }
            CommSlot::RtcSetup => {}
        }
    }

    /// Routes one received frame through the protocol parser.
    fn handle_frame(&mut self, frame: &RadioFrame) {
        self.stats.frames_received += 1;
        match command_parser::parse_packet(frame.as_slice()) {
            ParsedPacket::Telemetry => {
                if self.telemetry_frames.enqueue(frame.clone()).is_err() {
                    self.stats.telemetry_queue_rejections += 1;
                    log!(Level::Warn, "Telemetry queue full, dropping relayed frame");
                }
            }
            ParsedPacket::Command(action) => {
                self.apply_command(action);
                self.record_echo(frame);
            }
            ParsedPacket::Rejected(reason) => {
                log!(Level::Debug, "Dropping malformed packet: {}", reason.description());
            }
        }
    }

    fn apply_command(&mut self, action: CommandAction) {
        match action {
            CommandAction::SetContainerTelemetry(enabled) => self.sink.set_container_telemetry(enabled),
            CommandAction::SetSimulationMode(mode) => self.sink.set_simulation_mode(mode),
            CommandAction::SetSimulatedPressure(pascals) => self.sink.set_simulated_pressure(pascals),
            CommandAction::SetRtcTime(time) => {
                self.sink.set_rtc_time(time);
                self.rtc_synced = true;
            }
            CommandAction::PayloadPower { target, enable } => {
                let token = if enable { PAYLOAD_ACTIVATE_TOKEN } else { PAYLOAD_DEACTIVATE_TOKEN };
                let queue = match target {
                    PayloadId::Payload1 => &mut self.payload1_commands,
                    PayloadId::Payload2 => &mut self.payload2_commands,
                };
                if queue.enqueue(token).is_err() {
                    self.stats.command_queue_rejections += 1;
                    log!(Level::Warn, "Command queue full, dropping payload directive");
                }
            }
            CommandAction::Unrecognized => {}
        }
    }

    /// Dequeues the head of the active slot's send source on confirmed
    /// delivery. Failures leave the head in place for the next slot visit.
    fn handle_delivery_status(&mut self, delivered: bool) {
        if !delivered {
            self.stats.delivery_failures += 1;
            log!(Level::Debug, "Delivery failed, head retained for retransmission");
            return;
        }
        match self.scheduler.current_slot() {
            CommSlot::Payload1 => {
                self.payload1_commands.dequeue_head();
            }
            CommSlot::Payload2 => {
                self.payload2_commands.dequeue_head();
            }
            CommSlot::Ground1 | CommSlot::Ground2 | CommSlot::Ground3 => {
                self.telemetry_frames.dequeue_head();
            }
            CommSlot::RtcSetup => {}
        }
    }

    /// Copies a recognized command frame into the diagnostic echo buffer.
    fn record_echo(&mut self, frame: &RadioFrame) {
        let length = frame.len().min(LAST_COMMAND_ECHO_SIZE);
        self.last_command_echo[..length].copy_from_slice(&frame.as_slice()[..length]);
        self.last_command_echo_length = length;
    }

    /// The most recently recognized raw command packet, for echo-back.
    pub fn last_command_echo(&self) -> &[u8] {
        &self.last_command_echo[..self.last_command_echo_length]
    }

    pub fn current_slot(&self) -> CommSlot {
        self.scheduler.current_slot()
    }

    /// True once a valid RTC time-set command has been applied.
    pub fn is_rtc_synced(&self) -> bool {
        self.rtc_synced
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn pending_payload1_commands(&self) -> usize {
        self.payload1_commands.len()
    }

    pub fn pending_payload2_commands(&self) -> usize {
        self.payload2_commands.len()
    }

    pub fn pending_telemetry_frames(&self) -> usize {
        self.telemetry_frames.len()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
