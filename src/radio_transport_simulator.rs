//! # Radio Transport Simulator - Testing and Development Mock
//!
//! This module provides a simulated radio transport for testing and
//! development without physical hardware. It speaks the same [`RadioTransport`]
//! contract as a real transceiver driver while a host harness plays the role
//! of the radio network.
//!
//! ## Architecture
//!
//! The simulator uses channel-based communication to emulate radio behavior:
//! - **Command Queue**: network switches and transmissions flow out to the
//!   harness as [`SimulatorCommand`] values
//! - **Event Queue**: the harness scripts radio behavior by queueing
//!   [`TransportEvent`] values (received frames, delivery statuses, network
//!   acknowledgments, errors)
//!
//! `poll` is a non-blocking `try_receive`, so the single-shot event contract
//! holds: each queued event is reported exactly once, and an empty queue reads
//! as [`TransportEvent::None`].
//!
//! ## Design Considerations
//!
//! - Queue endpoints are `'static`, matching the static-channel layout used on
//!   embedded targets; host tests lean on `Box::leak`
//! - A full command queue drops the command and logs a warning rather than
//!   blocking the control loop

use crate::radio_frame::RadioFrame;
use crate::radio_transport::{NetworkId, NodeAddress, RadioTransport, TransportEvent};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::{Level, log};

/// Size of the simulator command queue
const SIMULATOR_COMMAND_QUEUE_SIZE: usize = 16;

/// Queue carrying commands from the transport to the test harness
pub type SimulatorCommandQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, SimulatorCommand, SIMULATOR_COMMAND_QUEUE_SIZE>;
/// Harness-side receiver for transport commands
pub type SimulatorCommandQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, SimulatorCommand, SIMULATOR_COMMAND_QUEUE_SIZE>;
/// Transport-side sender for commands
pub type SimulatorCommandQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, SimulatorCommand, SIMULATOR_COMMAND_QUEUE_SIZE>;

/// Size of the simulator event queue
const SIMULATOR_EVENT_QUEUE_SIZE: usize = 16;

/// Queue carrying scripted radio events from the test harness to the transport
pub type SimulatorEventQueue = embassy_sync::channel::Channel<CriticalSectionRawMutex, TransportEvent, SIMULATOR_EVENT_QUEUE_SIZE>;
/// Transport-side receiver for scripted events
pub type SimulatorEventQueueReceiver = embassy_sync::channel::Receiver<'static, CriticalSectionRawMutex, TransportEvent, SIMULATOR_EVENT_QUEUE_SIZE>;
/// Harness-side sender for scripted events
pub type SimulatorEventQueueSender = embassy_sync::channel::Sender<'static, CriticalSectionRawMutex, TransportEvent, SIMULATOR_EVENT_QUEUE_SIZE>;

/// Operations the transport wants to perform on the simulated network.
#[derive(Clone)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum SimulatorCommand {
    /// Request to switch the active radio network
    ConfigureNetwork(NetworkId),
    /// Request to transmit a frame to one node
    Transmit { destination: NodeAddress, frame: RadioFrame },
}

/// Simulated radio transport - mock radio for host testing.
///
/// Outgoing operations are forwarded to the harness through the command
/// queue; the harness decides what the radio "does" and answers through the
/// event queue. The harness is responsible for network topology, delivery
/// outcomes and timing.
pub struct RadioTransportSimulator {
    command_sender: SimulatorCommandQueueSender,
    event_receiver: SimulatorEventQueueReceiver,
}

impl RadioTransportSimulator {
    /// Creates a simulated transport from the two queue endpoints.
    pub const fn with(command_sender: SimulatorCommandQueueSender, event_receiver: SimulatorEventQueueReceiver) -> Self {
        RadioTransportSimulator {
            command_sender,
            event_receiver,
        }
    }
}

impl RadioTransport for RadioTransportSimulator {
    fn configure_network(&mut self, network: NetworkId) {
        if self.command_sender.try_send(SimulatorCommand::ConfigureNetwork(network)).is_err() {
            log!(Level::Warn, "Simulator command queue full, dropping network switch");
        }
    }

    fn transmit(&mut self, destination: NodeAddress, payload: &[u8]) {
        let frame = RadioFrame::from_slice(payload);
        if self.command_sender.try_send(SimulatorCommand::Transmit { destination, frame }).is_err() {
            log!(Level::Warn, "Simulator command queue full, dropping transmission");
        }
    }

    fn poll(&mut self) -> TransportEvent {
        match self.event_receiver.try_receive() {
            Ok(event) => event,
            Err(_) => TransportEvent::None,
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    fn simulator() -> (RadioTransportSimulator, SimulatorCommandQueueReceiver, SimulatorEventQueueSender) {
        let commands: &'static SimulatorCommandQueue = Box::leak(Box::new(SimulatorCommandQueue::new()));
        let events: &'static SimulatorEventQueue = Box::leak(Box::new(SimulatorEventQueue::new()));
        let transport = RadioTransportSimulator::with(commands.sender(), events.receiver());
        (transport, commands.receiver(), events.sender())
    }

    #[test]
    fn poll_on_empty_queue_reports_none() {
        let (mut transport, _commands, _events) = simulator();
        assert!(matches!(transport.poll(), TransportEvent::None));
    }

    #[test]
    fn each_scripted_event_is_reported_once() {
        let (mut transport, _commands, events) = simulator();
        events.try_send(TransportEvent::DeliveryStatus { delivered: true }).unwrap();

        assert!(matches!(transport.poll(), TransportEvent::DeliveryStatus { delivered: true }));
        assert!(matches!(transport.poll(), TransportEvent::None));
    }

    #[test]
    fn transmit_forwards_destination_and_payload() {
        let (mut transport, commands, _events) = simulator();
        transport.transmit(NodeAddress(0x13A200), b"1");

        match commands.try_receive().unwrap() {
            SimulatorCommand::Transmit { destination, frame } => {
                assert_eq!(destination, NodeAddress(0x13A200));
                assert_eq!(frame.as_slice(), b"1");
            }
            other => panic!("expected transmit, got {:?}", other),
        }
    }

    #[test]
    fn configure_network_forwards_network_id() {
        let (mut transport, commands, _events) = simulator();
        transport.configure_network(NetworkId(0x3301));

        match commands.try_receive().unwrap() {
            SimulatorCommand::ConfigureNetwork(network) => assert_eq!(network, NetworkId(0x3301)),
            other => panic!("expected network switch, got {:?}", other),
        }
    }
}
