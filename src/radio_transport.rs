//! Radio transport abstraction.
//!
//! The controller consumes the physical radio through this trait so the same
//! core runs against hardware drivers on target and against the simulator
//! transport in host tests. All operations are non-blocking: configuration and
//! transmission are fire-and-forget, and their outcomes arrive later as events
//! from `poll`.

use crate::radio_frame::RadioFrame;

/// Logical radio network selector.
///
/// Addresses either the payload pair or the ground station network; switching
/// is acknowledged asynchronously via [`TransportEvent::NetworkAck`].
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct NetworkId(pub u16);

/// Destination address of one radio node.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct NodeAddress(pub u64);

/// One event reported by a transport poll.
#[derive(Clone)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum TransportEvent {
    /// Nothing happened this tick.
    None,
    /// The radio reported an error condition.
    Error(u8),
    /// An application frame arrived. `acknowledged` reflects whether the
    /// sender received a link-level acknowledgment for it.
    Received { frame: RadioFrame, acknowledged: bool },
    /// Outcome of a previously issued transmission.
    DeliveryStatus { delivered: bool },
    /// Outcome of a previously issued network switch.
    NetworkAck { accepted: bool },
}

/// Capability set of the half-duplex radio.
///
/// The event source is single-shot: each event is reported by exactly one
/// `poll` call, and the controller polls at most once per tick per state
/// branch. Implementations must never block.
pub trait RadioTransport {
    /// Switches the active radio network. The result is observed as a later
    /// [`TransportEvent::NetworkAck`].
    fn configure_network(&mut self, network: NetworkId);

    /// Sends `payload` toward `destination`. Eventual delivery is observed as
    /// a later [`TransportEvent::DeliveryStatus`].
    fn transmit(&mut self, destination: NodeAddress, payload: &[u8]);

    /// Reports the next pending radio event, or [`TransportEvent::None`].
    fn poll(&mut self) -> TransportEvent;
}
