use log::{Level, log};

// Window boundaries in milliseconds since the observed RTC second boundary.
// Payload 1 gets the first quarter of the cycle, payload 2 the next quarter,
// and the ground station three consecutive windows in the remaining half.
const PAYLOAD1_WINDOW_END_MS: u64 = 250;
const PAYLOAD2_WINDOW_END_MS: u64 = 500;
const GROUND1_WINDOW_END_MS: u64 = 667;
const GROUND2_WINDOW_END_MS: u64 = 834;

/// The currently active time-boxed communication partner/direction.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum CommSlot {
    /// Pre-operational state: waiting for a valid RTC time from the ground.
    RtcSetup,
    /// Command window toward science payload 1.
    Payload1,
    /// Command window toward science payload 2.
    Payload2,
    /// First ground window (includes the network switch).
    Ground1,
    /// Second ground window.
    Ground2,
    /// Third ground window.
    Ground3,
}

/// Time-division slot state machine.
///
/// Slot selection is purely a function of elapsed wall-clock time within the
/// current RTC second; it never depends on delivery outcomes. A slot being
/// re-entered on schedule is the system's retry mechanism.
pub struct SlotScheduler {
    current_slot: CommSlot,
    current_second: u8,
    second_start_millis: u64,
}

impl SlotScheduler {
    /// Creates a scheduler in the pre-operational `RtcSetup` state.
    pub const fn new() -> Self {
        SlotScheduler {
            current_slot: CommSlot::RtcSetup,
            current_second: 0,
            second_start_millis: 0,
        }
    }

    pub fn current_slot(&self) -> CommSlot {
        self.current_slot
    }

    /// Leaves `RtcSetup` and seeds the cycle at `Payload1`.
    ///
    /// `RtcSetup` is terminal for the state machine itself; only this external
    /// decision (taken once a valid RTC time has been established) starts the
    /// operational cycle.
    pub fn enter_operational(&mut self, rtc_seconds: u8, now_millis: u64) {
        self.current_second = rtc_seconds;
        self.second_start_millis = now_millis;
        self.current_slot = CommSlot::Payload1;
        log!(Level::Info, "Slot scheduler operational, starting cycle at second {}", rtc_seconds);
    }

    /// Re-evaluates the slot for the current tick.
    ///
    /// Returns `Some(slot)` exactly when a genuine transition happened (the
    /// caller performs the slot's entry action once per returned transition)
    /// and `None` when re-evaluation lands on the already-active slot. A new
    /// RTC second always transitions to `Payload1`, regardless of the prior
    /// slot.
    pub fn update(&mut self, rtc_seconds: u8, now_millis: u64) -> Option<CommSlot> {
        if self.current_slot == CommSlot::RtcSetup {
            return None;
        }

        if rtc_seconds != self.current_second {
            self.current_second = rtc_seconds;
            self.second_start_millis = now_millis;
            self.current_slot = CommSlot::Payload1;
            return Some(CommSlot::Payload1);
        }

        let elapsed = now_millis.saturating_sub(self.second_start_millis);
        let target = if elapsed < PAYLOAD1_WINDOW_END_MS {
            CommSlot::Payload1
        } else if elapsed < PAYLOAD2_WINDOW_END_MS {
            CommSlot::Payload2
        } else if elapsed < GROUND1_WINDOW_END_MS {
            CommSlot::Ground1
        } else if elapsed < GROUND2_WINDOW_END_MS {
            CommSlot::Ground2
        } else {
            CommSlot::Ground3
        };

        if target == self.current_slot {
            return None;
        }
        self.current_slot = target;
        Some(target)
    }
}

impl Default for SlotScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operational_scheduler() -> SlotScheduler {
        let mut scheduler = SlotScheduler::new();
        scheduler.enter_operational(10, 1000);
        scheduler
    }

    #[test]
    fn rtc_setup_never_transitions_internally() {
        let mut scheduler = SlotScheduler::new();
        assert_eq!(scheduler.update(5, 99_000), None);
        assert_eq!(scheduler.current_slot(), CommSlot::RtcSetup);
    }

    #[test]
    fn slots_progress_in_fixed_order_within_a_second() {
        let mut scheduler = operational_scheduler();

        assert_eq!(scheduler.update(10, 1000), None); // still Payload1
        assert_eq!(scheduler.update(10, 1249), None);
        assert_eq!(scheduler.update(10, 1250), Some(CommSlot::Payload2));
        assert_eq!(scheduler.update(10, 1499), None);
        assert_eq!(scheduler.update(10, 1500), Some(CommSlot::Ground1));
        assert_eq!(scheduler.update(10, 1666), None);
        assert_eq!(scheduler.update(10, 1667), Some(CommSlot::Ground2));
        assert_eq!(scheduler.update(10, 1833), None);
        assert_eq!(scheduler.update(10, 1834), Some(CommSlot::Ground3));
        assert_eq!(scheduler.update(10, 1999), None);
    }

    #[test]
    fn new_second_always_resets_to_payload1() {
        let mut scheduler = operational_scheduler();
        scheduler.update(10, 1900);
        assert_eq!(scheduler.current_slot(), CommSlot::Ground3);

        assert_eq!(scheduler.update(11, 2000), Some(CommSlot::Payload1));
        assert_eq!(scheduler.current_slot(), CommSlot::Payload1);
    }

    #[test]
    fn new_second_transitions_even_when_already_in_payload1() {
        let mut scheduler = operational_scheduler();
        assert_eq!(scheduler.current_slot(), CommSlot::Payload1);

        // Sparse ticks: the whole previous second passed unobserved. The new
        // second still re-enters Payload1 so its head gets retransmitted.
        assert_eq!(scheduler.update(11, 2100), Some(CommSlot::Payload1));
    }

    #[test]
    fn reevaluation_within_a_window_is_idempotent() {
        let mut scheduler = operational_scheduler();
        assert_eq!(scheduler.update(10, 1300), Some(CommSlot::Payload2));
        assert_eq!(scheduler.update(10, 1300), None);
        assert_eq!(scheduler.update(10, 1400), None);
        assert_eq!(scheduler.current_slot(), CommSlot::Payload2);
    }

    #[test]
    fn skipped_windows_land_directly_on_the_target() {
        let mut scheduler = operational_scheduler();
        // No ticks arrived during the payload-2 window
        assert_eq!(scheduler.update(10, 1700), Some(CommSlot::Ground2));
    }
}
