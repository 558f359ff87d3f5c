// Simulation events
//
// Discrete outcomes of a tick, queued and drained by the match controller.
// An explicit queue instead of subscriber callbacks keeps event ordering
// visible: consumers see events in the order the phases produced them.

use crate::game::abilities::AbilityKind;
use crate::game::combat::body::PlayerId;

/// A discrete event produced during one simulation tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// A body's spin changed through a discrete cause (damage, recovery,
    /// dash cost); passive decay does not fire this, consumers poll
    /// `spin_percentage` for bars
    SpinChanged { player: PlayerId, percentage: f32 },
    /// A dash impulse was executed
    DashExecuted { player: PlayerId },
    /// A special ability went off
    SpecialExecuted { player: PlayerId, kind: AbilityKind },
    /// A collision dealt damage to the opponent
    CollisionWithOpponent {
        player: PlayerId,
        opponent: PlayerId,
        damage_dealt: f32,
    },
    /// Spin crossed the elimination threshold; fires once per round
    Eliminated { player: PlayerId },
}

/// Single-threaded event queue drained once per tick by the controller
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<SimEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = SimEvent>) {
        self.events.extend(events);
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
