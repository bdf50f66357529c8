//! Deferred events on the session's logical clock.
//!
//! Everything asynchronous in a match (the opponent's think timer, the
//! opponent's timed unblock, the knockout-to-victory delay, and completion of
//! engine-side clips) is tied to a generation. A restart bumps the generation
//! and drops the queue, so work issued before the restart can never land in
//! the new match.

use serde::{Deserialize, Serialize};

use crate::types::Side;

/// Handle for engine-side work whose completion the engine reports back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub generation: u32,
    pub serial: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEvent {
    OpponentThink,
    Unblock(Side),
    Victory,
}

#[derive(Clone, Debug)]
struct Scheduled {
    due_ms: f64,
    order: u64,
    generation: u32,
    event: TimedEvent,
    every_ms: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now_ms: f64,
    generation: u32,
    next_serial: u32,
    next_order: u64,
    pending: Vec<Scheduled>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn issue(&mut self) -> Ticket {
        let ticket = Ticket {
            generation: self.generation,
            serial: self.next_serial,
        };
        self.next_serial = self.next_serial.wrapping_add(1);
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    pub fn after(&mut self, delay_ms: f64, event: TimedEvent) {
        self.push(delay_ms, event, None);
    }

    /// Fire `event` every `interval_ms`, first at `now + interval_ms`.
    pub fn every(&mut self, interval_ms: f64, event: TimedEvent) {
        self.push(interval_ms, event, Some(interval_ms));
    }

    fn push(&mut self, delay_ms: f64, event: TimedEvent, every_ms: Option<f64>) {
        let order = self.next_order;
        self.next_order += 1;
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0),
            order,
            generation: self.generation,
            event,
            every_ms: every_ms.filter(|ms| *ms > 0.0),
        });
    }

    /// Move the clock forward and return the events that came due, in order.
    ///
    /// A repeating event fires at most once per call. Time it missed beyond
    /// one interval is dropped, so its next firing is never earlier than now.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<TimedEvent> {
        if dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }
        let mut fired = Vec::new();
        let mut requeue = Vec::new();
        loop {
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, s)| s.due_ms <= self.now_ms)
                .min_by(|(_, a), (_, b)| {
                    a.due_ms.total_cmp(&b.due_ms).then(a.order.cmp(&b.order))
                })
                .map(|(i, _)| i);
            let Some(index) = next else { break };

            let mut due = self.pending.swap_remove(index);
            if due.generation != self.generation {
                continue;
            }
            fired.push(due.event);
            if let Some(interval) = due.every_ms {
                due.due_ms = (due.due_ms + interval).max(self.now_ms);
                due.order = self.next_order;
                self.next_order += 1;
                requeue.push(due);
            }
        }
        self.pending.extend(requeue);
        fired
    }

    /// Invalidate every pending event and outstanding ticket.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.pending.clear();
    }
}
