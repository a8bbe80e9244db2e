//! Pending owner intent.
//!
//! After the owner picks "Add/Remove Admin" or "Broadcast" from the menu,
//! their next free-text message means something. That meaning is tracked
//! here explicitly, never inferred from the message content — a broadcast
//! that happens to be all digits must still go out as a broadcast.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingIntent {
    /// The next message is a user id whose admin membership gets toggled.
    AwaitingAdminId,
    /// The next message is the broadcast payload.
    AwaitingBroadcast,
}

/// In-memory intent per actor. Only owner-gated menu actions ever set one,
/// so plain users and admins stay intent-free.
#[derive(Default)]
pub struct Intents {
    inner: Mutex<HashMap<ActorId, PendingIntent>>,
}

impl Intents {
    /// Set (or replace) the actor's pending intent.
    pub fn set(&self, actor: ActorId, intent: PendingIntent) {
        self.inner
            .lock()
            .expect("intent lock poisoned")
            .insert(actor, intent);
    }

    pub fn get(&self, actor: ActorId) -> Option<PendingIntent> {
        self.inner
            .lock()
            .expect("intent lock poisoned")
            .get(&actor)
            .copied()
    }

    pub fn clear(&self, actor: ActorId) {
        self.inner
            .lock()
            .expect("intent lock poisoned")
            .remove(&actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_replaces_and_clear_forgets() {
        let intents = Intents::default();
        assert_eq!(intents.get(1), None);

        intents.set(1, PendingIntent::AwaitingAdminId);
        intents.set(1, PendingIntent::AwaitingBroadcast);
        assert_eq!(intents.get(1), Some(PendingIntent::AwaitingBroadcast));

        intents.clear(1);
        assert_eq!(intents.get(1), None);
    }

    #[test]
    fn intents_are_per_actor() {
        let intents = Intents::default();
        intents.set(1, PendingIntent::AwaitingAdminId);
        assert_eq!(intents.get(2), None);
    }
}
