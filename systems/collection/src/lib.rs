#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collection system that records captured creatures against a user.

mod store;

pub use store::{CollectionStore, JsonFileStore, MemoryStore, StoreError, UserId, UserRecord};

use weather_garden_core::Event;

/// System that forwards capture events to a collection store.
///
/// Store failures are logged and never reach the world; a capture always
/// succeeds visually even when it could not be recorded.
#[derive(Debug)]
pub struct Collection {
    user: UserId,
}

impl Collection {
    /// Creates a collection system that records captures for `user`.
    #[must_use]
    pub fn new(user: UserId) -> Self {
        Self { user }
    }

    /// User the system records captures for.
    #[must_use]
    pub fn user(&self) -> UserId {
        self.user
    }

    /// Consumes world events and records every capture in `store`.
    pub fn handle<S>(&mut self, events: &[Event], store: &mut S)
    where
        S: CollectionStore + ?Sized,
    {
        for event in events {
            let Event::CreatureCaptured { creature, .. } = event else {
                continue;
            };

            match store.record_capture(self.user, *creature) {
                Ok(true) => log::info!("collected {creature} for user {}", self.user.get()),
                Ok(false) => log::debug!("{creature} already collected by user {}", self.user.get()),
                Err(error) => log::warn!("failed to record capture of {creature}: {error}"),
            }
        }
    }
}
