use chrono::{DateTime, FixedOffset};
use dashmap::{mapref::entry::Entry, DashMap};
use std::{sync::Arc, time::Duration};

use crate::{service::user::AccountId, utils::Clock};

/// Fixed-window throttle: at most one accepted action per interval per user.
///
/// Only accepted actions move the window. A rejected attempt leaves the stored
/// timestamp alone, so the next acceptance is measured from the last accepted one.
#[derive(Clone)]
pub struct SpamGate {
    last_accepted: Arc<DashMap<AccountId, DateTime<FixedOffset>>>,
    clock: Arc<dyn Clock>,
}

impl SpamGate {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        info!("Initializing spam gate");
        Self {
            last_accepted: Arc::new(DashMap::new()),
            clock,
        }
    }

    pub fn allow(&self, user_id: AccountId, min_interval: Duration) -> bool {
        let now = self.clock.now();

        match self.last_accepted.entry(user_id) {
            Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
            Entry::Occupied(mut entry) => {
                if elapsed_since(*entry.get(), now).is_some_and(|elapsed| elapsed >= min_interval) {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Time left until `user_id` would be accepted again, `None` if already allowed.
    pub fn remaining(&self, user_id: AccountId, min_interval: Duration) -> Option<Duration> {
        let last = *self.last_accepted.get(&user_id)?;
        let elapsed = elapsed_since(last, self.clock.now()).unwrap_or_default();
        min_interval.checked_sub(elapsed).filter(|left| !left.is_zero())
    }

    /// Forgets users whose last accepted action is older than `max_age`.
    pub fn evict_older_than(&self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let before = self.last_accepted.len();

        self.last_accepted
            .retain(|_, last| elapsed_since(*last, now).map_or(true, |age| age < max_age));

        let evicted = before.saturating_sub(self.last_accepted.len());
        if evicted > 0 {
            debug!("Evicted {} spam gate entries", evicted);
        }
        evicted
    }

    pub fn tracked_users(&self) -> usize {
        self.last_accepted.len()
    }
}

// `None` when the clock went backwards past `since`.
fn elapsed_since(since: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Option<Duration> {
    now.signed_duration_since(since).to_std().ok()
}
