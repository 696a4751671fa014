//! Per-entity key/value store with optional time-to-live and change notifications.
//!
//! Reads never panic on a type mismatch: asking for the wrong `T` behaves like a missing key.
//! Expiry is lazy: any read that observes an expired entry removes it, fires exactly one
//! [`BlackboardEvent::Expired`], and then answers as if the key were absent.
//! [`Blackboard::cleanup_expired`] performs the same work eagerly for every key.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::clock::{Clock, MonotonicClock, SharedClock};

/// Typed name for a blackboard entry.
///
/// Purely a convenience: the blackboard itself is keyed by string, so a `BbKey<T>` can be passed
/// anywhere a key is expected.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BbKey<T: 'static> {
    name: &'static str,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    pub const fn name(self) -> &'static str {
        self.name
    }

    pub fn get(self, blackboard: &mut Blackboard) -> Option<&T> {
        blackboard.get::<T>(self)
    }

    pub fn set(self, blackboard: &mut Blackboard, value: T) {
        blackboard.set(self, value);
    }
}

impl<T: 'static> AsRef<str> for BbKey<T> {
    fn as_ref(&self) -> &str {
        self.name
    }
}

/// Notification delivered to blackboard subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlackboardEvent<'a> {
    /// Fired by every `set` / `set_with_ttl`, even when the value did not change.
    Changed { key: &'a str },
    /// Fired by an explicit `remove`.
    Removed { key: &'a str },
    Expired { key: &'a str },
}

impl<'a> BlackboardEvent<'a> {
    pub fn key(&self) -> &'a str {
        match *self {
            BlackboardEvent::Changed { key }
            | BlackboardEvent::Removed { key }
            | BlackboardEvent::Expired { key } => key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&BlackboardEvent<'_>)>;

struct Entry {
    value: Box<dyn Any>,
    expires_at: Option<f64>,
}

impl Entry {
    fn is_expired(&self, now: f64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

pub struct Blackboard {
    entries: BTreeMap<String, Entry>,
    clock: SharedClock,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for Blackboard {
    fn default() -> Self {
        Self::with_clock(Rc::new(MonotonicClock::new()))
    }
}

impl fmt::Debug for Blackboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blackboard")
            .field("keys", &self.entries.keys().collect::<Vec<_>>())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Blackboard {
    /// Blackboard measuring TTLs against real time.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: SharedClock) -> Self {
        Self {
            entries: BTreeMap::new(),
            clock,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&BlackboardEvent<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn set<T: 'static>(&mut self, key: impl AsRef<str>, value: T) {
        self.insert(key.as_ref(), Box::new(value), None);
    }

    /// Store `value` until `ttl_seconds` have elapsed on the blackboard clock.
    ///
    /// An infinite TTL never expires; a zero, negative or NaN TTL is stored already expired.
    pub fn set_with_ttl<T: 'static>(&mut self, key: impl AsRef<str>, value: T, ttl_seconds: f64) {
        let now = self.clock.now();
        let expires_at = if ttl_seconds == f64::INFINITY {
            None
        } else if ttl_seconds > 0.0 {
            Some(now + ttl_seconds)
        } else {
            Some(now)
        };
        self.insert(key.as_ref(), Box::new(value), expires_at);
    }

    pub fn get<T: 'static>(&mut self, key: impl AsRef<str>) -> Option<&T> {
        let key = key.as_ref();
        self.expire_if_stale(key);
        self.entries.get(key)?.value.downcast_ref::<T>()
    }

    pub fn get_mut<T: 'static>(&mut self, key: impl AsRef<str>) -> Option<&mut T> {
        let key = key.as_ref();
        self.expire_if_stale(key);
        self.entries.get_mut(key)?.value.downcast_mut::<T>()
    }

    /// Cloned value, or `None` when missing, expired or of another type.
    pub fn try_get<T: Clone + 'static>(&mut self, key: impl AsRef<str>) -> Option<T> {
        self.get::<T>(key).cloned()
    }

    /// Cloned value, or `default` when missing, expired or of another type.
    pub fn get_or<T: Clone + 'static>(&mut self, key: impl AsRef<str>, default: T) -> T {
        self.try_get(key).unwrap_or(default)
    }

    pub fn has(&mut self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        self.expire_if_stale(key);
        self.entries.contains_key(key)
    }

    /// `true` when the key holds a live value of type `T`.
    pub fn has_typed<T: 'static>(&mut self, key: impl AsRef<str>) -> bool {
        self.get::<T>(key).is_some()
    }

    /// Seconds until the entry expires; `None` when absent or without TTL.
    pub fn remaining_ttl(&mut self, key: impl AsRef<str>) -> Option<f64> {
        let key = key.as_ref();
        self.expire_if_stale(key);
        let at = self.entries.get(key)?.expires_at?;
        Some((at - self.clock.now()).max(0.0))
    }

    /// Returns `true` if a live entry was removed.
    pub fn remove(&mut self, key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        if self.expire_if_stale(key) {
            return false;
        }
        if self.entries.remove(key).is_none() {
            return false;
        }
        Self::notify(&mut self.subscribers, BlackboardEvent::Removed { key });
        true
    }

    /// Drop every entry without notifying subscribers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove every expired entry, notifying once per entry. Returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            Self::notify(&mut self.subscribers, BlackboardEvent::Expired { key });
        }

        if !expired.is_empty() {
            tracing::trace!(count = expired.len(), "blackboard swept expired entries");
        }
        expired.len()
    }

    /// Live keys in sorted order.
    pub fn keys(&mut self) -> Vec<String> {
        self.cleanup_expired();
        self.entries.keys().cloned().collect()
    }

    pub fn len(&mut self) -> usize {
        self.cleanup_expired();
        self.entries.len()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, key: &str, value: Box<dyn Any>, expires_at: Option<f64>) {
        self.entries
            .insert(key.to_owned(), Entry { value, expires_at });
        Self::notify(&mut self.subscribers, BlackboardEvent::Changed { key });
    }

    fn expire_if_stale(&mut self, key: &str) -> bool {
        let now = self.clock.now();
        let stale = self.entries.get(key).is_some_and(|e| e.is_expired(now));
        if stale {
            self.entries.remove(key);
            tracing::trace!(key, "blackboard entry expired");
            Self::notify(&mut self.subscribers, BlackboardEvent::Expired { key });
        }
        stale
    }

    fn notify(subscribers: &mut [(SubscriptionId, Subscriber)], event: BlackboardEvent<'_>) {
        for (_, callback) in subscribers.iter_mut() {
            callback(&event);
        }
    }
}
