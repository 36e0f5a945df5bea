//! Host connectivity signal.
//!
//! The classifier never reads global state; the host passes in whatever it
//! knows about being online. `None` means "no signal" and never
//! short-circuits classification.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Reports whether the host is currently online.
pub trait ConnectivitySignal: Send + Sync {
    /// `Some(false)` when known offline, `Some(true)` when known online,
    /// `None` when the host has no signal.
    fn is_online(&self) -> Option<bool>;
}

/// A fixed connectivity reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
    /// No signal available, e.g. server-side rendering.
    #[default]
    Unknown,
}

impl From<Option<bool>> for Connectivity {
    fn from(online: Option<bool>) -> Self {
        match online {
            Some(true) => Connectivity::Online,
            Some(false) => Connectivity::Offline,
            None => Connectivity::Unknown,
        }
    }
}

impl ConnectivitySignal for Connectivity {
    fn is_online(&self) -> Option<bool> {
        match self {
            Connectivity::Online => Some(true),
            Connectivity::Offline => Some(false),
            Connectivity::Unknown => None,
        }
    }
}

const UNKNOWN: u8 = 0;
const ONLINE: u8 = 1;
const OFFLINE: u8 = 2;

/// A shared, updatable connectivity reading.
///
/// Clones observe the same state, so the host can keep one handle to flip
/// on online/offline events while classifiers hold others.
#[derive(Clone, Debug, Default)]
pub struct ConnectivityFlag {
    state: Arc<AtomicU8>,
}

impl ConnectivityFlag {
    pub fn new(initial: Connectivity) -> Self {
        let flag = Self::default();
        flag.set(initial);
        flag
    }

    pub fn set(&self, connectivity: Connectivity) {
        let raw = match connectivity {
            Connectivity::Unknown => UNKNOWN,
            Connectivity::Online => ONLINE,
            Connectivity::Offline => OFFLINE,
        };
        self.state.store(raw, Ordering::Relaxed);
    }

    pub fn get(&self) -> Connectivity {
        match self.state.load(Ordering::Relaxed) {
            ONLINE => Connectivity::Online,
            OFFLINE => Connectivity::Offline,
            _ => Connectivity::Unknown,
        }
    }
}

impl ConnectivitySignal for ConnectivityFlag {
    fn is_online(&self) -> Option<bool> {
        self.get().is_online()
    }
}
