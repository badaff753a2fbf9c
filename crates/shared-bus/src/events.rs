//! # Registry Events
//!
//! Every event names the proxy that emitted it so one bus can serve several
//! routers (Staking, LoanToken, Protocol).

use serde::{Deserialize, Serialize};
use shared_types::{Address, ModuleName, Selector};

/// All notifications published to the bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    // =========================================================================
    // MODULES PROXY
    // =========================================================================
    /// A module became fully active.
    ModuleAdded {
        proxy: Address,
        module: Address,
        selectors: Vec<Selector>,
    },

    /// A module lost its full selector coverage.
    ModuleRemoved {
        proxy: Address,
        module: Address,
        selectors: Vec<Selector>,
    },

    /// Coverage moved from one module to another in one step.
    ModuleReplaced {
        proxy: Address,
        from: Address,
        to: Address,
    },

    /// Governance capability handed to a new owner.
    OwnershipTransferred {
        proxy: Address,
        previous: Address,
        new_owner: Address,
    },

    // =========================================================================
    // BEACON
    // =========================================================================
    /// A name was (re)pointed at an implementation.
    BeaconModuleRegistered {
        proxy: Address,
        name: ModuleName,
        implementation: Address,
        index: u64,
    },

    /// Beacon lookups were paused or resumed.
    BeaconPauseChanged { proxy: Address, paused: bool },
}

impl RegistryEvent {
    /// Get the topic for this event.
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ModuleAdded { .. } | Self::ModuleRemoved { .. } | Self::ModuleReplaced { .. } => {
                EventTopic::Modules
            }
            Self::OwnershipTransferred { .. } => EventTopic::Ownership,
            Self::BeaconModuleRegistered { .. } | Self::BeaconPauseChanged { .. } => {
                EventTopic::Beacon
            }
        }
    }

    /// The proxy that emitted this event.
    #[must_use]
    pub fn source_proxy(&self) -> Address {
        match self {
            Self::ModuleAdded { proxy, .. }
            | Self::ModuleRemoved { proxy, .. }
            | Self::ModuleReplaced { proxy, .. }
            | Self::OwnershipTransferred { proxy, .. }
            | Self::BeaconModuleRegistered { proxy, .. }
            | Self::BeaconPauseChanged { proxy, .. } => *proxy,
        }
    }
}

/// Event topics for filtering subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Selector-routed module changes.
    Modules,
    /// Name-keyed beacon changes.
    Beacon,
    /// Governance capability changes.
    Ownership,
    /// All events (wildcard).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to subscribe to (empty = all).
    pub topics: Vec<EventTopic>,
    /// Emitting proxies to accept (empty = all).
    pub source_proxies: Vec<Address>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_proxies: Vec::new(),
        }
    }

    /// Create a filter for events emitted by specific proxies.
    #[must_use]
    pub fn from_proxies(proxies: Vec<Address>) -> Self {
        Self {
            topics: Vec::new(),
            source_proxies: proxies,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &RegistryEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match =
            self.source_proxies.is_empty() || self.source_proxies.contains(&event.source_proxy());

        topic_match && source_match
    }
}
