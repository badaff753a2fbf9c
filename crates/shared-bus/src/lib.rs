//! # Shared Bus - Registry Notification Bus
//!
//! Carries the notifications a modules proxy emits after every committed
//! mutation (`ModuleAdded`, `ModuleRemoved`, ...) to whoever needs to confirm
//! state transitions: deployment scripts, governance executors, audit sinks.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ ModulesProxy │                    │  Deployment  │
//! │              │    publish()       │   tooling    │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Publishing is synchronous and never blocks the registry writer: events are
//! dropped (and logged) when no subscriber is listening.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, RegistryEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
