//! `storehub-events` — integration-event mechanics.
//!
//! Events here are **post-commit notifications**: the engine publishes them
//! after a state change has definitively committed, so external consumers
//! (order-confirmation mailer, payment reconciliation, audit) can react.
//! They are not a source of truth and are never replayed into state.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
