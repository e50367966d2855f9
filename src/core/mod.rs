//! Core module - store, engine, event bus and scheduling

mod engine;
mod event_bus;
mod scheduler;
mod store;

pub use engine::Engine;
pub use event_bus::{Event, EventBus, StoreEvent};
pub use scheduler::Scheduler;
pub use store::{SimulationState, Snapshot, Store};
