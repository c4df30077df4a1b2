// Notification pipeline for stamina alerts.
//
// Architecture:
// - model.rs: Per-account candidates and outgoing message types
// - format.rs: Text of individual lines and sentences
// - batcher.rs: Length-bounded batching of lines
// - engine.rs: Chooses short or list form and builds the messages
// - transport.rs: Delivery (Discord webhook)

pub mod batcher;
pub mod engine;
pub mod format;
pub mod model;
pub mod transport;
