pub mod alerts;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod ledger;
pub mod model;
pub mod odds;
pub mod power;
pub mod rpc;
pub mod schedule;
pub mod stats;
pub mod tracker;

#[cfg(test)]
mod fakes;
