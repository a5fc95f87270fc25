//! Command-line client for a host monitoring service.
//!
//! Hosts, latest metric values and notification channels are managed through
//! the service's HTTP API. Bulk operations live in [`application`]: metric
//! fetches are split into batches of [`domain::BATCH_LIMIT`] hosts and merged,
//! retirement is confirmed once and then runs host by host, stopping at the
//! first failure.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod interface;
pub mod json;
pub mod ports;
