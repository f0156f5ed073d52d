//! Scheduled maintenance sweeps for the helpdesk backend.
//!
//! This crate provides:
//! - A cron scheduler that drains the notification retry queue
//! - Periodic eviction of expired directory cache and rate limiter state
//! - Daily retention pruning of stored notifications

pub mod scheduler;

pub use scheduler::MaintenanceScheduler;
