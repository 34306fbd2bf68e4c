//! flowdeck - a local-first project, issue and cycle tracker.
//!
//! This crate provides both a CLI application and a library. The library
//! exposes the [`storage::TrackerStorage`] trait together with the domain
//! types, query engine and statistics it works with.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod domain;
pub mod error;
pub mod query;
pub mod stats;
pub mod storage;

// Application context for command execution
pub mod app;

// Public CLI module (needed by binary)
pub mod cli;

// Command implementations
pub mod commands;

// Output formatting
pub mod output;
