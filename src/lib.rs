//! jsonlist - pick entries from a JSON array file and append new ones
//!
//! Imports a JSON document whose root is an array, shows its elements as a
//! checklist, prints the checked ones and appends new entries to the file.
//! [`crate::core::store`] holds the file contract; [`app`] holds the session state
//! a front end drives.

pub mod app;
pub mod cli;
pub mod core;
