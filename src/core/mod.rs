//! Core functionality: the JSON document store, the checklist view of a document, and configuration

pub mod config;
pub mod document;
pub mod store;
