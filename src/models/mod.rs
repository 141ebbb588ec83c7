//! Core data models for the geocoding system.

pub mod address;

pub use address::AddressRecord;
