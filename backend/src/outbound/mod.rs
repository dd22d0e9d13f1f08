//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL relational store using Diesel
//! - **document**: denormalised document store over Redis or memory
//! - **notification**: enrollment confirmations over an HTTP mail relay
//!
//! Adapters translate between domain types and storage or wire
//! representations. Enrollment rules live in the domain services.

pub mod document;
pub mod notification;
pub mod persistence;
