//! Core business logic - framework-agnostic workflow operations.
//!
//! Every mutating operation takes the acting admin explicitly and returns a
//! typed [`crate::errors::Error`] on failure.

/// Partner applications: review and provisioning
pub mod application;

/// Admin identity, sessions and the authorization gate
pub mod auth;

/// Editorial columns for the marketing site
pub mod column;

/// Contractor decision workflow and diagnosis status changes
pub mod decision;

/// Customer and diagnosis request intake
pub mod diagnosis;

/// Customer inquiries
pub mod inquiry;

/// Order lifecycle after a contractor decision
pub mod order;

/// Partner accounts and profiles
pub mod partner;

/// Quotation submission and lookup
pub mod quotation;

/// Pipeline counts and their text rendering
pub mod report;

/// The at-most-one-selected-quotation predicate
pub mod selection;

/// Enum codes and Japanese display labels
pub mod vocabulary;
