//! Pitfall risk assessment service
//!
//! Gates a numeric risk scorer behind a multi-step session workflow: a
//! user authenticates, selects a location, then submits eleven ground
//! measurements to receive a probability of pitfall and a discretized
//! risk label.
//!
//! ## Architecture
//! The user directory and the session state machine gate every request;
//! the assessment workflow is reached only once their preconditions hold,
//! then parses the measurements, invokes the risk scorer and classifies
//! the probability.
//!
//! ## Quick Start
//!
//! ```rust
//! use pitfall_assessor::assessment::{classify, RiskLabel};
//!
//! let result = classify(0.82);
//! assert_eq!(result.class, 1);
//! assert_eq!(result.label, RiskLabel::High);
//! ```

// Core error handling
pub mod error;

// Feature vector contract
pub mod features;

// Credential directory
pub mod directory;

// Session state machine and store
pub mod session;

// Risk scorer strategies
pub mod scorer;

// Assessment workflow and classification
pub mod assessment;

// Advisory chatbot responder
pub mod chatbot;

// REST API and process configuration (when the server feature is enabled)
#[cfg(feature = "server")]
pub mod api;
#[cfg(feature = "server")]
pub mod config;
