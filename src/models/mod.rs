//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::RecordRequest;
pub use responses::{HealthResponse, MessageResponse, RecordResponse, StatsResponse};
