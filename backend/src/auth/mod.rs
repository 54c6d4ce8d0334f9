//! Authentication module for credential issuance and validation.
//!
//! This module provides the public interface for user registration, login,
//! and refresh-token rotation, along with the request/response models and
//! HTTP plumbing around the core service.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
