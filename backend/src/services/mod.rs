//! Module for core business logic services.
//!
//! This module encapsulates services that perform specific business
//! operations and orchestrate interactions between repositories and external
//! collaborators.

pub mod narration_service;
pub mod post_service;
pub mod user_service;
