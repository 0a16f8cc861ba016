// SPDX-License-Identifier: MPL-2.0
//! Application layer - ports the capture core depends on.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Adapters in [`crate::video_player`] implement application layer ports
//! - The capture orchestrator is generic over those ports

pub mod port;
