// crates/cohost-core/src/lib.rs
// ============================================================================
// Module: Cohost Core Library
// Description: Public API surface for the Cohost core.
// Purpose: Expose request model, mount capabilities, and prefix routing.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Cohost core provides the backend-agnostic model for hosting several
//! independently configured HTTP applications on one listener: the request
//! and response types handlers see, the mount and lifecycle capability
//! contracts, and the longest-prefix path multiplexer. It contains no
//! transport code and integrates through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AppHandler;
pub use interfaces::AppLifecycle;
pub use interfaces::AppMount;
pub use interfaces::NoopLifecycle;
pub use interfaces::StartError;
pub use interfaces::StopError;
