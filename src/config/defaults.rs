// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the crate. Constants are organized by category.
//!
//! # Categories
//!
//! - **Capacity**: How many notifications may be live at once
//! - **Auto-dismiss**: Per-kind countdown durations
//! - **Animation**: Cosmetic stagger and exit grace timings
//! - **Progress**: Countdown tick interval

// ==========================================================================
// Capacity Defaults
// ==========================================================================

/// Maximum number of live (non-removed) notifications.
pub const DEFAULT_MAX_ACTIVE: usize = 5;

/// Lower bound for `max_active`; a zero-capacity queue could never show anything.
pub const MIN_MAX_ACTIVE: usize = 1;

// ==========================================================================
// Auto-dismiss Defaults
// ==========================================================================

/// Auto-dismiss delay for success notifications (in milliseconds).
pub const DEFAULT_SUCCESS_MS: u64 = 5_000;

/// Auto-dismiss delay for info notifications (in milliseconds).
pub const DEFAULT_INFO_MS: u64 = 5_000;

/// Auto-dismiss delay for warning notifications (in milliseconds).
pub const DEFAULT_WARNING_MS: u64 = 7_000;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Delay before the first queued notification becomes visible (in milliseconds).
pub const DEFAULT_STAGGER_BASE_MS: u64 = 50;

/// Additional enter delay per queue position (in milliseconds).
pub const DEFAULT_STAGGER_STEP_MS: u64 = 100;

/// Time a dismissed notification stays in the Removing state (in milliseconds).
pub const DEFAULT_EXIT_GRACE_MS: u64 = 300;

// ==========================================================================
// Progress Defaults
// ==========================================================================

/// Interval between countdown progress ticks (in milliseconds).
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 50;

/// Smallest accepted progress interval (in milliseconds).
pub const MIN_PROGRESS_INTERVAL_MS: u64 = 1;
