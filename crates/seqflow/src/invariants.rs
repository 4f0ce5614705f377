//! Debug assertion macros for sequence terminal-signal discipline.
//!
//! These macros provide runtime checks for the operator contracts. They are
//! only active in debug builds (`#[cfg(debug_assertions)]`), so there is zero
//! overhead in release builds.

// =============================================================================
// INV-SEQ-01: Single Terminal Signal
// =============================================================================

/// Assert that a terminal signal is only emitted while the operator is live.
///
/// **Invariant**: `emit(terminal) → !done`
///
/// Used in: operators immediately before recording a terminal signal
macro_rules! debug_assert_single_terminal {
    ($already_done:expr) => {
        debug_assert!(
            !$already_done,
            "INV-SEQ-01 violated: terminal signal emitted after the sequence ended"
        )
    };
}

// =============================================================================
// INV-SEQ-02: Fused After Terminal
// =============================================================================

/// Assert that the fused state is recorded together with the terminal signal.
///
/// **Invariant**: `emit(terminal) → done`
///
/// Used in: operators immediately after recording a terminal signal
macro_rules! debug_assert_fused {
    ($done:expr) => {
        debug_assert!(
            $done,
            "INV-SEQ-02 violated: terminal signal emitted without fusing the sequence"
        )
    };
}

// =============================================================================
// Re-exports for crate-internal use
// =============================================================================

pub(crate) use debug_assert_fused;
pub(crate) use debug_assert_single_terminal;
