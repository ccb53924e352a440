//! Decrypt-lock state machine.
//!
//! A single bit of service-instance state with a one-way transition. The
//! lock starts clear on every service instantiation, the `Lock` command sets
//! it, and nothing clears it short of tearing the instance down and creating
//! a new one - the dispatcher has no unlock path.
//!
//! # State Machine
//!
//! ```text
//! ┌──────────┐   set_locked()   ┌────────┐
//! │ Unlocked │─────────────────>│ Locked │──┐ set_locked()
//! └──────────┘                  └────────┘<─┘ (no-op)
//! ```

/// Lock state of one service instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Decryption permitted.
    Unlocked,
    /// Decryption permanently refused for this instance.
    Locked,
}

/// One-way decrypt latch owned by the dispatcher.
///
/// Locking an already-locked latch is a no-op, not an error; there is no
/// caller-visible distinction between "newly locked" and "already locked".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecryptLock {
    state: LockState,
}

impl DecryptLock {
    /// Create an unlocked latch (service start).
    #[must_use]
    pub const fn new() -> Self {
        Self { state: LockState::Unlocked }
    }

    /// Latch to [`LockState::Locked`]. Idempotent.
    pub fn set_locked(&mut self) {
        self.state = LockState::Locked;
    }

    /// Whether the latch is set. Pure read.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        matches!(self.state, LockState::Locked)
    }

    /// Current state. Pure read.
    #[must_use]
    pub const fn state(&self) -> LockState {
        self.state
    }
}

impl Default for DecryptLock {
    fn default() -> Self {
        Self::new()
    }
}
