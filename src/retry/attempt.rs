//! Per-attempt information and outcomes.

/// Information about the attempt currently running, passed to the attempt
/// function.
///
/// Attempts are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    number: u32,
    max_attempts: u32,
}

impl Attempt {
    pub(crate) const fn new(number: u32, max_attempts: u32) -> Self {
        Self {
            number,
            max_attempts,
        }
    }

    /// The 1-based number of this attempt.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Maximum number of attempts allowed by the policy.
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// True exactly on the final attempt allowed by the policy.
    ///
    /// On the last attempt the attempt function should produce a final value
    /// or error instead of [`Outcome::Retry`].
    pub const fn is_last(&self) -> bool {
        self.number >= self.max_attempts
    }

    /// Attempts still available after this one.
    pub const fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.number)
    }
}

/// What an attempt decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Not ready yet; run the next attempt.
    Retry,
    /// Finished with a value.
    Done(T),
}

impl<T> Outcome<T> {
    /// Returns true if this outcome asks for another attempt.
    pub fn is_retry(&self) -> bool {
        matches!(self, Outcome::Retry)
    }

    /// Get the value if the attempt finished.
    pub fn into_done(self) -> Option<T> {
        match self {
            Outcome::Done(value) => Some(value),
            Outcome::Retry => None,
        }
    }
}
