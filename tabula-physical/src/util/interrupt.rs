//! This module defines [Interrupt].

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::error::Error;

/// Shared flag that can be used to cancel a running join from another thread.
///
/// Join algorithms poll the flag at natural checkpoints
/// and return [Error::Cancelled] once it has been raised.
#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    /// Create a new [Interrupt] that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every operation observing this flag.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns whether cancellation has been requested.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns [Error::Cancelled] if cancellation has been requested.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_raised() {
            log::debug!("join interrupted");
            return Err(Error::Cancelled);
        }

        Ok(())
    }
}
