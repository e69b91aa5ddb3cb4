//! Loading and fetch flags.
//!
//! `is_fetching` tracks the outstanding request. `is_loading` drives the
//! spinner and only turns on once a fetch has been outstanding longer than the
//! configured loading delay, so fast responses never flash it.

/// Loading flags of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadingState {
    /// A fetch call is outstanding.
    pub is_fetching: bool,
    /// The loading delay elapsed while fetching.
    pub is_loading: bool,
}

impl LoadingState {
    /// Marks a fetch as outstanding. The caller arms the loading delay timer.
    pub fn begin_fetch(self) -> Self {
        Self {
            is_fetching: true,
            ..self
        }
    }

    /// Clears both flags, whatever state the delay timer is in.
    pub fn end_fetch(self) -> Self {
        Self {
            is_fetching: false,
            is_loading: false,
        }
    }

    /// Applied when the loading delay timer fires.
    ///
    /// Has no effect once the fetch has completed.
    pub fn delay_elapsed(self) -> Self {
        Self {
            is_loading: self.is_fetching,
            ..self
        }
    }
}
