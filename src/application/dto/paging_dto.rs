//! Pagination DTOs.

/// Why a batch request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another batch is already in flight.
    InFlight,
    /// The catalog has been exhausted.
    Exhausted,
}

impl SkipReason {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InFlight => "load already in flight",
            Self::Exhausted => "catalog exhausted",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Summary of a batch that ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Items appended to the list.
    pub appended: usize,
    /// Offset after the batch.
    pub offset: usize,
    /// Whether further batches may load.
    pub has_more: bool,
    /// The catalog fetch failed and was treated as an empty page.
    pub fetch_failed: bool,
}

/// Result of a `load_next_batch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The guard rejected the call; nothing changed.
    Skipped(SkipReason),
    /// A page was fetched and applied.
    Loaded(PageSummary),
}

impl BatchOutcome {
    /// Returns the summary if the batch ran.
    #[must_use]
    pub const fn summary(&self) -> Option<&PageSummary> {
        match self {
            Self::Loaded(summary) => Some(summary),
            Self::Skipped(_) => None,
        }
    }

    /// Returns whether the call was rejected by the guard.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}
