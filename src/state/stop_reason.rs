//! Termination reasons for a crawl
//!
//! Every crawl ends with exactly one of these. All of them keep the records
//! collected before the stop.

use std::fmt;

/// Why the crawl loop stopped
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StopReason {
    // ===== Natural Stops =====
    /// The configured maximum number of pages was fetched
    PageLimitReached,

    /// No next-page link was found, or pagination is not configured
    PaginationExhausted,

    /// The crawl was interrupted (Ctrl-C) before it finished
    Interrupted,

    // ===== Error Stops =====
    /// robots.txt forbids fetching the URL
    PolicyDenied {
        /// The blocked URL
        url: String,
    },

    /// The page could not be fetched
    TransportError {
        /// The URL that failed
        url: String,
        /// Underlying diagnostic
        message: String,
    },
}

impl StopReason {
    /// Returns true if the crawl ended because of a failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::PolicyDenied { .. } | Self::TransportError { .. })
    }

    /// Returns true if the crawl ran to a normal end
    pub fn is_natural(&self) -> bool {
        !self.is_error()
    }

    /// Short machine-friendly name of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageLimitReached => "page_limit_reached",
            Self::PaginationExhausted => "pagination_exhausted",
            Self::Interrupted => "interrupted",
            Self::PolicyDenied { .. } => "policy_denied",
            Self::TransportError { .. } => "transport_error",
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageLimitReached => write!(f, "page limit reached"),
            Self::PaginationExhausted => write!(f, "no next page"),
            Self::Interrupted => write!(f, "interrupted"),
            Self::PolicyDenied { url } => write!(f, "robots.txt disallows access to {}", url),
            Self::TransportError { url, message } => {
                write!(f, "error fetching {}: {}", url, message)
            }
        }
    }
}
