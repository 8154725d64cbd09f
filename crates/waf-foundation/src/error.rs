#![forbid(unsafe_code)]

//! Errors raised while building a weak subscription.

use std::fmt;

/// Errors from weak-event operations.
///
/// Stale subscribers are not an error: a proxy whose subscriber or manager
/// is gone detaches itself silently on the next raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakEventError {
    /// A required builder argument was never supplied. Nothing was
    /// registered on the publisher.
    MissingArgument {
        /// Name of the builder setter that was not called.
        name: &'static str,
    },
}

impl fmt::Display for WeakEventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { name } => write!(f, "missing required argument '{name}'"),
        }
    }
}

impl std::error::Error for WeakEventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_argument() {
        let err = WeakEventError::MissingArgument { name: "publisher" };
        assert_eq!(err.to_string(), "missing required argument 'publisher'");
    }
}
