//! Non-aborting assertion helpers and the fatal validation error.
//!
//! `Diagnostics` records every failed check and keeps going. Callers group the
//! structural checks for one sub-transaction and turn a failed group into a
//! `ValidationError`; policy checks are only recorded.

use std::fmt;
use thiserror::Error;

/// Structural failure that makes further field extraction unsafe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid ETH transfer at position {position}")]
    EthTransfer { position: usize },
    #[error("Invalid WETH unwrap at position {position}")]
    WethUnwrap { position: usize },
    #[error("Invalid ERC20 transfer at position {position}")]
    Erc20Transfer { position: usize },
}

impl ValidationError {
    /// 1-based position of the offending sub-transaction.
    pub fn position(&self) -> usize {
        match self {
            ValidationError::EthTransfer { position }
            | ValidationError::WethUnwrap { position }
            | ValidationError::Erc20Transfer { position } => *position,
        }
    }
}

/// Observed vs. expected pair attached to a failed equality check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub actual: String,
    pub expected: String,
}

/// One recorded issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub mismatch: Option<Mismatch>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mismatch {
            Some(m) => write!(
                f,
                "Expected: {}; is: {}. {}",
                m.expected, m.actual, self.message
            ),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Ordered log of failed checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mismatch unless `actual == expected`. Returns whether they matched.
    pub fn check_eq<T>(&mut self, actual: &T, expected: &T, message: impl Into<String>) -> bool
    where
        T: PartialEq + fmt::Display + ?Sized,
    {
        if actual == expected {
            return true;
        }
        self.record(Diagnostic {
            message: message.into(),
            mismatch: Some(Mismatch {
                actual: actual.to_string(),
                expected: expected.to_string(),
            }),
        });
        false
    }

    /// Record `message` unless `condition` holds. Returns `condition`.
    pub fn check(&mut self, condition: bool, message: impl Into<String>) -> bool {
        if !condition {
            self.record(Diagnostic {
                message: message.into(),
                mismatch: None,
            });
        }
        condition
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

/// True when every check in the group passed. All checks have already run.
pub fn all_passed(checks: &[bool]) -> bool {
    checks.iter().all(|ok| *ok)
}
