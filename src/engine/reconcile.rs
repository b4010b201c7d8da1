//! Batch reconciliation: envelope gate plus a single linear scan.

use super::classifier::Classifier;
use super::validation::{Diagnostic, Diagnostics, ValidationError};
use super::{AddressRegistry, ReconciliationPolicy, MULTISEND_METHOD, NATIVE_DECIMALS};
use crate::domain::{Amount, ExpectedPayout, SubTransaction, Total, Transfer, TxDetails};
use std::fmt;
use thiserror::Error;

/// Running totals per asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub native: Total,
    pub token: Total,
}

/// Aggregate judgement shown to the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    RequiresInvestigation,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "Transaction is valid"),
            Verdict::RequiresInvestigation => {
                write!(f, "Transaction is invalid and requires investigation")
            }
        }
    }
}

/// Everything a completed scan produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationResult {
    /// Transfers in batch order.
    pub transfers: Vec<Transfer>,
    pub totals: Totals,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReconciliationResult {
    /// Valid only when no check failed anywhere in the run.
    pub fn verdict(&self) -> Verdict {
        if self.diagnostics.is_empty() {
            Verdict::Valid
        } else {
            Verdict::RequiresInvestigation
        }
    }
}

/// A structural failure stopped the scan. Carries the diagnostics gathered up to
/// and including the failing position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("reconciliation aborted: {error}")]
pub struct ScanAborted {
    #[source]
    pub error: ValidationError,
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan state: totals, transfers and diagnostics accumulated position by position.
pub struct BatchScanner<'a> {
    classifier: Classifier<'a>,
    payouts: Option<&'a [ExpectedPayout]>,
    totals: Totals,
    transfers: Vec<Transfer>,
    diagnostics: Diagnostics,
    processed: usize,
}

impl<'a> BatchScanner<'a> {
    pub fn new(
        registry: &'a AddressRegistry,
        policy: &'a ReconciliationPolicy,
        payouts: Option<&'a [ExpectedPayout]>,
        diagnostics: Diagnostics,
    ) -> Self {
        Self {
            classifier: Classifier::new(registry, policy),
            payouts,
            totals: Totals::default(),
            transfers: Vec::new(),
            diagnostics,
            processed: 0,
        }
    }

    /// Classify, validate and account for the next sub-transaction.
    pub fn process(&mut self, sub: &SubTransaction) -> Result<(), ValidationError> {
        let index = self.processed;
        let position = index + 1;
        let expected = self.payouts.and_then(|rows| rows.get(index));

        let classified = self
            .classifier
            .process(sub, position, expected, &mut self.diagnostics)?;

        self.totals.native = self.totals.native.accumulate(classified.native_delta);
        self.totals.token = self.totals.token.accumulate(classified.token_delta);

        if let Some(transfer) = classified.transfer {
            if self.payouts.is_some() && expected.is_none() {
                self.diagnostics.check(
                    false,
                    format!("Tx at index {} has no matching row in the payout plan", position),
                );
            }
            self.transfers.push(transfer);
        }

        tracing::debug!("Tx at index {} processed as {}", position, classified.kind);
        self.processed += 1;
        Ok(())
    }

    /// Abandon the scan, keeping the diagnostics for the report.
    pub fn abort(self, error: ValidationError) -> ScanAborted {
        tracing::warn!("{}", error);
        ScanAborted {
            error,
            diagnostics: self.diagnostics.into_vec(),
        }
    }

    pub fn into_result(mut self) -> ReconciliationResult {
        if let Some(rows) = self.payouts {
            self.diagnostics.check(
                rows.len() <= self.processed,
                format!(
                    "Payout plan has {} rows but the batch only has {} transactions",
                    rows.len(),
                    self.processed
                ),
            );
        }

        ReconciliationResult {
            transfers: self.transfers,
            totals: self.totals,
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}

/// Runs the envelope gate and the batch scan against one registry and policy.
pub struct Reconciler<'a> {
    registry: &'a AddressRegistry,
    policy: &'a ReconciliationPolicy,
}

impl<'a> Reconciler<'a> {
    pub fn new(registry: &'a AddressRegistry, policy: &'a ReconciliationPolicy) -> Self {
        Self { registry, policy }
    }

    /// Check the outer transaction: multisend target, `multiSend` method, zero value.
    ///
    /// Failures are recorded but do not stop the scan.
    pub fn check_envelope(&self, tx: &TxDetails, d: &mut Diagnostics) -> bool {
        let checks = [
            d.check_eq(
                &tx.target,
                &self.policy.multisend,
                format!(
                    "Invalid tx target: should be the multisend address, is {}",
                    self.registry.display_name(&tx.target)
                ),
            ),
            d.check_eq(
                tx.method.as_str(),
                MULTISEND_METHOD,
                format!(
                    "Invalid method for multisend: should be {}, is {}",
                    MULTISEND_METHOD, tx.method
                ),
            ),
            d.check_eq(
                &tx.value,
                &Amount::zero(),
                "Transaction should be sending zero ETH to the multisend contract",
            ),
        ];
        checks.iter().all(|ok| *ok)
    }

    /// Scan the sub-transactions in order, starting from already-collected diagnostics.
    pub fn reconcile_batch(
        &self,
        subs: &[SubTransaction],
        payouts: Option<&[ExpectedPayout]>,
        diagnostics: Diagnostics,
    ) -> Result<ReconciliationResult, ScanAborted> {
        let mut scanner = BatchScanner::new(self.registry, self.policy, payouts, diagnostics);

        for sub in subs {
            if let Err(error) = scanner.process(sub) {
                return Err(scanner.abort(error));
            }
        }

        let result = scanner.into_result();
        tracing::info!(
            "Total ETH sent: {}",
            result.totals.native.to_human_units(NATIVE_DECIMALS)
        );
        tracing::info!(
            "Total {} sent: {}",
            self.policy.primary_token,
            result.totals.token.to_human_units(self.policy.token_decimals)
        );
        Ok(result)
    }

    /// Gate then scan a whole transaction.
    pub fn reconcile(
        &self,
        tx: &TxDetails,
        payouts: Option<&[ExpectedPayout]>,
    ) -> Result<ReconciliationResult, ScanAborted> {
        let mut diagnostics = Diagnostics::new();
        if !self.check_envelope(tx, &mut diagnostics) {
            tracing::warn!("Invalid multisend envelope (for reasons logged above)");
        }
        self.reconcile_batch(&tx.sub_transactions, payouts, diagnostics)
    }
}
