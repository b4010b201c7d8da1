use crate::datasource::TransactionSource;
use crate::domain::ExpectedPayout;
use crate::engine::{AddressRegistry, Reconciler, ReconciliationPolicy, ReconciliationResult};
use crate::error::AppError;
use crate::ledger::write_ledger_file;
use std::path::Path;
use std::sync::Arc;

/// Result of a completed run.
#[derive(Debug)]
pub struct AuditOutcome {
    pub result: ReconciliationResult,
    pub ledger_rows: usize,
}

/// Wires a transaction source to the reconciliation engine and the ledger writer.
#[derive(Clone)]
pub struct Auditor {
    source: Arc<dyn TransactionSource>,
    registry: Arc<AddressRegistry>,
    policy: ReconciliationPolicy,
}

impl Auditor {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        registry: Arc<AddressRegistry>,
        policy: ReconciliationPolicy,
    ) -> Self {
        Self {
            source,
            registry,
            policy,
        }
    }

    /// Fetch and reconcile a transaction without writing anything.
    pub async fn reconcile(
        &self,
        tx_id: &str,
        payouts: Option<&[ExpectedPayout]>,
    ) -> Result<ReconciliationResult, AppError> {
        let tx = self.source.fetch_transaction(tx_id).await?;
        tracing::info!(
            "Reconciling {} ({} sub-transactions)",
            tx_id,
            tx.sub_transactions.len()
        );

        let reconciler = Reconciler::new(&self.registry, &self.policy);
        Ok(reconciler.reconcile(&tx, payouts)?)
    }

    /// Reconcile and, when no structural error stopped the scan, write the ledger.
    pub async fn run(
        &self,
        tx_id: &str,
        payouts: Option<&[ExpectedPayout]>,
        ledger_path: &Path,
    ) -> Result<AuditOutcome, AppError> {
        let result = self.reconcile(tx_id, payouts).await?;
        let ledger_rows = write_ledger_file(ledger_path, &result.transfers)?;
        Ok(AuditOutcome {
            result,
            ledger_rows,
        })
    }
}
