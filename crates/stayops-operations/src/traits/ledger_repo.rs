use stayops_core::FinancialTransaction;

use crate::Result;

/// Append-only access to the financial ledger.
pub trait LedgerRepo {
    /// # Errors
    ///
    /// Returns an error if the row cannot be appended.
    fn create_transaction(&self, transaction: &FinancialTransaction) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the ledger cannot be read.
    fn transactions_for_reservation(&self, reservation_id: &str)
    -> Result<Vec<FinancialTransaction>>;
}
