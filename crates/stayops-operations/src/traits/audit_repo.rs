use stayops_core::AuditLogEntry;

use crate::Result;

pub trait AuditRepo {
    /// # Errors
    ///
    /// Returns an error if the entry cannot be appended.
    fn append_audit(&self, entry: &AuditLogEntry) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the audit log cannot be read.
    fn audit_entries_for(&self, entity_id: &str) -> Result<Vec<AuditLogEntry>>;
}
