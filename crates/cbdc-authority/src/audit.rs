// Audit log: spec.md §4.4 names this among the authority's owned state;
// §7 requires fatal internal-invariant violations to halt the process
// "with an audit-log entry." Kept as a simple append-only `Vec` rather
// than a file sink — persistence/file layout is out of scope (§1).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditSeverity {
    Info,
    Warn,
    Fatal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub severity: AuditSeverity,
    pub message: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<AuditEntry>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn record(&mut self, severity: AuditSeverity, message: impl Into<String>, timestamp: u64) {
        let message = message.into();
        match severity {
            AuditSeverity::Info => log::info!("{message}"),
            AuditSeverity::Warn => log::warn!("{message}"),
            AuditSeverity::Fatal => log::error!("{message}"),
        }
        self.entries.push(AuditEntry {
            severity,
            message,
            timestamp,
        });
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.entries
    }
}
