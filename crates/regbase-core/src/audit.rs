//! Audit trail for committed, discarded and applied changes

use std::sync::Mutex;

use chrono::Local;
use regbase_fs::{NormalizedPath, io};

/// Append-only sink for audit events
pub trait AuditSink {
    fn record(&self, event: &str);
}

/// Writes timestamped lines to a log file.
///
/// A write failure is logged and swallowed; auditing never aborts the
/// operation being audited.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: NormalizedPath,
}

impl FileAuditLog {
    pub fn new(path: NormalizedPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, event: &str) {
        tracing::info!(target: "regbase::audit", "{}", event);
        let line = format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S"), event);
        if let Err(e) = io::append_line(&self.path, &line) {
            tracing::error!(path = %self.path, error = %e, "failed to write audit log");
        }
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<String>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, event: &str) {
        tracing::info!(target: "regbase::audit", "{}", event);
        if let Ok(mut events) = self.events.lock() {
            events.push(event.to_string());
        }
    }
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn record(&self, event: &str) {
        (**self).record(event)
    }
}
