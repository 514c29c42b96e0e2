//! Append-only anomaly log: the service layer writes one record per
//! reoptimize call that actually triggers, purely for downstream
//! analytics. Writes are a single `O_APPEND` write of one
//! newline-terminated JSON line, which is atomic up to the filesystem's
//! atomic-write limit — no partial record is ever visible to a
//! concurrent reader.

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct AnomalyRecord<'a> {
    pub timestamp: String,
    pub reason: &'a str,
    pub delay_min: f64,
    pub rerouted: bool,
}

pub struct AnomalyLog {
    path: PathBuf,
}

impl AnomalyLog {
    pub fn from_env() -> Self {
        let path = env::var("ANOMALY_LOG_PATH").unwrap_or_else(|_| "anomaly_log.ndjson".to_string());
        AnomalyLog { path: PathBuf::from(path) }
    }

    /// Appends one record. Failure to write is logged, not propagated —
    /// the anomaly log is a best-effort side channel, never on the
    /// critical path of optimize/reoptimize.
    pub fn append(&self, reason: &str, delay_min: f64, rerouted: bool) {
        let record = AnomalyRecord {
            timestamp: Utc::now().to_rfc3339(),
            reason,
            delay_min,
            rerouted,
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "failed to serialize anomaly record");
                return;
            }
        };

        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| writeln!(f, "{}", line));

        if let Err(e) = result {
            warn!(error = %e, path = %self.path.display(), "failed to append anomaly record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_one_line_per_record() {
        let dir = std::env::temp_dir().join(format!("anomaly_log_test_{:?}", std::thread::current().id()));
        let log = AnomalyLog { path: dir.clone() };
        log.append("traffic_jam", 3.5, true);
        log.append("accident", 10.0, false);
        let contents = std::fs::read_to_string(&dir).unwrap();
        assert_eq!(contents.lines().count(), 2);
        let _ = std::fs::remove_file(&dir);
    }
}
