//! Storage usage value object and byte formatting.

use serde::{Deserialize, Serialize};

/// Account storage usage against a quota ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Bytes currently used.
    pub used_bytes: u64,
    /// Quota ceiling in bytes.
    pub quota_bytes: u64,
}

impl StorageUsage {
    /// Remaining capacity, saturating at zero when over quota.
    pub fn remaining(&self) -> u64 {
        self.quota_bytes.saturating_sub(self.used_bytes)
    }

    /// Whether adding `additional` bytes would push usage past the quota.
    pub fn would_exceed(&self, additional: u64) -> bool {
        self.used_bytes.saturating_add(additional) > self.quota_bytes
    }
}

/// Format a byte count for display: 1024-based, up to two decimals with
/// trailing zeros stripped, units Bytes/KB/MB/GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);
    let mut value = format!("{scaled:.2}");
    while value.ends_with('0') {
        value.pop();
    }
    if value.ends_with('.') {
        value.pop();
    }
    format!("{} {}", value, UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(10 * 1024 * 1024 * 1024), "10 GB");
    }

    #[test]
    fn test_remaining_saturates() {
        let usage = StorageUsage {
            used_bytes: 11,
            quota_bytes: 10,
        };
        assert_eq!(usage.remaining(), 0);
    }

    #[test]
    fn test_would_exceed() {
        let usage = StorageUsage {
            used_bytes: 9,
            quota_bytes: 10,
        };
        assert!(!usage.would_exceed(1));
        assert!(usage.would_exceed(2));
        assert!(!usage.would_exceed(0));
    }
}
