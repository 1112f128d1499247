// System configuration: replica/round/wallet/transaction knobs, loadable
// from a TOML file or from environment variables (dual-path, mirroring
// how a validator node's own config used to be loaded).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Minor-unit scale factor: 1 major unit = 100 minor units (cents-like).
pub const MINOR_UNITS_PER_MAJOR: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SystemConfig {
    /// Number of consensus replicas. Must be 3f+1 for some f >= 1.
    pub replica_count: usize,
    /// Round timeout before a view-change is triggered.
    pub round_timeout_ms: u64,
    /// Maximum number of transactions per proposed block.
    pub block_size_limit: usize,
    /// Offline wallet lifespan in days from activation.
    pub wallet_expiry_days: u64,
    /// Maximum offline balance a wallet may hold, in minor units.
    pub wallet_max_balance: u64,
    /// Minimum transaction amount, in minor units (config source expresses
    /// this in major units; see `min_transaction_amount_minor`).
    pub min_transaction_amount_minor: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            replica_count: 4,
            round_timeout_ms: 5_000,
            block_size_limit: 1_000,
            wallet_expiry_days: 14,
            wallet_max_balance: 1_000_000 * MINOR_UNITS_PER_MAJOR,
            min_transaction_amount_minor: 1, // 0.01 major units
        }
    }
}

impl SystemConfig {
    /// Quorum size Q = 2f+1 implied by `replica_count` = 3f+1.
    pub fn quorum_size(&self) -> usize {
        min_distinct_voters(self.replica_count)
    }

    /// Load config from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: SystemConfig = toml::from_str(&content)?;
        config
            .validate()
            .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;
        Ok(config)
    }

    /// Load config from environment variables, falling back to defaults.
    /// Useful for containerized deployments where a file isn't mounted.
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let defaults = Self::default();

        let replica_count: usize = std::env::var("CBDC_REPLICA_COUNT")
            .unwrap_or_else(|_| defaults.replica_count.to_string())
            .parse()?;
        let round_timeout_ms: u64 = std::env::var("CBDC_ROUND_TIMEOUT_MS")
            .unwrap_or_else(|_| defaults.round_timeout_ms.to_string())
            .parse()?;
        let block_size_limit: usize = std::env::var("CBDC_BLOCK_SIZE_LIMIT")
            .unwrap_or_else(|_| defaults.block_size_limit.to_string())
            .parse()?;
        let wallet_expiry_days: u64 = std::env::var("CBDC_WALLET_EXPIRY_DAYS")
            .unwrap_or_else(|_| defaults.wallet_expiry_days.to_string())
            .parse()?;
        let wallet_max_balance: u64 = std::env::var("CBDC_WALLET_MAX_BALANCE")
            .unwrap_or_else(|_| defaults.wallet_max_balance.to_string())
            .parse()?;
        let min_transaction_amount_minor: u64 = std::env::var("CBDC_MIN_TRANSACTION_AMOUNT_MINOR")
            .unwrap_or_else(|_| defaults.min_transaction_amount_minor.to_string())
            .parse()?;

        let config = Self {
            replica_count,
            round_timeout_ms,
            block_size_limit,
            wallet_expiry_days,
            wallet_max_balance,
            min_transaction_amount_minor,
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.replica_count < 4 {
            return Err("replica_count must be >= 4 (N = 3f+1, f >= 1)".to_string());
        }
        if (self.replica_count - 1) % 3 != 0 {
            return Err(format!(
                "replica_count {} is not of the form 3f+1",
                self.replica_count
            ));
        }
        if self.round_timeout_ms == 0 {
            return Err("round_timeout_ms must be > 0".to_string());
        }
        if self.block_size_limit == 0 {
            return Err("block_size_limit must be > 0".to_string());
        }
        if self.wallet_expiry_days == 0 {
            return Err("wallet_expiry_days must be > 0".to_string());
        }
        Ok(())
    }
}

/// BFT quorum threshold Q = 2f+1 for a replica set of size N = 3f+1.
pub fn min_distinct_voters(replica_count: usize) -> usize {
    let f = (replica_count.saturating_sub(1)) / 3;
    2 * f + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        assert!(SystemConfig::default().validate().is_ok());
    }

    #[test]
    fn quorum_for_n4_is_3() {
        let cfg = SystemConfig {
            replica_count: 4,
            ..SystemConfig::default()
        };
        assert_eq!(cfg.quorum_size(), 3);
    }

    #[test]
    fn quorum_for_n7_is_5() {
        assert_eq!(min_distinct_voters(7), 5);
    }

    #[test]
    fn rejects_non_3f_plus_1_replica_count() {
        let cfg = SystemConfig {
            replica_count: 5,
            ..SystemConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn save_and_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("system.toml");
        let cfg = SystemConfig::default();
        cfg.save_to_file(&path).unwrap();
        let loaded = SystemConfig::load_from_file(&path).unwrap();
        assert_eq!(cfg, loaded);
    }
}
