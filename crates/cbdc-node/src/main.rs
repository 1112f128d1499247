// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC SETTLEMENT NODE
//
// Boots one settlement authority task and drives it through a full
// lifecycle: intermediary/owner onboarding, emission, exchange, an
// online transfer, an offline transfer settled on reconnection, and a
// contract call. Exercises the same `AuthorityHandle` surface a real
// client (wallet app, bank gateway) would use over a channel or RPC.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cbdc_authority::{runtime, OwnerCategory, SettlementAuthority, WalletKind};
use cbdc_core::SystemConfig;
use cbdc_crypto::Secret;

fn now_secs() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

fn load_config() -> SystemConfig {
    match std::env::var("CBDC_CONFIG_PATH") {
        Ok(path) => SystemConfig::load_from_file(&PathBuf::from(path)).unwrap_or_else(|e| {
            log::warn!("failed to load config file, falling back to environment: {e}");
            SystemConfig::load_from_env().unwrap_or_default()
        }),
        Err(_) => SystemConfig::load_from_env().unwrap_or_default(),
    }
}

fn load_secret() -> Secret {
    match std::env::var("CBDC_AUTHORITY_SECRET") {
        Ok(s) => Secret::from_str(&s),
        Err(_) => {
            log::warn!("CBDC_AUTHORITY_SECRET not set; using an insecure development secret");
            Secret::from_str("dev-only-authority-secret")
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = load_config();
    log::info!("starting cbdc-node with replica_count={} round_timeout_ms={}", config.replica_count, config.round_timeout_ms);

    let authority = SettlementAuthority::new(config, load_secret()).expect("invalid configuration");
    let handle = runtime::spawn_authority_task(authority);

    if let Err(e) = run_demo(&handle).await {
        log::error!("demo flow failed: {e}");
        std::process::exit(1);
    }
}

async fn run_demo(handle: &runtime::AuthorityHandle) -> Result<(), cbdc_authority::AuthorityError> {
    let now = now_secs();

    let intermediary = handle.register_intermediary("First Digital Bank", "FDB-001", now).await?;
    handle.fund_non_digital_reserve(intermediary.as_str(), 10_000_000).await?;
    log::info!("registered intermediary {intermediary}");

    let alice = handle.register_owner(OwnerCategory::Individual).await?;
    let bob = handle.register_owner(OwnerCategory::Individual).await?;
    handle.fund_non_digital_balance(alice.as_str(), 100_000).await?;
    log::info!("registered owners alice={alice} bob={bob}");

    let emission_request = handle.request_emission(intermediary.as_str(), 1_000_000, "initial liquidity", now).await?;
    handle.decide_emission(emission_request.as_str(), true, now).await?;
    let committed = handle.process_pending(now).await?;
    log::info!("issuance committed in blocks {committed:?}");

    handle.exchange(alice.as_str(), intermediary.as_str(), 50_000).await?;
    handle.process_pending(now + 1).await?;
    log::info!("alice exchanged cash for digital currency");

    handle.submit_online_transfer(alice.as_str(), bob.as_str(), 10_000).await?;
    handle.process_pending(now + 2).await?;
    log::info!("alice sent bob 10,000 minor units online");

    handle.open_wallet(alice.as_str(), WalletKind::Offline, now + 2).await?;
    handle.open_wallet(bob.as_str(), WalletKind::Online, now + 2).await?;
    handle.withdraw_to_offline(alice.as_str(), 5_000, now + 2).await?;
    handle.submit_offline_transfer(alice.as_str(), bob.as_str(), 5_000, now + 3).await?;
    let reconnected = handle.reconnect_wallet(alice.as_str()).await?;
    log::info!("reconnect_wallet flushed {} offline transaction(s)", reconnected.len());
    handle.process_pending(now + 4).await?;

    let mut initial_storage = BTreeMap::new();
    initial_storage.insert(format!("balance:{alice}"), 100u64);
    handle.contract_create("loyalty-points", alice.as_str(), initial_storage).await?;
    handle
        .contract_call("loyalty-points", "transfer", vec![alice.clone(), bob.clone(), "30".to_string()], alice.as_str())
        .await?;
    handle.process_pending(now + 5).await?;

    let info = handle.ledger_info().await?;
    log::info!(
        "final ledger state: height={} tip_hash={} pending={} valid={}",
        info.height, info.tip_hash, info.pending_count, info.valid
    );

    let snapshot = handle.snapshot(now + 5).await?;
    log::info!("snapshot: total_emitted={} authority_reserve={}", snapshot.total_emitted, snapshot.authority_reserve);

    Ok(())
}
