//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `naakt_core` linkage, logging setup and taxonomy loading.
//! - Keep output deterministic for quick local sanity checks.

use log::warn;
use naakt_core::{
    core_version, finalize, init_logging, JsonTaxonomyRepository, NaaktConfig, NamingSession,
    TaxonomyStore,
};

fn main() {
    let config = NaaktConfig::from_env();
    if let Err(err) = init_logging(&config.log_config()) {
        eprintln!("naakt logging disabled: {err}");
    }

    println!("naakt_core version={}", core_version());
    println!("naakt data_dir={}", config.data_dir.display());

    let (store, report) = TaxonomyStore::open(JsonTaxonomyRepository::new(config.taxonomy_paths()));
    println!("naakt names={}", report.names);
    for degraded in &report.degraded {
        warn!(
            "event=cli_probe module=cli status=degraded table={} error={}",
            degraded.table, degraded.message
        );
        println!("naakt degraded table={} error={}", degraded.table, degraded.message);
    }

    let session = NamingSession::start(store);
    println!("naakt preview={}", session.composed().preview_text());

    finalize(report.is_clean(), None);
}
