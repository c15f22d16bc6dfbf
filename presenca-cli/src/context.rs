//! Opens the gateway for a command: session, remote, snapshots and an
//! optional reload.

use presenca_core::{
    AttendanceRecord, Error, HttpRemote, LoadReport, MockRemote, Remote, RosterStore,
    SnapshotKind, SnapshotStorage, SyncGateway, TokenStore,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::session::FileTokenStore;

/// When to reload from the remote after the snapshots are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Reload if `api.auto_refresh` is on or nothing is cached yet
    Auto,
    /// Reload only if nothing is cached yet
    IfEmpty,
    Never,
}

pub struct Context {
    pub gateway: SyncGateway,
    pub session: Arc<FileTokenStore>,
}

impl Context {
    pub async fn open(config: &Config, refresh: Refresh) -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = config.data_dir.value.clone();
        let session = Arc::new(FileTokenStore::open(&data_dir)?);
        let storage = SnapshotStorage::new(&data_dir);

        let remote = build_remote(config, &storage, session.clone())?;
        let mut gateway = SyncGateway::new(remote)
            .with_storage(storage)
            .with_page_size(config.api.page_size.value);
        gateway.init()?;

        let cached = !gateway.roster().is_empty();
        let reload = match refresh {
            Refresh::Auto => config.api.auto_refresh.value || !cached,
            Refresh::IfEmpty => !cached,
            Refresh::Never => false,
        };

        if reload {
            match gateway.load_all().await {
                Ok(report) => print_failures(&report),
                Err(e) => {
                    warn!(error = %e, "reload failed, using local data");
                    if matches!(e, Error::Auth(_)) {
                        eprintln!("Not signed in or session expired. Run 'presenca auth login'.");
                    } else {
                        eprintln!("Could not reach the server, using local data: {}", e);
                    }
                }
            }
        }

        Ok(Self { gateway, session })
    }

    /// Waits for background snapshot writes.
    pub async fn close(mut self) {
        self.gateway.dispose().await;
    }
}

fn build_remote(
    config: &Config,
    storage: &SnapshotStorage,
    session: Arc<FileTokenStore>,
) -> Result<Arc<dyn Remote>, Box<dyn std::error::Error>> {
    if !config.api.use_mock.value {
        let tokens: Arc<dyn TokenStore> = session;
        let remote = HttpRemote::new(
            config.api.base_url.value.clone(),
            Duration::from_secs(config.api.timeout_secs.value),
            tokens,
        )?;
        return Ok(Arc::new(remote));
    }

    // The mock lives only for this process; seed it from the snapshots so
    // earlier invocations stay visible.
    let roster = storage.load::<RosterStore>(SnapshotKind::Rosters)?;
    let records = storage
        .load::<Vec<AttendanceRecord>>(SnapshotKind::Records)?
        .unwrap_or_default();
    let mock = match roster {
        Some(roster) if !roster.is_empty() => {
            debug!(records = records.len(), "seeding mock from snapshots");
            MockRemote::from_cache(&roster, &records)
        }
        _ => MockRemote::new(),
    };

    Ok(Arc::new(
        mock.with_latency(Duration::from_millis(config.api.mock_latency_ms.value)),
    ))
}

pub fn print_failures(report: &LoadReport) {
    for failure in &report.failures {
        eprintln!(
            "Warning: could not load students of {}: {}",
            failure.class_name, failure.error
        );
    }
}
