use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::ec2_snapshot_client::SnapshotStore;
use crate::error::HousekeepingError;
use crate::notifier::Notify;
use crate::report::{HandlerResponse, StepOutcome};
use crate::retention::RetentionWindow;
use crate::snapshot::{BackupType, SnapshotRequest};

const SUCCESS_SYMBOL: &str = "✔";
const WARNING_SYMBOL: &str = "⚠";

/// Snapshots tagged volumes and prunes its own expired snapshots.
pub struct LifecycleManager<S, N> {
    store: S,
    notifier: N,
}

impl<S: SnapshotStore, N: Notify> LifecycleManager<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        LifecycleManager { store, notifier }
    }

    /// Backup and cleanup run independently; the report is always sent.
    pub async fn run(&self, now: DateTime<Utc>) -> HandlerResponse {
        let backup = self.create_backups().await;
        let cleanup = self.prune_snapshots(now).await;

        let success = backup.success && cleanup.success;
        let symbol = if success { SUCCESS_SYMBOL } else { WARNING_SYMBOL };
        let report = format!(
            "{} *EBS Lifecycle Report*\n> Backup: {}\n> Cleanup: {}",
            symbol, backup.message, cleanup.message
        );

        self.notifier.notify(&report).await;
        HandlerResponse::new(success, report)
    }

    pub async fn create_backups(&self) -> StepOutcome {
        let mut created = 0;
        match self.snapshot_volumes(&mut created).await {
            Ok(()) => {
                info!(created, "Backup complete");
                StepOutcome::succeeded(created, format!("Created {} snapshots.", created))
            }
            Err(error) => {
                error!(%error, created, "Error creating backup");
                StepOutcome::failed(
                    created,
                    format!("Error after creating {} snapshots: {}", created, error),
                )
            }
        }
    }

    pub async fn prune_snapshots(&self, now: DateTime<Utc>) -> StepOutcome {
        let window = RetentionWindow::from(now);
        info!(cutoff = %window.cutoff, "Pruning snapshots");

        let mut deleted = 0;
        match self.delete_expired(&window, &mut deleted).await {
            Ok(()) => {
                info!(deleted, "Pruning complete");
                StepOutcome::succeeded(deleted, format!("Deleted {} old snapshots.", deleted))
            }
            Err(error) => {
                error!(%error, deleted, "Error pruning snapshots");
                StepOutcome::failed(
                    deleted,
                    format!("Error after deleting {} snapshots: {}", deleted, error),
                )
            }
        }
    }

    async fn classify(&self, volume_id: &str) -> BackupType {
        match self.store.describe_owned_snapshots(Some(volume_id)).await {
            Ok(snapshots) => BackupType::from_existing_count(snapshots.len()),
            Err(error) => {
                warn!(%error, volume_id, "Could not look up prior snapshots");
                BackupType::Unknown
            }
        }
    }

    async fn snapshot_volumes(&self, created: &mut usize) -> Result<(), HousekeepingError> {
        for volume in self.store.describe_backup_volumes().await? {
            let backup_type = self.classify(&volume.volume_id).await;
            let request = SnapshotRequest::for_volume(&volume, backup_type);
            let snapshot_id = self.store.create_snapshot(&request).await?;
            info!(
                "[{}] Snapshot {} created for {}",
                backup_type, snapshot_id, volume.volume_id
            );
            *created += 1;
        }
        Ok(())
    }

    async fn delete_expired(
        &self,
        window: &RetentionWindow,
        deleted: &mut usize,
    ) -> Result<(), HousekeepingError> {
        for snapshot in self.store.describe_owned_snapshots(None).await? {
            let start_time = match snapshot.start_time {
                Some(start_time) => start_time,
                None => continue,
            };
            if window.is_expired(&start_time) {
                info!(
                    snapshot_id = %snapshot.snapshot_id,
                    created = %start_time,
                    "Deleting snapshot"
                );
                self.store.delete_snapshot(&snapshot.snapshot_id).await?;
                *deleted += 1;
            }
        }
        Ok(())
    }
}
