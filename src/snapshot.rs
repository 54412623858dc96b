use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

pub const OWNER_TAG_KEY: &str = "CreatedBy";
pub const OWNER_TAG_VALUE: &str = "EBSLifecycleManager";
pub const BACKUP_TYPE_TAG_KEY: &str = "BackupType";
pub const BACKUP_TAG_KEY: &str = "Backup";
pub const BACKUP_TAG_VALUES: [&str; 2] = ["true", "True"];
pub const NAME_TAG_KEY: &str = "Name";

const UNNAMED_VOLUME: &str = "Unnamed";

/// A volume tagged for backup.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupVolume {
    pub volume_id: String,
    pub tags: HashMap<String, String>,
}

impl BackupVolume {
    pub fn name(&self) -> &str {
        self.tags
            .get(NAME_TAG_KEY)
            .map(String::as_str)
            .unwrap_or(UNNAMED_VOLUME)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupType {
    Initial,
    Incremental,
    Unknown,
}

impl BackupType {
    pub fn from_existing_count(count: usize) -> Self {
        if count == 0 {
            BackupType::Initial
        } else {
            BackupType::Incremental
        }
    }
}

impl Display for BackupType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            BackupType::Initial => write!(f, "Initial"),
            BackupType::Incremental => write!(f, "Incremental"),
            BackupType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A snapshot carrying the ownership tag.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSnapshot {
    pub snapshot_id: String,
    pub volume_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

/// Everything needed to issue a CreateSnapshot call for one volume.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRequest {
    pub volume_id: String,
    pub description: String,
    pub tags: Vec<(String, String)>,
}

impl SnapshotRequest {
    pub fn for_volume(volume: &BackupVolume, backup_type: BackupType) -> Self {
        let name = volume.name();
        SnapshotRequest {
            volume_id: volume.volume_id.clone(),
            description: format!("Snapshot of {} ({})", volume.volume_id, name),
            tags: vec![
                (OWNER_TAG_KEY.to_string(), OWNER_TAG_VALUE.to_string()),
                (BACKUP_TYPE_TAG_KEY.to_string(), backup_type.to_string()),
                (
                    NAME_TAG_KEY.to_string(),
                    format!("Backup-{}-{}", name, volume.volume_id),
                ),
            ],
        }
    }
}
