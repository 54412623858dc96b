use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusoto_ec2::{
    CreateSnapshotRequest, DeleteSnapshotRequest, DescribeSnapshotsRequest,
    DescribeVolumesRequest, Ec2, Ec2Client, Filter, Snapshot, Tag, TagSpecification,
};
use std::collections::HashMap;

use crate::error::HousekeepingError;
use crate::snapshot::{
    BackupVolume, OwnedSnapshot, SnapshotRequest, BACKUP_TAG_KEY, BACKUP_TAG_VALUES,
    OWNER_TAG_KEY, OWNER_TAG_VALUE,
};

const SNAPSHOT_RESOURCE_TYPE: &str = "snapshot";
const SELF_OWNER: &str = "self";

pub struct Ec2SnapshotClient {
    client: Ec2Client,
}

#[async_trait]
pub trait SnapshotStore {
    async fn describe_backup_volumes(&self) -> Result<Vec<BackupVolume>, HousekeepingError>;

    /// Owned snapshots, optionally narrowed to one source volume.
    async fn describe_owned_snapshots(
        &self,
        volume_id: Option<&str>,
    ) -> Result<Vec<OwnedSnapshot>, HousekeepingError>;

    async fn create_snapshot(&self, request: &SnapshotRequest) -> Result<String, HousekeepingError>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), HousekeepingError>;
}

#[async_trait]
impl SnapshotStore for Ec2SnapshotClient {
    async fn describe_backup_volumes(&self) -> Result<Vec<BackupVolume>, HousekeepingError> {
        let request = DescribeVolumesRequest {
            filters: Some(vec![filter(
                &format!("tag:{}", BACKUP_TAG_KEY),
                &BACKUP_TAG_VALUES,
            )]),
            ..DescribeVolumesRequest::default()
        };

        let result = self.client.describe_volumes(request).await?;

        let mut volumes = Vec::<BackupVolume>::new();
        for volume in result.volumes.unwrap_or_default() {
            volumes.push(BackupVolume {
                volume_id: volume.volume_id.ok_or(HousekeepingError::NoneValue)?,
                tags: tag_map(volume.tags),
            })
        }
        Ok(volumes)
    }

    async fn describe_owned_snapshots(
        &self,
        volume_id: Option<&str>,
    ) -> Result<Vec<OwnedSnapshot>, HousekeepingError> {
        let mut filters = Vec::new();
        if let Some(volume_id) = volume_id {
            filters.push(filter("volume-id", &[volume_id]));
        }
        filters.push(filter(&format!("tag:{}", OWNER_TAG_KEY), &[OWNER_TAG_VALUE]));

        let request = DescribeSnapshotsRequest {
            filters: Some(filters),
            owner_ids: Some(vec![SELF_OWNER.to_string()]),
            ..DescribeSnapshotsRequest::default()
        };

        let result = self.client.describe_snapshots(request).await?;

        result
            .snapshots
            .unwrap_or_default()
            .into_iter()
            .map(owned_snapshot)
            .collect()
    }

    async fn create_snapshot(
        &self,
        request: &SnapshotRequest,
    ) -> Result<String, HousekeepingError> {
        let tags = request
            .tags
            .iter()
            .map(|(key, value)| Tag {
                key: Some(key.clone()),
                value: Some(value.clone()),
            })
            .collect();

        let snapshot = self
            .client
            .create_snapshot(CreateSnapshotRequest {
                volume_id: request.volume_id.clone(),
                description: Some(request.description.clone()),
                tag_specifications: Some(vec![TagSpecification {
                    resource_type: Some(SNAPSHOT_RESOURCE_TYPE.to_string()),
                    tags: Some(tags),
                }]),
                ..CreateSnapshotRequest::default()
            })
            .await?;

        snapshot.snapshot_id.ok_or(HousekeepingError::NoneValue)
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<(), HousekeepingError> {
        self.client
            .delete_snapshot(DeleteSnapshotRequest {
                snapshot_id: snapshot_id.to_string(),
                ..DeleteSnapshotRequest::default()
            })
            .await?;
        Ok(())
    }
}

impl Ec2SnapshotClient {
    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2SnapshotClient { client }
    }
}

fn filter(name: &str, values: &[&str]) -> Filter {
    Filter {
        name: Some(name.to_string()),
        values: Some(values.iter().map(|value| value.to_string()).collect()),
    }
}

fn tag_map(tags: Option<Vec<Tag>>) -> HashMap<String, String> {
    tags.unwrap_or_default()
        .into_iter()
        .filter_map(|tag| Some((tag.key?, tag.value.unwrap_or_default())))
        .collect()
}

fn owned_snapshot(snapshot: Snapshot) -> Result<OwnedSnapshot, HousekeepingError> {
    let start_time = match snapshot.start_time {
        Some(start_time) => Some(
            DateTime::parse_from_rfc3339(&start_time)
                .map_err(|_| HousekeepingError::InvalidTimestamp(start_time.clone()))?
                .with_timezone(&Utc),
        ),
        None => None,
    };
    Ok(OwnedSnapshot {
        snapshot_id: snapshot.snapshot_id.ok_or(HousekeepingError::NoneValue)?,
        volume_id: snapshot.volume_id,
        start_time,
    })
}

#[cfg(test)]
mod tests {
    use crate::ec2_snapshot_client::{Ec2SnapshotClient, SnapshotStore};
    use crate::mock_ec2::assert_form_contains;
    use crate::snapshot::{BackupType, BackupVolume, OwnedSnapshot, SnapshotRequest};
    use chrono::{DateTime, Utc};
    use rusoto_core::signature::SignedRequest;
    use rusoto_ec2::Ec2Client;
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use std::collections::HashMap;
    use std::str::FromStr;

    fn mock_client(status: u16, directory: &str, file: &str) -> Ec2SnapshotClient {
        let mock = Ec2Client::new_with(
            MockRequestDispatcher::with_status(status)
                .with_body(&*MockResponseReader::read_response(directory, file)),
            MockCredentialsProvider,
            Default::default(),
        );
        Ec2SnapshotClient::new_with_client(mock)
    }

    fn checked_client<F>(file: &str, checker: F) -> Ec2SnapshotClient
    where
        F: Fn(&SignedRequest) + Send + Sync + 'static,
    {
        let mock = Ec2Client::new_with(
            MockRequestDispatcher::default()
                .with_body(&*MockResponseReader::read_response("test_resources/valid", file))
                .with_request_checker(checker),
            MockCredentialsProvider,
            Default::default(),
        );
        Ec2SnapshotClient::new_with_client(mock)
    }

    #[tokio::test]
    async fn test_describe_backup_volumes() {
        let client = checked_client("describe_volumes.xml", |request| {
            assert_form_contains(
                request,
                &[
                    "Action=DescribeVolumes",
                    "Filter.1.Name=tag%3ABackup",
                    "Filter.1.Value.1=true",
                    "Filter.1.Value.2=True",
                ],
            );
        });
        let result = client.describe_backup_volumes().await;

        let mut named = HashMap::new();
        named.insert("Backup".to_string(), "true".to_string());
        named.insert("Name".to_string(), "db-data".to_string());
        let mut unnamed = HashMap::new();
        unnamed.insert("Backup".to_string(), "True".to_string());

        assert_eq!(
            result.unwrap(),
            [
                BackupVolume {
                    volume_id: "vol-1234567890abcdef0".to_string(),
                    tags: named,
                },
                BackupVolume {
                    volume_id: "vol-0fedcba0987654321".to_string(),
                    tags: unnamed,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_describe_owned_snapshots() {
        let client = checked_client("describe_snapshots.xml", |request| {
            assert_form_contains(
                request,
                &[
                    "Action=DescribeSnapshots",
                    "Filter.1.Name=volume-id",
                    "Filter.1.Value.1=vol-1234567890abcdef0",
                    "Filter.2.Name=tag%3ACreatedBy",
                    "Filter.2.Value.1=EBSLifecycleManager",
                    "Owner.1=self",
                ],
            );
        });
        let result = client
            .describe_owned_snapshots(Some("vol-1234567890abcdef0"))
            .await;

        assert_eq!(
            result.unwrap(),
            [
                OwnedSnapshot {
                    snapshot_id: "snap-1234567890abcdef0".to_string(),
                    volume_id: Some("vol-1234567890abcdef0".to_string()),
                    start_time: Some(
                        DateTime::<Utc>::from_str("2020-11-20T09:15:00.000+00:00").unwrap()
                    ),
                },
                OwnedSnapshot {
                    snapshot_id: "snap-0fedcba0987654321".to_string(),
                    volume_id: Some("vol-1234567890abcdef0".to_string()),
                    start_time: Some(
                        DateTime::<Utc>::from_str("2020-12-07T09:15:00.000+00:00").unwrap()
                    ),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_describe_owned_snapshots_error() {
        let client = mock_client(400, "test_resources/error", "unauthorized_operation.xml");
        let result = client
            .describe_owned_snapshots(Some("vol-1234567890abcdef0"))
            .await;

        let error = result.unwrap_err();
        assert!(error.is_provider_error());
    }

    #[tokio::test]
    async fn test_create_snapshot() {
        let client = checked_client("create_snapshot.xml", |request| {
            assert_form_contains(
                request,
                &[
                    "Action=CreateSnapshot",
                    "VolumeId=vol-1234567890abcdef0",
                    "TagSpecification.1.ResourceType=snapshot",
                    "TagSpecification.1.Tag.1.Key=CreatedBy",
                    "TagSpecification.1.Tag.1.Value=EBSLifecycleManager",
                    "TagSpecification.1.Tag.2.Key=BackupType",
                    "TagSpecification.1.Tag.2.Value=Initial",
                    "TagSpecification.1.Tag.3.Key=Name",
                    "TagSpecification.1.Tag.3.Value=Backup-Unnamed-vol-1234567890abcdef0",
                ],
            );
        });
        let volume = BackupVolume {
            volume_id: "vol-1234567890abcdef0".to_string(),
            tags: HashMap::new(),
        };
        let request = SnapshotRequest::for_volume(&volume, BackupType::Initial);
        let result = client.create_snapshot(&request).await;

        assert_eq!(result.unwrap(), "snap-066877671789bd71b");
    }

    #[tokio::test]
    async fn test_delete_snapshot() {
        let client = checked_client("delete_snapshot.xml", |request| {
            assert_form_contains(
                request,
                &["Action=DeleteSnapshot", "SnapshotId=snap-1234567890abcdef0"],
            );
        });
        let result = client.delete_snapshot("snap-1234567890abcdef0").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_snapshot_error() {
        let client = mock_client(400, "test_resources/error", "unauthorized_operation.xml");
        let result = client.delete_snapshot("snap-1234567890abcdef0").await;

        assert!(result.is_err());
    }
}
