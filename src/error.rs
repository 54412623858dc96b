use rusoto_core::RusotoError;
use rusoto_ec2::{
    CreateSnapshotError, DeleteSnapshotError, DescribeSecurityGroupsError, DescribeSnapshotsError,
    DescribeVolumesError, RevokeSecurityGroupIngressError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HousekeepingError {
    #[error("Value is None")]
    NoneValue,
    #[error("Failed to parse timestamp {0}")]
    InvalidTimestamp(String),
    #[error(transparent)]
    DescribeVolumesError(#[from] RusotoError<DescribeVolumesError>),
    #[error(transparent)]
    DescribeSnapshotsError(#[from] RusotoError<DescribeSnapshotsError>),
    #[error(transparent)]
    CreateSnapshotError(#[from] RusotoError<CreateSnapshotError>),
    #[error(transparent)]
    DeleteSnapshotError(#[from] RusotoError<DeleteSnapshotError>),
    #[error(transparent)]
    DescribeSecurityGroupsError(#[from] RusotoError<DescribeSecurityGroupsError>),
    #[error(transparent)]
    RevokeIngressError(#[from] RusotoError<RevokeSecurityGroupIngressError>),
    #[error("Webhook request failed: {0}")]
    WebhookError(#[from] reqwest::Error),
}

impl HousekeepingError {
    /// True when the failure came back from the EC2 API rather than from
    /// handling its response locally.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            HousekeepingError::DescribeVolumesError(_)
                | HousekeepingError::DescribeSnapshotsError(_)
                | HousekeepingError::CreateSnapshotError(_)
                | HousekeepingError::DeleteSnapshotError(_)
                | HousekeepingError::DescribeSecurityGroupsError(_)
                | HousekeepingError::RevokeIngressError(_)
        )
    }
}
