pub mod auditor;
pub mod config;
pub mod ec2_security_group_client;
pub mod ec2_snapshot_client;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod notifier;
pub mod report;
pub mod retention;
pub mod security_group;
pub mod snapshot;

#[cfg(test)]
mod mock_ec2;
