use anyhow::anyhow;
use chrono::Utc;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rusoto_core::Region;
use rusoto_ec2::Ec2Client;
use serde_json::Value;

use ec2_housekeeping::config::Config;
use ec2_housekeeping::ec2_snapshot_client::{Ec2SnapshotClient, SnapshotStore};
use ec2_housekeeping::lifecycle::LifecycleManager;
use ec2_housekeeping::logging;
use ec2_housekeeping::notifier::{Notify, SlackNotifier, LIFECYCLE_MANAGER};
use ec2_housekeeping::report::HandlerResponse;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env();
    let manager = LifecycleManager::new(
        Ec2SnapshotClient::new_with_client(Ec2Client::new(Region::default())),
        SlackNotifier::new(&config, LIFECYCLE_MANAGER),
    );

    lambda_runtime::run(service_fn(|event| lifecycle_handler(event, &manager)))
        .await
        .map_err(|error| anyhow!(error))
}

async fn lifecycle_handler<S: SnapshotStore, N: Notify>(
    _: LambdaEvent<Value>,
    manager: &LifecycleManager<S, N>,
) -> Result<HandlerResponse, Error> {
    Ok(manager.run(Utc::now()).await)
}
