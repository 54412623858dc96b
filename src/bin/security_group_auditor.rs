use anyhow::anyhow;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use rusoto_core::Region;
use rusoto_ec2::Ec2Client;
use serde_json::Value;

use ec2_housekeeping::auditor::SecurityGroupAuditor;
use ec2_housekeeping::config::Config;
use ec2_housekeeping::ec2_security_group_client::{Ec2SecurityGroupClient, SecurityGroupStore};
use ec2_housekeeping::logging;
use ec2_housekeeping::notifier::{Notify, SlackNotifier, SECURITY_GROUP_AUDITOR};
use ec2_housekeeping::report::HandlerResponse;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let config = Config::from_env();
    let auditor = SecurityGroupAuditor::new(
        Ec2SecurityGroupClient::new_with_client(Ec2Client::new(Region::default())),
        SlackNotifier::new(&config, SECURITY_GROUP_AUDITOR),
    );

    lambda_runtime::run(service_fn(|event| audit_handler(event, &auditor)))
        .await
        .map_err(|error| anyhow!(error))
}

async fn audit_handler<S: SecurityGroupStore, N: Notify>(
    _: LambdaEvent<Value>,
    auditor: &SecurityGroupAuditor<S, N>,
) -> Result<HandlerResponse, Error> {
    Ok(auditor.run().await)
}
