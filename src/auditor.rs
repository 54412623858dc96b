use tracing::{error, info};

use crate::ec2_security_group_client::SecurityGroupStore;
use crate::error::HousekeepingError;
use crate::notifier::Notify;
use crate::report::HandlerResponse;
use crate::security_group::OPEN_CIDR;

#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutcome {
    pub success: bool,
    pub found: usize,
    pub revoked: usize,
    pub message: String,
}

impl AuditOutcome {
    pub fn changed(&self) -> bool {
        self.found > 0
    }

    /// Steady-state runs that found nothing stay quiet.
    pub fn should_notify(&self) -> bool {
        !self.success || self.changed()
    }
}

/// Revokes ingress rules that open port 22 to the whole internet.
pub struct SecurityGroupAuditor<S, N> {
    store: S,
    notifier: N,
}

impl<S: SecurityGroupStore, N: Notify> SecurityGroupAuditor<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        SecurityGroupAuditor { store, notifier }
    }

    pub async fn run(&self) -> HandlerResponse {
        let outcome = self.audit().await;
        if outcome.should_notify() {
            self.notifier.notify(&outcome.message).await;
        }
        HandlerResponse::new(outcome.success, outcome.message)
    }

    pub async fn audit(&self) -> AuditOutcome {
        let mut found = 0;
        let mut revoked = 0;
        match self.remediate(&mut found, &mut revoked).await {
            Ok(()) => {
                let message = format!(
                    "Found {} and revoked {} rules allowing Port 22 from internet.",
                    found, revoked
                );
                info!("{}", message);
                AuditOutcome {
                    success: true,
                    found,
                    revoked,
                    message,
                }
            }
            Err(error) => {
                let kind = if error.is_provider_error() {
                    "AWS"
                } else {
                    "Critical"
                };
                let message = format!(
                    "{} error after finding {}/revoking {}: {}",
                    kind, found, revoked, error
                );
                error!("{}", message);
                AuditOutcome {
                    success: false,
                    found,
                    revoked,
                    message,
                }
            }
        }
    }

    async fn remediate(
        &self,
        found: &mut usize,
        revoked: &mut usize,
    ) -> Result<(), HousekeepingError> {
        for group in self.store.describe_security_groups().await? {
            for rule in &group.rules {
                for _ in 0..rule.violations() {
                    *found += 1;
                    info!(group_id = %group.group_id, "Revoking rule (Port 22 from World)");
                    self.store
                        .revoke_ingress(&group.group_id, rule, OPEN_CIDR)
                        .await?;
                    *revoked += 1;
                }
            }
        }
        Ok(())
    }
}
