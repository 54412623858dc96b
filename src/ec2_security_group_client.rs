use async_trait::async_trait;
use rusoto_ec2::{
    DescribeSecurityGroupsRequest, Ec2, Ec2Client, IpPermission, IpRange,
    RevokeSecurityGroupIngressRequest,
};

use crate::error::HousekeepingError;
use crate::security_group::{AuditedSecurityGroup, IngressRule};

pub struct Ec2SecurityGroupClient {
    client: Ec2Client,
}

#[async_trait]
pub trait SecurityGroupStore {
    async fn describe_security_groups(
        &self,
    ) -> Result<Vec<AuditedSecurityGroup>, HousekeepingError>;

    /// Revokes exactly one CIDR from the rule matching `rule`'s protocol and port range.
    async fn revoke_ingress(
        &self,
        group_id: &str,
        rule: &IngressRule,
        cidr: &str,
    ) -> Result<(), HousekeepingError>;
}

#[async_trait]
impl SecurityGroupStore for Ec2SecurityGroupClient {
    async fn describe_security_groups(
        &self,
    ) -> Result<Vec<AuditedSecurityGroup>, HousekeepingError> {
        let result = self
            .client
            .describe_security_groups(DescribeSecurityGroupsRequest::default())
            .await?;

        let mut groups = Vec::<AuditedSecurityGroup>::new();
        for group in result.security_groups.unwrap_or_default() {
            let rules = group
                .ip_permissions
                .unwrap_or_default()
                .into_iter()
                .map(ingress_rule)
                .collect();
            groups.push(AuditedSecurityGroup {
                group_id: group.group_id.ok_or(HousekeepingError::NoneValue)?,
                rules,
            })
        }
        Ok(groups)
    }

    async fn revoke_ingress(
        &self,
        group_id: &str,
        rule: &IngressRule,
        cidr: &str,
    ) -> Result<(), HousekeepingError> {
        let request = RevokeSecurityGroupIngressRequest {
            group_id: Some(group_id.to_string()),
            ip_permissions: Some(vec![IpPermission {
                ip_protocol: Some(rule.protocol.clone()),
                from_port: rule.from_port,
                to_port: rule.to_port,
                ip_ranges: Some(vec![IpRange {
                    cidr_ip: Some(cidr.to_string()),
                    ..IpRange::default()
                }]),
                ..IpPermission::default()
            }]),
            ..RevokeSecurityGroupIngressRequest::default()
        };

        self.client.revoke_security_group_ingress(request).await?;
        Ok(())
    }
}

impl Ec2SecurityGroupClient {
    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2SecurityGroupClient { client }
    }
}

fn ingress_rule(permission: IpPermission) -> IngressRule {
    IngressRule {
        protocol: permission.ip_protocol.unwrap_or_default(),
        from_port: permission.from_port,
        to_port: permission.to_port,
        cidrs: permission
            .ip_ranges
            .unwrap_or_default()
            .into_iter()
            .filter_map(|range| range.cidr_ip)
            .collect(),
    }
}
