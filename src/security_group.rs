pub const SSH_PORT: i64 = 22;
pub const OPEN_CIDR: &str = "0.0.0.0/0";

#[derive(Debug, Clone, PartialEq)]
pub struct IngressRule {
    pub protocol: String,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub cidrs: Vec<String>,
}

impl IngressRule {
    /// Rules without both port bounds (all-traffic rules) never match.
    pub fn covers_ssh(&self) -> bool {
        match (self.from_port, self.to_port) {
            (Some(from_port), Some(to_port)) => from_port <= SSH_PORT && SSH_PORT <= to_port,
            _ => false,
        }
    }

    /// Number of world-open CIDR entries on a rule that exposes SSH.
    pub fn violations(&self) -> usize {
        if !self.covers_ssh() {
            return 0;
        }
        self.cidrs.iter().filter(|cidr| *cidr == OPEN_CIDR).count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditedSecurityGroup {
    pub group_id: String,
    pub rules: Vec<IngressRule>,
}
