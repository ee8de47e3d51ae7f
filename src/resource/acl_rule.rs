//! Network ACL rule domain model
//!
//! Case-insensitive enum fields are parsed into closed sets with a
//! canonical lower-case form, and the protocol-specific optional fields
//! (ports for TCP/UDP, type/code for ICMP) live inside the protocol
//! variant they belong to.

use super::data::ResourceData;
use crate::hci::{HciError, NetworkAclRule};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Allow,
    Deny,
}

impl Action {
    pub const ALL: [Action; 2] = [Action::Allow, Action::Deny];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::Deny => "deny",
        }
    }
}

impl FromStr for Action {
    type Err = HciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("action", s, "Allow or Deny"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    All,
}

impl Protocol {
    pub const ALL: [Protocol; 4] = [Protocol::Tcp, Protocol::Udp, Protocol::Icmp, Protocol::All];

    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Icmp => "icmp",
            Protocol::All => "all",
        }
    }

    pub fn has_ports(self) -> bool {
        matches!(self, Protocol::Tcp | Protocol::Udp)
    }
}

impl FromStr for Protocol {
    type Err = HciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Protocol::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("protocol", s, "TCP, UDP, ICMP or All"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficType {
    Ingress,
    Egress,
}

impl TrafficType {
    pub const ALL: [TrafficType; 2] = [TrafficType::Ingress, TrafficType::Egress];

    pub fn as_str(self) -> &'static str {
        match self {
            TrafficType::Ingress => "ingress",
            TrafficType::Egress => "egress",
        }
    }
}

impl FromStr for TrafficType {
    type Err = HciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TrafficType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| invalid_value("traffic_type", s, "Ingress or Egress"))
    }
}

macro_rules! impl_string_enum {
    ($($ty:ty),*) => {
        $(impl $ty {
            /// Upper-case form the API uses on the wire
            pub fn api_name(self) -> String {
                self.as_str().to_ascii_uppercase()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_string_enum!(Action, Protocol, TrafficType);

fn invalid_value(attribute: &str, value: &str, expected: &str) -> HciError {
    HciError::validation(format!(
        "Invalid {} \"{}\": expected {}",
        attribute, value, expected
    ))
}

/// Port range of a TCP or UDP rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortRange {
    pub start_port: Option<String>,
    pub end_port: Option<String>,
}

/// Type and code of an ICMP rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IcmpMatch {
    pub icmp_type: Option<String>,
    pub icmp_code: Option<String>,
}

/// Protocol of a rule together with the fields only that protocol accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolRule {
    Tcp(PortRange),
    Udp(PortRange),
    Icmp(IcmpMatch),
    All,
}

impl ProtocolRule {
    /// Pair a protocol with the optional port and ICMP fields of a configuration.
    /// Ports are only accepted for TCP/UDP and ICMP fields only for ICMP.
    pub fn from_resource_data(protocol: Protocol, data: &ResourceData) -> Result<Self, HciError> {
        let ports = fill_port_fields(data);
        let icmp = fill_icmp_fields(data);

        let has_ports = ports.start_port.is_some() || ports.end_port.is_some();
        let has_icmp = icmp.icmp_type.is_some() || icmp.icmp_code.is_some();

        if !protocol.has_ports() && has_ports {
            return Err(HciError::validation(
                "Cannot have ports if not TCP or UDP protocol",
            ));
        }
        if protocol != Protocol::Icmp && has_icmp {
            return Err(HciError::validation(
                "Cannot have icmp fields if not ICMP protocol",
            ));
        }

        Ok(match protocol {
            Protocol::Tcp => ProtocolRule::Tcp(ports),
            Protocol::Udp => ProtocolRule::Udp(ports),
            Protocol::Icmp => ProtocolRule::Icmp(icmp),
            Protocol::All => ProtocolRule::All,
        })
    }

    pub fn protocol(&self) -> Protocol {
        match self {
            ProtocolRule::Tcp(_) => Protocol::Tcp,
            ProtocolRule::Udp(_) => Protocol::Udp,
            ProtocolRule::Icmp(_) => Protocol::Icmp,
            ProtocolRule::All => Protocol::All,
        }
    }

    /// Copy the protocol and its fields onto a wire rule
    fn apply_to(&self, rule: &mut NetworkAclRule) {
        rule.protocol = self.protocol().api_name();
        match self {
            ProtocolRule::Tcp(ports) | ProtocolRule::Udp(ports) => {
                rule.start_port = ports.start_port.clone().unwrap_or_default();
                rule.end_port = ports.end_port.clone().unwrap_or_default();
            }
            ProtocolRule::Icmp(icmp) => {
                rule.icmp_type = icmp.icmp_type.clone().unwrap_or_default();
                rule.icmp_code = icmp.icmp_code.clone().unwrap_or_default();
            }
            ProtocolRule::All => {}
        }
    }
}

/// Start/end port from a configuration, only when set
pub fn fill_port_fields(data: &ResourceData) -> PortRange {
    PortRange {
        start_port: data.get_ok("start_port").map(String::from),
        end_port: data.get_ok("end_port").map(String::from),
    }
}

/// ICMP type/code from a configuration, only when set
pub fn fill_icmp_fields(data: &ResourceData) -> IcmpMatch {
    IcmpMatch {
        icmp_type: data.get_ok("icmp_type").map(String::from),
        icmp_code: data.get_ok("icmp_code").map(String::from),
    }
}

/// Validated payload of a network ACL rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclRuleSpec {
    pub rule_number: String,
    pub cidr: String,
    pub action: Action,
    pub traffic_type: TrafficType,
    pub protocol: ProtocolRule,
    pub network_acl_id: String,
}

impl AclRuleSpec {
    pub fn from_resource_data(data: &ResourceData) -> Result<Self, HciError> {
        let protocol: Protocol = data.get("protocol").parse()?;

        Ok(Self {
            rule_number: data.get("rule_number").to_string(),
            cidr: data.get("cidr").to_string(),
            action: data.get("action").parse()?,
            traffic_type: data.get("traffic_type").parse()?,
            protocol: ProtocolRule::from_resource_data(protocol, data)?,
            network_acl_id: data.get("network_acl_id").to_string(),
        })
    }

    fn to_wire(&self) -> NetworkAclRule {
        let mut rule = NetworkAclRule {
            rule_number: self.rule_number.clone(),
            cidr: self.cidr.clone(),
            action: self.action.api_name(),
            traffic_type: self.traffic_type.api_name(),
            ..Default::default()
        };
        self.protocol.apply_to(&mut rule);
        rule
    }

    /// Body of a create call; the owning network ACL travels with it
    pub fn to_create_request(&self) -> NetworkAclRule {
        NetworkAclRule {
            network_acl_id: self.network_acl_id.clone(),
            ..self.to_wire()
        }
    }

    /// Body of an update call; the network ACL cannot change so it is not sent
    pub fn to_update_request(&self, id: &str) -> NetworkAclRule {
        NetworkAclRule {
            id: id.to_string(),
            ..self.to_wire()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(protocol: &str) -> ResourceData {
        ResourceData::new()
            .with("environment_id", "env-1")
            .with("rule_number", "10")
            .with("cidr", "10.0.0.0/24")
            .with("action", "Allow")
            .with("protocol", protocol)
            .with("traffic_type", "Ingress")
            .with("network_acl_id", "acl-1")
    }

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("ALLOW".parse::<Action>().unwrap(), Action::Allow);
        assert_eq!("Deny".parse::<Action>().unwrap(), Action::Deny);
        assert_eq!("tCp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!("All".parse::<Protocol>().unwrap(), Protocol::All);
        assert_eq!("EGRESS".parse::<TrafficType>().unwrap(), TrafficType::Egress);
        assert_eq!(Protocol::Icmp.to_string(), "icmp");
    }

    #[test]
    fn test_unknown_enum_value_is_validation_error() {
        let err = "sctp".parse::<Protocol>().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("TCP, UDP, ICMP or All"));
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn test_tcp_with_ports() {
        let data = config("TCP").with("start_port", "80").with("end_port", "443");
        let spec = AclRuleSpec::from_resource_data(&data).unwrap();
        assert_eq!(
            spec.protocol,
            ProtocolRule::Tcp(PortRange {
                start_port: Some("80".to_string()),
                end_port: Some("443".to_string()),
            })
        );

        let request = spec.to_create_request();
        assert_eq!(request.protocol, "TCP");
        assert_eq!(request.action, "ALLOW");
        assert_eq!(request.traffic_type, "INGRESS");
        assert_eq!(request.start_port, "80");
        assert_eq!(request.end_port, "443");
        assert_eq!(request.network_acl_id, "acl-1");
        assert!(request.icmp_type.is_empty());
    }

    #[test]
    fn test_ports_rejected_for_non_port_protocols() {
        for protocol in ["ICMP", "All", "icmp", "all"] {
            let data = config(protocol).with("end_port", "22");
            let err = AclRuleSpec::from_resource_data(&data).unwrap_err();
            assert_eq!(err.to_string(), "Cannot have ports if not TCP or UDP protocol");
        }
    }

    #[test]
    fn test_icmp_fields_rejected_for_non_icmp_protocols() {
        for protocol in ["TCP", "UDP", "All"] {
            let data = config(protocol).with("icmp_code", "0");
            let err = AclRuleSpec::from_resource_data(&data).unwrap_err();
            assert_eq!(err.to_string(), "Cannot have icmp fields if not ICMP protocol");
        }
    }

    #[test]
    fn test_icmp_rule() {
        let data = config("Icmp").with("icmp_type", "8").with("icmp_code", "0");
        let spec = AclRuleSpec::from_resource_data(&data).unwrap();
        let request = spec.to_update_request("r-1");
        assert_eq!(request.id, "r-1");
        assert_eq!(request.protocol, "ICMP");
        assert_eq!(request.icmp_type, "8");
        assert_eq!(request.icmp_code, "0");
        assert!(request.network_acl_id.is_empty());
    }

    #[test]
    fn test_wire_uses_upper_case_whatever_the_config_casing() {
        let data = config(" udp ")
            .with("action", "deny")
            .with("traffic_type", "eGrEsS");
        let request = AclRuleSpec::from_resource_data(&data)
            .unwrap()
            .to_create_request();
        assert_eq!(request.protocol, "UDP");
        assert_eq!(request.action, "DENY");
        assert_eq!(request.traffic_type, "EGRESS");
        assert_eq!(Protocol::All.api_name(), "ALL");
    }

    #[test]
    fn test_empty_optional_fields_are_unset() {
        let data = config("All").with("start_port", "").with("icmp_type", "");
        let spec = AclRuleSpec::from_resource_data(&data).unwrap();
        assert_eq!(spec.protocol, ProtocolRule::All);
    }
}
