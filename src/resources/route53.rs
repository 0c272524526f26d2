use serde::Serialize;
use serde_json::Value;

use super::{get_att, CfnResource};

/// every cloudfront distribution lives in this hosted zone.
/// https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/aws-properties-route53-aliastarget.html
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "a",
            RecordType::Aaaa => "aaaa",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordSet {
    pub hosted_zone_id: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: RecordType,
    pub alias_target: AliasTarget,
}

#[derive(Debug, Clone, Serialize)]
pub struct AliasTarget {
    #[serde(rename = "DNSName")]
    pub dns_name: Value,
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
}

impl RecordSet {
    /// an alias record pointing `name` at a distribution in this template.
    pub fn cloudfront_alias(hosted_zone_id: &str, name: &str, record_type: RecordType, distribution_logical_id: &str) -> Self {
        Self {
            hosted_zone_id: hosted_zone_id.to_string(),
            name: name.to_string(),
            record_type,
            alias_target: AliasTarget {
                dns_name: get_att(distribution_logical_id, "DomainName"),
                hosted_zone_id: CLOUDFRONT_HOSTED_ZONE_ID.to_string(),
            },
        }
    }
}

impl CfnResource for RecordSet {
    fn type_string(&self) -> &'static str {
        "AWS::Route53::RecordSet"
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Route53 record must have a name. Example mysubdomain.mywebsite.com".to_string());
        }
        if self.hosted_zone_id.is_empty() {
            return Err(format!("Route53 record {} is missing a hosted zone id", self.name));
        }
        Ok(())
    }
}

/// the suffix of an additional name's record id: the name with the apex domain
/// removed and dots turned into hyphens. `dev.mysite.com` -> `dev-`.
/// A wildcard label becomes `wildcard`, logical ids cant carry a `*`.
pub fn additional_record_suffix(name: &str, domain_name: &str) -> String {
    name.replace(domain_name, "").replace('*', "wildcard").replace('.', "-")
}
