use serde::Serialize;

use super::CfnResource;

/// a DNS validated ACM certificate. This only works if the names being
/// certified are hosted in a Route 53 zone in the same account, since
/// cloudformation creates the validation records for us.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    pub domain_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
    pub validation_method: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_validation_options: Vec<DomainValidationOption>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainValidationOption {
    pub domain_name: String,
    pub hosted_zone_id: String,
}

impl Certificate {
    /// a certificate for `domain_name` + every additional name, validated
    /// through records in `hosted_zone_id`.
    pub fn dns_validated(domain_name: &str, additional_names: &[String], hosted_zone_id: &str) -> Self {
        let domain_validation_options = std::iter::once(domain_name)
            .chain(additional_names.iter().map(String::as_str))
            .map(|name| DomainValidationOption {
                domain_name: name.to_string(),
                hosted_zone_id: hosted_zone_id.to_string(),
            })
            .collect();
        Self {
            domain_name: domain_name.to_string(),
            subject_alternative_names: additional_names.to_vec(),
            validation_method: "DNS".to_string(),
            domain_validation_options,
        }
    }
}

impl CfnResource for Certificate {
    fn type_string(&self) -> &'static str {
        "AWS::CertificateManager::Certificate"
    }

    fn validate(&self) -> Result<(), String> {
        if self.domain_name.is_empty() {
            return Err("Must provide a domain name".to_string());
        }
        if self.subject_alternative_names.len() > 99 {
            return Err("A certificate can have at most 100 names".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_gets_a_validation_option() {
        let cert = Certificate::dns_validated("mysite.com", &["dev.mysite.com".to_string()], "Z123");
        let v = serde_json::to_value(&cert).unwrap();
        assert_eq!(v["DomainName"], "mysite.com");
        assert_eq!(v["ValidationMethod"], "DNS");
        assert_eq!(v["SubjectAlternativeNames"], serde_json::json!(["dev.mysite.com"]));
        assert_eq!(v["DomainValidationOptions"][0]["DomainName"], "mysite.com");
        assert_eq!(v["DomainValidationOptions"][1]["DomainName"], "dev.mysite.com");
        assert_eq!(v["DomainValidationOptions"][1]["HostedZoneId"], "Z123");
    }

    #[test]
    fn no_sans_no_key() {
        let cert = Certificate::dns_validated("mysite.com", &[], "Z123");
        let v = serde_json::to_value(&cert).unwrap();
        assert!(v.get("SubjectAlternativeNames").is_none());
    }
}
