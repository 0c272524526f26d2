use serde::Serialize;
use serde_json::{json, Value};

use super::{get_att, join, CfnResource};

/// read only actions granted to each origin access identity.
pub const READ_ACTIONS: [&str; 3] = ["s3:GetObject*", "s3:GetBucket*", "s3:List*"];

/// the origin bucket. It is never public: cloudfront reads it through origin access identities.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Bucket {
    pub bucket_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors_configuration: Option<CorsConfiguration>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorsConfiguration {
    pub cors_rules: Vec<CorsRule>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorsRule {
    pub allowed_methods: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub max_age: u32,
}

impl Bucket {
    /// a private bucket that answers cross origin GET/HEAD from anywhere.
    pub fn origin(bucket_name: &str) -> Self {
        Self {
            bucket_name: bucket_name.to_string(),
            cors_configuration: Some(CorsConfiguration {
                cors_rules: vec![CorsRule {
                    allowed_methods: vec!["GET".to_string(), "HEAD".to_string()],
                    allowed_origins: vec!["*".to_string()],
                    max_age: 3000,
                }],
            }),
        }
    }
}

impl CfnResource for Bucket {
    fn type_string(&self) -> &'static str {
        "AWS::S3::Bucket"
    }

    fn validate(&self) -> Result<(), String> {
        if self.bucket_name.is_empty() {
            return Err("Must provide a bucket name".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicy {
    pub bucket: Value,
    pub policy_document: Value,
}

impl BucketPolicy {
    /// grants read on the bucket and every object in it to each of the
    /// given origin access identities (by logical id).
    pub fn grant_read(bucket_logical_id: &str, identity_logical_ids: &[String]) -> Self {
        let bucket_arn = get_att(bucket_logical_id, "Arn");
        let objects_arn = join("", vec![bucket_arn.clone(), Value::String("/*".to_string())]);
        let statements: Vec<Value> = identity_logical_ids
            .iter()
            .map(|identity| {
                json!({
                    "Effect": "Allow",
                    "Action": READ_ACTIONS,
                    "Principal": { "CanonicalUser": get_att(identity, "S3CanonicalUserId") },
                    "Resource": [bucket_arn, objects_arn],
                })
            })
            .collect();
        Self {
            bucket: super::get_ref(bucket_logical_id),
            policy_document: json!({
                "Version": "2012-10-17",
                "Statement": statements,
            }),
        }
    }
}

impl CfnResource for BucketPolicy {
    fn type_string(&self) -> &'static str {
        "AWS::S3::BucketPolicy"
    }

    fn validate(&self) -> Result<(), String> {
        match self.policy_document["Statement"].as_array() {
            Some(statements) if !statements.is_empty() => Ok(()),
            _ => Err("bucket policy must have at least one statement".to_string()),
        }
    }
}

/// the domain name cloudfront should use to reach the bucket.
pub fn bucket_regional_domain_name(bucket_logical_id: &str) -> Value {
    get_att(bucket_logical_id, "RegionalDomainName")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_bucket_cors() {
        let v = serde_json::to_value(Bucket::origin("my-bucket")).unwrap();
        assert_eq!(v["BucketName"], "my-bucket");
        assert_eq!(
            v["CorsConfiguration"]["CorsRules"][0],
            json!({"AllowedMethods": ["GET", "HEAD"], "AllowedOrigins": ["*"], "MaxAge": 3000})
        );
    }

    #[test]
    fn grant_read_has_one_statement_per_identity() {
        let ids = vec!["OaiProd".to_string(), "OaiDev".to_string()];
        let policy = BucketPolicy::grant_read("Bucket", &ids);
        assert!(policy.validate().is_ok());
        let statements = policy.policy_document["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[1]["Principal"]["CanonicalUser"], get_att("OaiDev", "S3CanonicalUserId"));
        assert_eq!(statements[0]["Action"], json!(["s3:GetObject*", "s3:GetBucket*", "s3:List*"]));
        assert_eq!(statements[0]["Resource"][1], json!({"Fn::Join": ["", [{"Fn::GetAtt": ["Bucket", "Arn"]}, "/*"]]}));
        assert_eq!(policy.bucket, json!({"Ref": "Bucket"}));
    }

    #[test]
    fn empty_grant_is_invalid() {
        assert!(BucketPolicy::grant_read("Bucket", &[]).validate().is_err());
    }
}
