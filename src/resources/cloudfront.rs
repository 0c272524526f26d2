use serde::Serialize;
use serde_json::Value;

use super::CfnResource;

/// caching optimized:
/// https://docs.aws.amazon.com/AmazonCloudFront/latest/DeveloperGuide/using-managed-cache-policies.html#managed-cache-caching-optimized
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";
pub const ALLOW_GET_HEAD_OPTIONS: [&str; 3] = ["GET", "HEAD", "OPTIONS"];
pub const CACHE_GET_HEAD: [&str; 2] = ["GET", "HEAD"];
pub const TLS_V1_2_2021: &str = "TLSv1.2_2021";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Distribution {
    pub distribution_config: DistributionConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DistributionConfig {
    pub comment: String,
    pub enabled: bool,
    pub http_version: HttpVersion,
    #[serde(rename = "IPV6Enabled")]
    pub ipv6_enabled: bool,
    pub price_class: PriceClass,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewer_certificate: Option<ViewerCertificate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_error_responses: Vec<CustomErrorResponse>,
    pub default_cache_behavior: DefaultCacheBehavior,
    pub origins: Vec<Origin>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HttpVersion {
    #[serde(rename = "http2and3")]
    Http2And3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PriceClass {
    #[serde(rename = "PriceClass_All")]
    PriceClassAll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    RedirectToHttps,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewerCertificate {
    pub acm_certificate_arn: Value,
    pub minimum_protocol_version: String,
    pub ssl_support_method: String,
}

impl ViewerCertificate {
    pub fn sni(acm_certificate_arn: Value) -> Self {
        Self {
            acm_certificate_arn,
            minimum_protocol_version: TLS_V1_2_2021.to_string(),
            ssl_support_method: "sni-only".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomErrorResponse {
    pub error_code: u16,
    #[serde(rename = "ErrorCachingMinTTL")]
    pub error_caching_min_ttl: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DefaultCacheBehavior {
    pub target_origin_id: String,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: Vec<String>,
    pub cached_methods: Vec<String>,
    pub cache_policy_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_request_policy_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers_policy_id: Option<Value>,
    pub compress: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub function_associations: Vec<FunctionAssociation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FunctionEventType {
    ViewerRequest,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionAssociation {
    pub event_type: FunctionEventType,
    #[serde(rename = "FunctionARN")]
    pub function_arn: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Origin {
    pub id: String,
    pub domain_name: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_origin_config: Option<S3OriginConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_shield: Option<OriginShield>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct S3OriginConfig {
    /// `origin-access-identity/cloudfront/{id}`
    pub origin_access_identity: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginShield {
    pub enabled: bool,
    pub origin_shield_region: String,
}

/// cloudfront rejects an origin path of `/`. The bucket root is expressed by leaving it out.
pub fn normalize_origin_path(path: &str) -> Option<String> {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl CfnResource for Distribution {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::Distribution"
    }

    fn validate(&self) -> Result<(), String> {
        let config = &self.distribution_config;
        if config.origins.is_empty() {
            return Err("Must provide at least one origin to cloudfront distribution".to_string());
        }
        let target = &config.default_cache_behavior.target_origin_id;
        if !config.origins.iter().any(|o| &o.id == target) {
            return Err(format!("default cache behavior targets unknown origin '{target}'"));
        }
        if config.viewer_certificate.is_some() && config.aliases.is_empty() {
            return Err("a distribution with a custom certificate must have at least one alias".to_string());
        }
        if config.comment.len() > 128 {
            return Err("distribution comment must be at most 128 characters".to_string());
        }
        for origin in &config.origins {
            if let Some(path) = &origin.origin_path {
                if !path.starts_with('/') || path.ends_with('/') {
                    return Err(format!("origin path '{path}' must start with a / and must not end with one"));
                }
            }
        }
        Ok(())
    }
}

/// an identity cloudfront uses to read from a private bucket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessIdentity {
    pub cloud_front_origin_access_identity_config: OriginAccessIdentityConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginAccessIdentityConfig {
    pub comment: String,
}

impl OriginAccessIdentity {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            cloud_front_origin_access_identity_config: OriginAccessIdentityConfig { comment: comment.into() },
        }
    }
}

impl CfnResource for OriginAccessIdentity {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::CloudFrontOriginAccessIdentity"
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginRequestPolicy {
    pub origin_request_policy_config: OriginRequestPolicyConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OriginRequestPolicyConfig {
    pub name: String,
    pub comment: String,
    pub cookies_config: CookiesConfig,
    pub headers_config: HeadersConfig,
    pub query_strings_config: QueryStringsConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CookiesConfig {
    pub cookie_behavior: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeadersConfig {
    pub header_behavior: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryStringsConfig {
    pub query_string_behavior: String,
}

impl OriginRequestPolicy {
    /// forwards no cookies and no query strings. `headers` are forwarded
    /// to the origin, if empty no headers are forwarded either.
    pub fn forwarding_headers(name: &str, comment: impl Into<String>, headers: &[String]) -> Self {
        let header_behavior = if headers.is_empty() { "none" } else { "whitelist" };
        Self {
            origin_request_policy_config: OriginRequestPolicyConfig {
                name: policy_name(name),
                comment: comment.into(),
                cookies_config: CookiesConfig { cookie_behavior: "none".to_string() },
                headers_config: HeadersConfig {
                    header_behavior: header_behavior.to_string(),
                    headers: headers.to_vec(),
                },
                query_strings_config: QueryStringsConfig { query_string_behavior: "none".to_string() },
            },
        }
    }
}

impl CfnResource for OriginRequestPolicy {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::OriginRequestPolicy"
    }

    fn validate(&self) -> Result<(), String> {
        validate_policy_name(&self.origin_request_policy_config.name)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicy {
    pub response_headers_policy_config: ResponseHeadersPolicyConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicyConfig {
    pub name: String,
    pub security_headers_config: SecurityHeadersConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityHeadersConfig {
    pub frame_options: FrameOptions,
    pub referrer_policy: ReferrerPolicy,
    #[serde(rename = "XSSProtection")]
    pub xss_protection: XssProtection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FrameOptions {
    pub frame_option: String,
    pub r#override: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReferrerPolicy {
    pub referrer_policy: String,
    pub r#override: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct XssProtection {
    pub protection: bool,
    pub mode_block: bool,
    pub r#override: bool,
}

impl ResponseHeadersPolicy {
    /// SAMEORIGIN framing, strict-origin-when-cross-origin referrers and
    /// `X-XSS-Protection: 1; mode=block`. Every header overrides whatever the origin sent.
    pub fn security_headers(name: &str) -> Self {
        Self {
            response_headers_policy_config: ResponseHeadersPolicyConfig {
                name: policy_name(name),
                security_headers_config: SecurityHeadersConfig {
                    frame_options: FrameOptions { frame_option: "SAMEORIGIN".to_string(), r#override: true },
                    referrer_policy: ReferrerPolicy {
                        referrer_policy: "strict-origin-when-cross-origin".to_string(),
                        r#override: true,
                    },
                    xss_protection: XssProtection { protection: true, mode_block: true, r#override: true },
                },
            },
        }
    }
}

impl CfnResource for ResponseHeadersPolicy {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::ResponseHeadersPolicy"
    }

    fn validate(&self) -> Result<(), String> {
        validate_policy_name(&self.response_headers_policy_config.name)
    }
}

fn policy_name(name: &str) -> String {
    let mut name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    name.truncate(128);
    name
}

fn validate_policy_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 128 {
        return Err(format!("policy name '{name}' must be 1 to 128 characters"));
    }
    Ok(())
}
