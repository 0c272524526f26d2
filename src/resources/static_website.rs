use serde_json::Value;
use tracing::{debug, info, warn};

use super::*;
use crate::config::{SiteConfig, Variant, VariantSettings};
use crate::error::RenderError;

/// logical ids of the resources shared by both distributions.
struct Shared {
    certificate: String,
    function: String,
    origin_request_policy: String,
    response_headers_policy: String,
    bucket: String,
}

/// a higher level construct for hosting a static website: one private bucket,
/// a production distribution serving `domain_name` and a development distribution
/// serving the additional names, both behind the same certificate and both
/// running the viewer request function.
pub fn hosting_template(config: &SiteConfig) -> Result<Template, RenderError> {
    let project = &config.project_name;
    let hosting = &config.hosting;
    let id = |suffix: &str| logical_id(&format!("{project}-{suffix}"));
    let mut template = Template {
        description: format!("Static website hosting for {} ({project})", hosting.domain_name),
        ..Default::default()
    };

    let shared = Shared {
        certificate: id("certificate"),
        function: id("cf-fn-viewer-request"),
        origin_request_policy: id("origin-request"),
        response_headers_policy: id("response-headers-policy"),
        bucket: id("origin-bucket"),
    };

    let cert = Certificate::dns_validated(&hosting.domain_name, &hosting.additional_names, &hosting.hosted_zone_id);
    template.add(&shared.certificate, &cert)?;

    template.add(&shared.function, &CloudFrontFunction::viewer_request(project))?;

    // the header forwarded here is expected to be set by the viewer request function
    let origin_request_policy = OriginRequestPolicy::forwarding_headers(
        &format!("{project}-origin-request"),
        format!("{project} origin request policy"),
        &hosting.forwarded_headers,
    );
    template.add(&shared.origin_request_policy, &origin_request_policy)?;

    let response_headers_policy = ResponseHeadersPolicy::security_headers(&format!("{project}-response-headers-policy"));
    template.add(&shared.response_headers_policy, &response_headers_policy)?;

    let variants: Vec<VariantSettings> = Variant::ALL
        .into_iter()
        .map(|v| config.variant(v))
        .filter(|settings| {
            if settings.aliases.is_empty() {
                warn!(variant = settings.variant.as_str(), "no names configured, skipping distribution");
                return false;
            }
            true
        })
        .collect();

    let mut identities = vec![];
    for settings in &variants {
        let identity_id = id(&format!("origin-access-identity-{}", settings.variant.as_str()));
        let identity = OriginAccessIdentity::new(format!("{} {} access Identity", hosting.domain_name, settings.variant.as_str()));
        template.add(&identity_id, &identity)?;
        identities.push(identity_id);
    }

    template.add_with_policy(&shared.bucket, &Bucket::origin(&config.origin_bucket_name()), Some(RemovalPolicy::Retain))?;
    template.add(&id("origin-bucket-policy"), &BucketPolicy::grant_read(&shared.bucket, &identities))?;

    for (settings, identity_id) in variants.iter().zip(&identities) {
        let distribution_id = id(&format!("distribution-{}", settings.variant.as_str()));
        let distribution = distribution(config, settings, &shared, identity_id);
        template.add(&distribution_id, &distribution)?;
        debug!(logical_id = %distribution_id, aliases = ?settings.aliases, enabled = settings.enabled, "added distribution");

        match settings.variant {
            Variant::Prod => {
                for record_type in [RecordType::A, RecordType::Aaaa] {
                    let record = RecordSet::cloudfront_alias(&hosting.hosted_zone_id, &hosting.domain_name, record_type, &distribution_id);
                    template.add(&id(&format!("record-{}", record_type.as_str())), &record)?;
                }
            }
            Variant::Dev => {
                for name in &settings.aliases {
                    let suffix = additional_record_suffix(name, &hosting.domain_name);
                    let record = RecordSet::cloudfront_alias(&hosting.hosted_zone_id, name, RecordType::A, &distribution_id);
                    template.add(&id(&format!("record-a-{suffix}")), &record)?;
                }
            }
        }

        template.add_output(
            &format!("{}-domain-name", settings.variant.as_str()),
            format!("{} distribution domain name", settings.variant.as_str()),
            get_att(&distribution_id, "DomainName"),
        );
        template.add_output(
            &format!("{}-distribution-id", settings.variant.as_str()),
            format!("{} distribution id", settings.variant.as_str()),
            get_ref(&distribution_id),
        );
    }

    template.add_output("origin-bucket-name", "origin bucket name", get_ref(&shared.bucket));
    template.add_output("certificate-arn", "certificate ARN", get_ref(&shared.certificate));

    info!(resources = template.resources.len(), stack = %config.stack_name(), "rendered hosting template");
    Ok(template)
}

fn distribution(config: &SiteConfig, settings: &VariantSettings, shared: &Shared, identity_id: &str) -> Distribution {
    let origin_id = "origin0";
    let origin = Origin {
        id: origin_id.to_string(),
        domain_name: bucket_regional_domain_name(&shared.bucket),
        origin_path: normalize_origin_path(&settings.origin_path),
        s3_origin_config: Some(S3OriginConfig {
            origin_access_identity: join(
                "",
                vec![Value::String("origin-access-identity/cloudfront/".to_string()), get_ref(identity_id)],
            ),
        }),
        origin_shield: Some(OriginShield {
            enabled: true,
            origin_shield_region: config.origin_bucket_region(),
        }),
    };
    Distribution {
        distribution_config: DistributionConfig {
            comment: format!("{}-distribution-{}", config.project_name, settings.variant.as_str()),
            enabled: settings.enabled,
            http_version: HttpVersion::Http2And3,
            ipv6_enabled: settings.ipv6,
            price_class: PriceClass::PriceClassAll,
            aliases: settings.aliases.clone(),
            viewer_certificate: Some(ViewerCertificate::sni(get_ref(&shared.certificate))),
            custom_error_responses: vec![CustomErrorResponse { error_code: 400, error_caching_min_ttl: 0 }],
            default_cache_behavior: DefaultCacheBehavior {
                target_origin_id: origin_id.to_string(),
                viewer_protocol_policy: ViewerProtocolPolicy::RedirectToHttps,
                allowed_methods: ALLOW_GET_HEAD_OPTIONS.iter().map(|m| m.to_string()).collect(),
                cached_methods: CACHE_GET_HEAD.iter().map(|m| m.to_string()).collect(),
                cache_policy_id: CACHING_OPTIMIZED_POLICY_ID.to_string(),
                origin_request_policy_id: Some(get_ref(&shared.origin_request_policy)),
                response_headers_policy_id: Some(get_ref(&shared.response_headers_policy)),
                compress: true,
                function_associations: vec![FunctionAssociation {
                    event_type: FunctionEventType::ViewerRequest,
                    function_arn: get_att(&shared.function, "FunctionARN"),
                }],
            },
            origins: vec![origin],
        },
    }
}
