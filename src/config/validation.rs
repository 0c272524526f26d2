use super::{SiteConfig, Variant};

/// a single validation failure. `field` is the dotted path of the offending key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { field: field.into(), reason: reason.into() }
    }
}

/// certificates that are attached to a cloudfront distribution must be issued in us-east-1.
/// since the certificate lives in the same stack, so does everything else.
pub const CERTIFICATE_REGION: &str = "us-east-1";

/// checks everything serde cant. Every failure is returned, not just the first.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = vec![];

    if let Err(e) = validate_project_name(&config.project_name) {
        errors.push(ValidationError::new("project_name", e));
    }
    if config.account_id.len() != 12 || !config.account_id.chars().all(|c| c.is_ascii_digit()) {
        errors.push(ValidationError::new("account_id", format!("'{}' must be exactly 12 digits", config.account_id)));
    }
    if config.region != CERTIFICATE_REGION {
        errors.push(ValidationError::new(
            "region",
            format!("'{}' is not supported. The distribution certificate must be issued in {CERTIFICATE_REGION}", config.region),
        ));
    }
    if let Err(e) = validate_region(&config.origin_bucket_region()) {
        errors.push(ValidationError::new("hosting.origin_bucket_region", e));
    }
    if let Err(e) = validate_stack_name(&config.stack_name()) {
        errors.push(ValidationError::new("stack_name", e));
    }
    if let Err(e) = validate_bucket_name(&config.origin_bucket_name()) {
        errors.push(ValidationError::new("hosting.origin_bucket_name", e));
    }

    let hosting = &config.hosting;
    if hosting.hosted_zone_id.is_empty()
        || !hosting.hosted_zone_id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        errors.push(ValidationError::new(
            "hosting.hosted_zone_id",
            format!("'{}' must be the zone id without the /hostedzone/ prefix", hosting.hosted_zone_id),
        ));
    }
    if let Err(e) = validate_domain_name(&hosting.zone_name) {
        errors.push(ValidationError::new("hosting.zone_name", e));
    }
    if let Err(e) = validate_record_name(&hosting.domain_name, &hosting.zone_name) {
        errors.push(ValidationError::new("hosting.domain_name", e));
    }
    for (i, name) in hosting.additional_names.iter().enumerate() {
        if let Err(e) = validate_record_name(name, &hosting.zone_name) {
            errors.push(ValidationError::new(format!("hosting.additional_names[{i}]"), e));
        }
        if name == &hosting.domain_name || hosting.additional_names[..i].contains(name) {
            errors.push(ValidationError::new(format!("hosting.additional_names[{i}]"), format!("'{name}' is listed more than once")));
        }
    }
    for (i, header) in hosting.forwarded_headers.iter().enumerate() {
        if header.is_empty() || !header.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            errors.push(ValidationError::new(format!("hosting.forwarded_headers[{i}]"), format!("'{header}' is not a valid header name")));
        }
    }

    for variant in Variant::ALL {
        let settings = config.variant(variant);
        if let Err(e) = validate_origin_path(&settings.origin_path) {
            errors.push(ValidationError::new(format!("distributions.{}.origin_path", variant.as_str()), e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// regions an origin bucket can live in.
pub const AWS_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "ca-central-1",
    "eu-north-1",
    "eu-west-3",
    "eu-west-2",
    "eu-west-1",
    "eu-central-1",
    "eu-central-2",
    "eu-south-1",
    "eu-south-2",
    "ap-south-1",
    "ap-south-2",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-northeast-3",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-southeast-3",
    "ap-southeast-4",
    "ap-east-1",
    "sa-east-1",
    "me-south-1",
    "me-central-1",
    "il-central-1",
    "af-south-1",
];

pub fn validate_region(region: &str) -> Result<(), String> {
    if AWS_REGIONS.contains(&region) {
        Ok(())
    } else {
        Err(format!("Invalid region code {region:?}\nMust be one of {AWS_REGIONS:?}"))
    }
}

fn validate_project_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return Err(format!("'{name}' must start with a letter")),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(format!("'{name}' may only contain letters, digits, hyphens and underscores"));
    }
    Ok(())
}

/// A stack name can contain only alphanumeric characters (case sensitive) and hyphens.
/// It must start with an alphabetical character and can't be longer than 128 characters.
pub fn validate_stack_name(stack_name: &str) -> Result<(), String> {
    let restriction = "Must only consist of alphanumeric characters and hyphens, Must start with an alphabetical character, and cannot be longer than 128 characters.";
    for (i, c) in stack_name.chars().enumerate() {
        if i == 0 && !c.is_ascii_alphabetic() {
            return Err(format!("Invalid stack name {stack_name}\n{restriction}"));
        }
        if !c.is_ascii_alphanumeric() && c != '-' {
            return Err(format!("Invalid stack name {stack_name}\n{restriction}"));
        }
    }
    if stack_name.is_empty() || stack_name.len() > 128 {
        return Err(format!("Invalid stack name {stack_name}\n{restriction}"));
    }
    Ok(())
}

/// see https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html
pub fn validate_bucket_name(name: &str) -> Result<(), String> {
    if name.len() < 3 || name.len() > 63 {
        return Err(format!("'{name}' must be between 3 and 63 characters long"));
    }
    if !name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-') {
        return Err(format!("'{name}' may only contain lowercase letters, digits, dots and hyphens"));
    }
    let first_last_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if !first_last_ok(name.chars().next()) || !first_last_ok(name.chars().last()) {
        return Err(format!("'{name}' must begin and end with a letter or digit"));
    }
    if name.contains("..") {
        return Err(format!("'{name}' must not contain two adjacent dots"));
    }
    Ok(())
}

/// the domain must be fully qualified and can have 1 optional wildcard as its first label.
/// Examples of valid values:
/// - www.mysite.com
/// - mysite.com
/// - *.mysite.com
/// Examples of invalid values:
/// - *.something.*.mysite.com
/// - cannotendwithdot.com.
pub fn validate_domain_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Must provide a domain name".to_string());
    }
    if name.ends_with('.') {
        return Err(format!("{name} must not end with a dot"));
    }
    if name.contains('*') {
        if name.matches('*').count() > 1 {
            return Err(format!("Must only provide 1 wildcard. {name} is invalid."));
        }
        if !name.starts_with("*.") {
            return Err(format!("If using a wildcard, it must be the first component of your domain, eg: \"*.something.com\". {name} is invalid."));
        }
    }
    let labels: Vec<&str> = name.trim_start_matches("*.").split('.').collect();
    if labels.len() < 2 {
        return Err(format!("{name} is not fully qualified"));
    }
    for label in labels {
        let valid = !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(format!("{name} has an invalid label '{label}'"));
        }
    }
    Ok(())
}

/// a record name must be a valid domain inside the hosted zone.
fn validate_record_name(name: &str, zone_name: &str) -> Result<(), String> {
    validate_domain_name(name)?;
    if name != zone_name && !name.ends_with(&format!(".{zone_name}")) {
        return Err(format!("{name} is not inside the hosted zone {zone_name}"));
    }
    Ok(())
}

fn validate_origin_path(path: &str) -> Result<(), String> {
    if !path.starts_with('/') {
        return Err(format!("'{path}' must start with a /"));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(format!("'{path}' must not end with a /"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::example;

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn example_is_valid() {
        assert_eq!(validate_config(&example()), Ok(()));
    }

    #[test]
    fn all_failures_are_reported() {
        let mut c = example();
        c.account_id = "1234".into();
        c.region = "eu-west-1".into();
        c.hosting.origin_bucket_name = Some("Not_A_Bucket".into());
        c.hosting.additional_names.push("dev.example.org".into());
        let errors = validate_config(&c).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec!["account_id", "region", "hosting.origin_bucket_name", "hosting.additional_names[1]"]
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut c = example();
        c.hosting.additional_names.push("oleksiipopov.com".into());
        c.hosting.additional_names.push("dev.oleksiipopov.com".into());
        let errors = validate_config(&c).unwrap_err();
        assert_eq!(fields(&errors), vec!["hosting.additional_names[1]", "hosting.additional_names[2]"]);
    }

    #[test]
    fn stack_names() {
        assert!(validate_stack_name("about-myself-hosting").is_ok());
        assert!(validate_stack_name("1abc").is_err());
        assert!(validate_stack_name("abc_def").is_err());
        assert!(validate_stack_name("").is_err());
        assert!(validate_stack_name(&"a".repeat(129)).is_err());
    }

    #[test]
    fn bucket_names() {
        assert!(validate_bucket_name("about-myself-hosting").is_ok());
        assert!(validate_bucket_name("my.site.bucket").is_ok());
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name("-abc").is_err());
        assert!(validate_bucket_name("abc-").is_err());
        assert!(validate_bucket_name("a..b").is_err());
        assert!(validate_bucket_name("UPPER").is_err());
    }

    #[test]
    fn domain_names() {
        assert!(validate_domain_name("www.mysite.com").is_ok());
        assert!(validate_domain_name("multiple.sub.domains.mysite.com").is_ok());
        assert!(validate_domain_name("*.mysite.com").is_ok());
        assert!(validate_domain_name("*.something.*.mysite.com").is_err());
        assert!(validate_domain_name("www.*.mysite.com").is_err());
        assert!(validate_domain_name("cannotendwithdot.com.").is_err());
        assert!(validate_domain_name("localhost").is_err());
        assert!(validate_domain_name("-bad.com").is_err());
        assert!(validate_domain_name("").is_err());
    }

    #[test]
    fn origin_paths() {
        assert!(validate_origin_path("/").is_ok());
        assert!(validate_origin_path("/master").is_ok());
        assert!(validate_origin_path("master").is_err());
        assert!(validate_origin_path("/master/").is_err());
    }

    #[test]
    fn origin_bucket_region_must_be_a_region() {
        let mut c = example();
        c.hosting.origin_bucket_region = Some("eu-west-1".into());
        assert_eq!(validate_config(&c), Ok(()));

        c.hosting.origin_bucket_region = Some("mars-north-1".into());
        let errors = validate_config(&c).unwrap_err();
        assert_eq!(fields(&errors), vec!["hosting.origin_bucket_region"]);

        assert!(validate_region("US-EAST-1").is_err());
        assert!(validate_region("").is_err());
    }

    #[test]
    fn zone_id_without_prefix() {
        let mut c = example();
        c.hosting.hosted_zone_id = "/hostedzone/Z1O5PNX51MI59R".into();
        let errors = validate_config(&c).unwrap_err();
        assert_eq!(fields(&errors), vec!["hosting.hosted_zone_id"]);
    }
}
