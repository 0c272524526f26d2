use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

mod validation;
pub use validation::*;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_FORWARDED_HEADER: &str = "domain-name";

/// the top level site configuration. One file describes one hosting stack
/// with a production and a development distribution in front of the same bucket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// used as a prefix for every resource we create.
    pub project_name: String,
    /// the 12 digit account id the stack is meant for. deploy.sh refuses
    /// to run against any other account.
    pub account_id: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// if left empty we use `{project_name}-hosting`.
    #[serde(default)]
    pub stack_name: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    pub hosting: HostingConfig,
    #[serde(default)]
    pub distributions: DistributionsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostingConfig {
    /// the domain served by the production distribution, eg: `mysite.com`.
    pub domain_name: String,
    /// every additional name is served by the development distribution,
    /// and added to the certificate as a subject alternative name.
    #[serde(default)]
    pub additional_names: Vec<String>,
    /// the id of the existing Route 53 zone the records go into.
    pub hosted_zone_id: String,
    pub zone_name: String,
    #[serde(default)]
    pub origin_bucket_name: Option<String>,
    #[serde(default)]
    pub origin_bucket_region: Option<String>,
    /// headers the origin request policy forwards to the bucket.
    #[serde(default = "default_forwarded_headers")]
    pub forwarded_headers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionsConfig {
    #[serde(default)]
    pub prod: VariantOverrides,
    #[serde(default)]
    pub dev: VariantOverrides,
}

/// optional per variant settings. anything left out uses the variant's default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantOverrides {
    pub enabled: Option<bool>,
    pub ipv6: Option<bool>,
    pub origin_path: Option<String>,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_forwarded_headers() -> Vec<String> {
    vec![DEFAULT_FORWARDED_HEADER.to_string()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Prod,
    Dev,
}

/// the resolved settings of one distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSettings {
    pub variant: Variant,
    pub aliases: Vec<String>,
    pub enabled: bool,
    pub ipv6: bool,
    pub origin_path: String,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::Prod, Variant::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Prod => "prod",
            Variant::Dev => "dev",
        }
    }
}

impl SiteConfig {
    pub fn stack_name(&self) -> String {
        match &self.stack_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}-hosting", self.project_name),
        }
    }

    /// the configured tags, always including `project`.
    pub fn tags(&self) -> BTreeMap<String, String> {
        let mut tags = self.tags.clone();
        tags.entry("project".to_string()).or_insert_with(|| self.project_name.clone());
        tags
    }

    pub fn origin_bucket_name(&self) -> String {
        match &self.hosting.origin_bucket_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}-hosting", self.project_name),
        }
    }

    pub fn origin_bucket_region(&self) -> String {
        match &self.hosting.origin_bucket_region {
            Some(region) if !region.is_empty() => region.clone(),
            _ => self.region.clone(),
        }
    }

    pub fn variant(&self, variant: Variant) -> VariantSettings {
        let (overrides, aliases, enabled, ipv6, origin_path) = match variant {
            Variant::Prod => (
                &self.distributions.prod,
                vec![self.hosting.domain_name.clone()],
                true,
                true,
                "/master",
            ),
            // the dev distribution is created disabled and is expected to sit behind a firewall
            Variant::Dev => (
                &self.distributions.dev,
                self.hosting.additional_names.clone(),
                false,
                false,
                "/",
            ),
        };
        VariantSettings {
            variant,
            aliases,
            enabled: overrides.enabled.unwrap_or(enabled),
            ipv6: overrides.ipv6.unwrap_or(ipv6),
            origin_path: overrides.origin_path.clone().unwrap_or_else(|| origin_path.to_string()),
        }
    }
}

/// parse and validate a configuration. `path` is only used for error messages.
pub fn parse_config(content: &str, path: &Path) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    debug!(path = %path.display(), "loading site config");
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}
