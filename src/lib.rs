//! Static website hosting on cloudfront + S3.
//!
//! A site config describes one stack: a private origin bucket, a production
//! and a development distribution, a DNS validated certificate and the DNS
//! records pointing at the distributions. [`render_site`] turns it into a
//! cloudformation template plus a deploy script; the routing rule that runs
//! on the edge lives in the `cf_viewer_request` crate.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod resources;

pub use cf_viewer_request as viewer_request;
pub use config::{load_config, SiteConfig};
pub use error::{ConfigError, RenderError, SiteError};

/// everything `render` writes to disk.
#[derive(Debug, Clone)]
pub struct RenderedSite {
    pub stack_name: String,
    pub template: resources::Template,
    pub function_code: String,
    pub deploy_script: String,
}

pub fn render_site(config: &SiteConfig) -> Result<RenderedSite, RenderError> {
    let template = resources::hosting_template(config)?;
    Ok(RenderedSite {
        stack_name: config.stack_name(),
        template,
        function_code: viewer_request::function_code(),
        deploy_script: deploy::deploy_script(config),
    })
}

impl RenderedSite {
    /// writes the template, the function source and deploy.sh into `out_dir`,
    /// creating it if needed. Returns the paths written.
    pub fn write_to(&self, out_dir: &Path) -> Result<Vec<PathBuf>, SiteError> {
        std::fs::create_dir_all(out_dir).map_err(|source| SiteError::Write {
            path: out_dir.to_path_buf(),
            source,
        })?;
        let template = self.template.to_json_pretty()?;
        let mut written = vec![];
        for (name, contents) in [
            (deploy::TEMPLATE_FILE, template.as_str()),
            (deploy::FUNCTION_FILE, self.function_code.as_str()),
            (deploy::DEPLOY_FILE, self.deploy_script.as_str()),
        ] {
            let path = out_dir.join(name);
            std::fs::write(&path, contents).map_err(|source| SiteError::Write {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        make_executable(&out_dir.join(deploy::DEPLOY_FILE))?;
        info!(dir = %out_dir.display(), stack = %self.stack_name, "wrote deployment artifacts");
        Ok(written)
    }
}

/// the `route` report line for one uri: `uri -> rewritten`.
pub fn route_report(uri: &str) -> String {
    format!("{uri} -> {}", viewer_request::rewrite_uri(uri))
}

/// runs the viewer request function on a JSON event and returns the request
/// it forwards, as pretty JSON.
pub fn handle_event_json(input: &str) -> Result<String, SiteError> {
    let event: viewer_request::ViewerRequestEvent = serde_json::from_str(input).map_err(SiteError::Event)?;
    let before = event.request.uri.clone();
    let request = viewer_request::handle(event);
    debug!(from = %before, to = %request.uri, "handled viewer request");
    serde_json::to_string_pretty(&request).map_err(SiteError::Output)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), SiteError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(|source| SiteError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), SiteError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_report_lines() {
        assert_eq!(route_report("/about"), "/about -> /index.html");
        assert_eq!(route_report("/app.js"), "/app.js -> /app.js");
    }

    #[test]
    fn handle_event_routes_the_request() {
        let input = r#"{
            "version": "1.0",
            "context": { "eventType": "viewer-request" },
            "viewer": { "ip": "198.51.100.11" },
            "request": {
                "method": "GET",
                "uri": "/blog/my-post",
                "querystring": {},
                "headers": { "host": { "value": "oleksiipopov.com" } },
                "cookies": {}
            }
        }"#;
        let out: serde_json::Value = serde_json::from_str(&handle_event_json(input).unwrap()).unwrap();
        assert_eq!(out["uri"], "/index.html");
        assert_eq!(out["method"], "GET");
        assert_eq!(out["headers"]["host"]["value"], "oleksiipopov.com");
    }

    #[test]
    fn handle_event_rejects_bad_input() {
        let err = handle_event_json("{ not json").unwrap_err();
        assert!(matches!(err, SiteError::Event(_)));
        assert!(err.to_string().starts_with("invalid viewer request event"));
    }
}
