use serde::Serialize;

use super::CfnResource;

pub const FUNCTION_RUNTIME: &str = "cloudfront-js-1.0";
/// cloudfront functions are limited to 10KB of source.
pub const MAX_FUNCTION_CODE_BYTES: usize = 10 * 1024;
const MAX_FUNCTION_NAME_LEN: usize = 64;
const MAX_COMMENT_LEN: usize = 128;

/// a cloudfront function. Not a lambda@edge: these run in a restricted
/// javascript runtime directly on the edge locations, and can only be attached
/// to viewer request/response events.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudFrontFunction {
    pub name: String,
    pub auto_publish: bool,
    pub function_code: String,
    pub function_config: FunctionConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionConfig {
    pub comment: String,
    pub runtime: String,
}

impl CloudFrontFunction {
    /// the function that maps navigation requests onto the index document.
    pub fn viewer_request(project_name: &str) -> Self {
        Self {
            name: function_name(&format!("{project_name}-cf-fn-viewer-request")),
            auto_publish: true,
            function_code: cf_viewer_request::function_code(),
            function_config: FunctionConfig {
                comment: format!("Viewer request cloudfront function for redirections ({project_name})")
                    .chars()
                    .take(MAX_COMMENT_LEN)
                    .collect(),
                runtime: FUNCTION_RUNTIME.to_string(),
            },
        }
    }
}

/// function names can only be alphanumeric + `-` + `_` and at most 64 characters.
fn function_name(name: &str) -> String {
    let mut name: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    name.truncate(MAX_FUNCTION_NAME_LEN);
    name
}

impl CfnResource for CloudFrontFunction {
    fn type_string(&self) -> &'static str {
        "AWS::CloudFront::Function"
    }

    fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() || self.name.len() > MAX_FUNCTION_NAME_LEN {
            return Err(format!("function name '{}' must be 1 to {MAX_FUNCTION_NAME_LEN} characters", self.name));
        }
        if self.function_code.len() > MAX_FUNCTION_CODE_BYTES {
            return Err(format!(
                "function code is {} bytes, cloudfront allows at most {MAX_FUNCTION_CODE_BYTES}",
                self.function_code.len()
            ));
        }
        if self.function_config.comment.len() > MAX_COMMENT_LEN {
            return Err(format!("function comment must be at most {MAX_COMMENT_LEN} characters"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewer_request_function() {
        let f = CloudFrontFunction::viewer_request("about-myself");
        assert_eq!(f.name, "about-myself-cf-fn-viewer-request");
        assert!(f.auto_publish);
        assert_eq!(f.function_code, cf_viewer_request::function_code());
        assert!(f.validate().is_ok());
        let v = serde_json::to_value(&f).unwrap();
        assert_eq!(v["FunctionConfig"]["Runtime"], "cloudfront-js-1.0");
        assert_eq!(v["FunctionConfig"]["Comment"], "Viewer request cloudfront function for redirections (about-myself)");
        assert_eq!(v["AutoPublish"], true);
    }

    #[test]
    fn long_names_are_truncated() {
        let f = CloudFrontFunction::viewer_request(&"x".repeat(120));
        assert_eq!(f.name.len(), 64);
        assert_eq!(f.function_config.comment.len(), 128);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(function_name("my.site fn"), "my-site-fn");
    }
}
