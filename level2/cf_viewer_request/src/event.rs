use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::rewrite_uri;

/// the event object cloudfront passes to a viewer request function.
/// see https://docs.aws.amazon.com/AmazonCloudFront/latest/DeveloperGuide/functions-event-structure.html
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerRequestEvent {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub context: EventContext,
    #[serde(default)]
    pub viewer: Viewer,
    pub request: Request,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub distribution_domain_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub distribution_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
}

/// the request descriptor. Only `uri` is ever modified. Everything else,
/// including fields we dont model, is carried back to the CDN as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub querystring: Map<String, Value>,
    #[serde(default)]
    pub headers: Map<String, Value>,
    #[serde(default)]
    pub cookies: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Request {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// applies the routing rule in place.
    pub fn route(&mut self) {
        let routed = rewrite_uri(&self.uri);
        if routed != self.uri.as_str() {
            self.uri = routed.into_owned();
        }
    }
}
