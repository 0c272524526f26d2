use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::RenderError;

mod acm_cert;
pub use acm_cert::*;
mod cloudfront;
pub use cloudfront::*;
mod cloudfront_function;
pub use cloudfront_function::*;
mod s3_bucket;
pub use s3_bucket::*;
mod route53;
pub use route53::*;

// higher level resources:
mod static_website;
pub use static_website::*;

/// a resource that can be placed in a template. `type_string` is the
/// cloudformation type, eg: `AWS::S3::Bucket`. Serializing the value gives the
/// `Properties` block.
pub trait CfnResource: Serialize {
    fn type_string(&self) -> &'static str;

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// what happens to the physical resource when it is removed from the stack
/// or replaced by an update. Without one cloudformation deletes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalPolicy {
    Retain,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedResource {
    #[serde(rename = "Type")]
    pub ty: String,
    #[serde(rename = "Properties")]
    pub properties: Value,
    #[serde(rename = "DeletionPolicy", skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<RemovalPolicy>,
    #[serde(rename = "UpdateReplacePolicy", skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<RemovalPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceOutput {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Value")]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub version: String,
    #[serde(rename = "Description", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "Resources")]
    pub resources: BTreeMap<String, SavedResource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, ResourceOutput>,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            version: "2010-09-09".to_string(),
            description: Default::default(),
            resources: Default::default(),
            outputs: Default::default(),
        }
    }
}

impl Template {
    pub fn add<R: CfnResource>(&mut self, logical_id: &str, resource: &R) -> Result<(), RenderError> {
        self.add_with_policy(logical_id, resource, None)
    }

    pub fn add_with_policy<R: CfnResource>(
        &mut self,
        logical_id: &str,
        resource: &R,
        removal_policy: Option<RemovalPolicy>,
    ) -> Result<(), RenderError> {
        resource.validate().map_err(|reason| RenderError::InvalidResource {
            logical_id: logical_id.to_string(),
            reason,
        })?;
        if self.resources.contains_key(logical_id) {
            return Err(RenderError::DuplicateLogicalId(logical_id.to_string()));
        }
        let properties = serde_json::to_value(resource).map_err(|source| RenderError::Serialize {
            logical_id: logical_id.to_string(),
            source,
        })?;
        let saved = SavedResource {
            ty: resource.type_string().to_string(),
            properties,
            deletion_policy: removal_policy,
            update_replace_policy: removal_policy,
        };
        self.resources.insert(logical_id.to_string(), saved);
        Ok(())
    }

    pub fn add_output(&mut self, name: &str, description: impl Into<String>, value: Value) {
        self.outputs.insert(logical_id(name), ResourceOutput {
            description: description.into(),
            value,
        });
    }

    pub fn resources_of_type<'a>(&'a self, ty: &'a str) -> impl Iterator<Item = (&'a String, &'a SavedResource)> + 'a {
        self.resources.iter().filter(move |(_, r)| r.ty == ty)
    }

    pub fn to_json_pretty(&self) -> Result<String, RenderError> {
        serde_json::to_string_pretty(self).map_err(|source| RenderError::Serialize {
            logical_id: "template".to_string(),
            source,
        })
    }
}

/// logical ids can only be alphanumeric. We split on every other character
/// and capitalize each piece, eg: `about-myself-origin-bucket` -> `AboutMyselfOriginBucket`.
pub fn logical_id(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn get_ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Thing {
        name: String,
    }

    impl CfnResource for Thing {
        fn type_string(&self) -> &'static str {
            "Test::Thing"
        }
        fn validate(&self) -> Result<(), String> {
            if self.name.is_empty() {
                return Err("name is required".into());
            }
            Ok(())
        }
    }

    #[test]
    fn logical_ids_are_alphanumeric() {
        assert_eq!(logical_id("about-myself-origin-bucket"), "AboutMyselfOriginBucket");
        assert_eq!(logical_id("my_site.record-a-dev-"), "MySiteRecordADev");
        assert_eq!(logical_id("x"), "X");
        assert_eq!(logical_id("--"), "");
    }

    #[test]
    fn add_rejects_duplicates_and_invalid() {
        let mut t = Template::default();
        t.add("A", &Thing { name: "a".into() }).unwrap();
        let err = t.add("A", &Thing { name: "b".into() }).unwrap_err();
        assert!(matches!(err, RenderError::DuplicateLogicalId(ref id) if id == "A"));
        let err = t.add("B", &Thing { name: "".into() }).unwrap_err();
        assert!(err.to_string().contains("name is required"), "{err}");
        assert_eq!(t.resources.len(), 1);
    }

    #[test]
    fn removal_policy_is_serialized_on_the_resource() {
        let mut t = Template::default();
        t.add_with_policy("A", &Thing { name: "a".into() }, Some(RemovalPolicy::Retain)).unwrap();
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["AWSTemplateFormatVersion"], "2010-09-09");
        assert_eq!(v["Resources"]["A"]["Type"], "Test::Thing");
        assert_eq!(v["Resources"]["A"]["Properties"]["Name"], "a");
        assert_eq!(v["Resources"]["A"]["DeletionPolicy"], "Retain");
        assert_eq!(v["Resources"]["A"]["UpdateReplacePolicy"], "Retain");
        assert!(v.get("Outputs").is_none());
    }

    #[test]
    fn intrinsics() {
        assert_eq!(get_ref("X"), json!({"Ref": "X"}));
        assert_eq!(get_att("X", "Arn"), json!({"Fn::GetAtt": ["X", "Arn"]}));
        assert_eq!(join("", vec![json!("a"), get_ref("B")]), json!({"Fn::Join": ["", ["a", {"Ref": "B"}]]}));
    }
}
