use std::fmt::Write;

use crate::config::SiteConfig;

pub const TEMPLATE_FILE: &str = "template.json";
pub const FUNCTION_FILE: &str = "viewer-request.js";
pub const DEPLOY_FILE: &str = "deploy.sh";

/// the script that hands the rendered template to the aws cli. It runs from
/// the output directory, refuses to run against any account but the configured
/// one, then lets `cloudformation deploy` create or update the stack.
pub fn deploy_script(config: &SiteConfig) -> String {
    let region = &config.region;
    let account = &config.account_id;
    let stack_name = config.stack_name();
    let mut out = String::new();
    out.push_str("#!/usr/bin/env bash\n");
    out.push_str("set -euo pipefail\n\n");
    out.push_str("# generated by sitehost render. edit the site config instead of this file.\n");
    out.push_str("cd \"$(dirname \"$0\")\"\n\n");

    out.push_str("# check:\n");
    out.push_str("ACCOUNT=$(aws sts get-caller-identity --query Account --output text)\n");
    let _ = writeln!(out, "if [ \"$ACCOUNT\" != \"{account}\" ]; then");
    let _ = writeln!(
        out,
        "    echo \"refusing to deploy {stack_name}: credentials are for account $ACCOUNT, expected {account}\" >&2"
    );
    out.push_str("    exit 1\nfi\n\n");

    out.push_str("# deploy:\n");
    let _ = write!(
        out,
        "AWS_REGION={region} aws --region {region} cloudformation deploy --stack-name {stack_name} --template-file ./{TEMPLATE_FILE} --no-fail-on-empty-changeset"
    );
    let tags = config.tags();
    if !tags.is_empty() {
        out.push_str(" --tags");
        for (key, value) in &tags {
            let _ = write!(out, " {}", shell_quote(&format!("{key}={value}")));
        }
    }
    out.push('\n');
    out
}

/// single quote `s` for a posix shell.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::example;

    #[test]
    fn script_deploys_the_stack() {
        let script = deploy_script(&example());
        assert!(script.starts_with("#!/usr/bin/env bash\n"));
        assert!(script.contains(
            "AWS_REGION=us-east-1 aws --region us-east-1 cloudformation deploy --stack-name about-myself-hosting --template-file ./template.json --no-fail-on-empty-changeset --tags 'project=about-myself'\n"
        ), "{script}");
    }

    #[test]
    fn script_guards_the_account() {
        let script = deploy_script(&example());
        assert!(script.contains("if [ \"$ACCOUNT\" != \"643577437663\" ]; then"));
        assert!(script.contains("exit 1"));
    }

    #[test]
    fn tags_are_quoted() {
        let mut config = example();
        config.tags.insert("owner".into(), "it's me".into());
        let script = deploy_script(&config);
        assert!(script.contains(r"--tags 'owner=it'\''s me' 'project=about-myself'"), "{script}");
    }
}
