use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

mod event;
pub use event::*;

/// the document every navigation request is served from.
pub const INDEX_DOCUMENT: &str = "/index.html";

/// a request path is considered to point at a concrete file if its last
/// segment looks like `name.ext`. Only ascii word characters count, so
/// `/blog/my-post` is a navigation route while `/app.js` and `/archive.tar.gz`
/// are files.
///
/// this same pattern is embedded in the edge function source, see [`function_code`].
/// The wildcard is spelled out as the javascript `.`: anything but a line
/// terminator. The rust `.` also matches `\r`, U+2028 and U+2029.
pub const FILE_PATTERN: &str = r"^/[^\n\r\u2028\u2029]*[A-Za-z0-9_]+\.[A-Za-z0-9_]+$";

static FILE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FILE_PATTERN).expect("FILE_PATTERN must compile"));

/// returns true if the uri refers to a file rather than an application route.
pub fn is_file_like(uri: &str) -> bool {
    FILE_REGEX.is_match(uri)
}

/// the routing decision on a bare path. File-like paths are borrowed back
/// unchanged, everything else becomes [`INDEX_DOCUMENT`].
pub fn rewrite_uri(uri: &str) -> Cow<'_, str> {
    if is_file_like(uri) {
        Cow::Borrowed(uri)
    } else {
        Cow::Borrowed(INDEX_DOCUMENT)
    }
}

/// the viewer request handler. Consumes the event the CDN hands us and returns
/// the request that should be forwarded to origin selection.
pub fn handle(event: ViewerRequestEvent) -> Request {
    let mut request = event.request;
    request.route();
    request
}

/// the source of the function registered on the `viewer-request` event of each
/// distribution. The edge runtime only understands an ES5.1 subset: no `let`,
/// no template literals, no module system. The pattern and the fallback document
/// come from the same constants the rust side uses.
pub fn function_code() -> String {
    // a json string literal is also a valid ES5 string literal
    let pattern = serde_json::Value::String(FILE_PATTERN.to_string()).to_string();
    let index = serde_json::Value::String(INDEX_DOCUMENT.to_string()).to_string();
    format!(
r#"// viewer request function. runs on the cloudfront-js-1.0 runtime (ES5.1).
var FILE_REGEX = new RegExp({pattern});

function handler(event) {{
    var request = event.request;

    // navigation request
    if (!FILE_REGEX.test(request.uri)) {{
        request.uri = {index};
    }}

    return request;
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routed(uri: &str) -> String {
        rewrite_uri(uri).into_owned()
    }

    #[test]
    fn navigation_routes_go_to_index() {
        assert_eq!(routed("/"), "/index.html");
        assert_eq!(routed("/about"), "/index.html");
        assert_eq!(routed("/blog/my-post"), "/index.html");
        assert_eq!(routed("/docs/"), "/index.html");
        assert_eq!(routed(""), "/index.html");
    }

    #[test]
    fn files_are_left_alone() {
        assert_eq!(routed("/app.js"), "/app.js");
        assert_eq!(routed("/assets/img/logo.png"), "/assets/img/logo.png");
        assert_eq!(routed("/archive.tar.gz"), "/archive.tar.gz");
        assert_eq!(routed("/Upper_Case.HTML"), "/Upper_Case.HTML");
        assert_eq!(routed("/v2/my-file.txt"), "/v2/my-file.txt");
    }

    #[test]
    fn extension_must_be_on_the_last_segment() {
        assert_eq!(routed("/v1.2/"), "/index.html");
        assert_eq!(routed("/v1.2/changelog"), "/index.html");
        assert_eq!(routed("/file."), "/index.html");
        assert_eq!(routed("/.env"), "/index.html");
        assert_eq!(routed("/name.tar-gz"), "/index.html");
    }

    #[test]
    fn word_characters_are_ascii_only() {
        assert_eq!(routed("/café.html"), "/index.html");
        assert_eq!(routed("/page.ñ"), "/index.html");
    }

    #[test]
    fn line_terminators_never_match() {
        for uri in ["/a\rb.js", "/a\nb.js", "/a\u{2028}b.js", "/a\u{2029}b.js", "/a.js\n"] {
            assert_eq!(routed(uri), "/index.html", "{uri:?}");
        }
    }

    #[test]
    fn path_must_start_with_slash() {
        assert!(!is_file_like("app.js"));
        assert!(is_file_like("/app.js"));
    }

    #[test]
    fn index_document_is_a_fixed_point() {
        assert!(is_file_like(INDEX_DOCUMENT));
        for uri in ["/", "/about", "/blog/my-post", "/app.js"] {
            let once = routed(uri);
            assert_eq!(routed(&once), once);
        }
    }

    #[test]
    fn handle_mutates_only_the_uri() {
        let event: ViewerRequestEvent = serde_json::from_value(serde_json::json!({
            "version": "1.0",
            "context": { "eventType": "viewer-request", "distributionId": "EDFDVBD6EXAMPLE" },
            "viewer": { "ip": "198.51.100.11" },
            "request": {
                "method": "GET",
                "uri": "/blog/my-post",
                "querystring": { "page": { "value": "2" } },
                "headers": { "host": { "value": "example.com" } },
                "cookies": {}
            }
        })).unwrap();
        let request = handle(event);
        assert_eq!(request.uri, "/index.html");
        assert_eq!(request.method, "GET");
        assert_eq!(request.querystring["page"]["value"], "2");
        assert_eq!(request.headers["host"]["value"], "example.com");
    }

    #[test]
    fn function_code_embeds_pattern_and_fallback() {
        let code = function_code();
        assert!(
            code.contains(r#"new RegExp("^/[^\\n\\r\\u2028\\u2029]*[A-Za-z0-9_]+\\.[A-Za-z0-9_]+$")"#),
            "{code}"
        );
        assert!(code.contains(r#"request.uri = "/index.html";"#));
        assert!(code.contains("function handler(event)"));
        // not available on the edge runtime
        assert!(!code.contains('`'));
        assert!(!code.contains("let "));
        assert!(!code.contains("const "));
    }
}
