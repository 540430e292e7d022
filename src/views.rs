//! Inline HTML pages served by the handlers.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde_json::{Map, Value};

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{}</title>
</head>
<body>
{}
</body>
</html>
"#,
        encode_text(title),
        body
    )
}

/// Entry page with the grant link to the provider.
pub fn index_page(authorization_url: &str) -> String {
    layout(
        "Login with Webex",
        &format!(
            r#"    <h1>Login with Webex</h1>
    <p>Grant this application access to your Webex identity.</p>
    <p><a id="grant" href="{}">Grant</a></p>"#,
            encode_double_quoted_attribute(authorization_url)
        ),
    )
}

fn table(map: &Map<String, Value>) -> String {
    let mut rows = String::new();
    for (key, value) in map {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        rows.push_str(&format!(
            "        <tr><th>{}</th><td>{}</td></tr>\n",
            encode_text(key),
            encode_text(&value)
        ));
    }
    format!("    <table>\n{}    </table>", rows)
}

pub fn result_page(claims: &Map<String, Value>, profile: &Map<String, Value>) -> String {
    layout(
        "Authenticated",
        &format!(
            "    <h1>Authenticated</h1>\n    <h2>Identity claims</h2>\n{}\n    <h2>User profile</h2>\n{}\n    <p><a href=\"/logout\">Log out</a></p>",
            table(claims),
            table(profile)
        ),
    )
}

pub fn error_page(message: &str) -> String {
    layout(
        "Error",
        &format!(
            "    <h1>Error</h1>\n    <p>{}</p>\n    <p><a href=\"/\">Back to Login</a></p>",
            encode_text(message)
        ),
    )
}
