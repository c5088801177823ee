//! HTML page relaying the session to the window that opened the login popup

use serde::Serialize;

use super::google::UserProfile;

#[derive(Debug, Serialize)]
struct BridgePayload<'a> {
    token: &'a str,
    name: &'a str,
    email: &'a str,
    picture: &'a str,
}

/// JSON literal safe to embed inside a `<script>` element
fn script_safe_json(payload: &BridgePayload<'_>) -> String {
    let json = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Page that posts `{token, name, email, picture}` to `window.opener` and closes
pub fn render_bridge_page(token: &str, profile: &UserProfile) -> String {
    let payload = BridgePayload {
        token,
        name: profile.name.as_deref().unwrap_or(""),
        email: profile.email.as_deref().unwrap_or(""),
        picture: profile.picture.as_deref().unwrap_or(""),
    };

    format!(
        r#"<!doctype html>
<html>
  <head><meta charset="utf-8"/></head>
  <body>
    <script>
      try {{
        const payload = {payload};
        if (window.opener && !window.opener.closed) {{
          window.opener.postMessage(payload, "*");
        }}
      }} catch (e) {{
        console.error("postMessage failed", e);
      }} finally {{
        window.close();
      }}
    </script>
    <p>Signing you in...</p>
  </body>
</html>
"#,
        payload = script_safe_json(&payload)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_embeds_payload() {
        let profile = UserProfile {
            email: Some("ada@example.com".to_string()),
            name: Some("Ada \"The\" Countess".to_string()),
            picture: None,
        };
        let page = render_bridge_page("tok.en.sig", &profile);
        assert!(page.contains(r#""token":"tok.en.sig""#));
        assert!(page.contains(r#""name":"Ada \"The\" Countess""#));
        assert!(page.contains(r#""picture":"""#));
        assert!(page.contains("window.opener.postMessage(payload, \"*\")"));
        assert!(page.contains("window.close()"));
    }

    #[test]
    fn test_script_breakout_is_escaped() {
        let profile = UserProfile {
            name: Some("</script><script>alert(1)</script>".to_string()),
            ..UserProfile::default()
        };
        let page = render_bridge_page("t", &profile);
        assert_eq!(page.matches("</script>").count(), 1);
        assert!(page.contains("\\u003c/script\\u003e"));
    }
}
