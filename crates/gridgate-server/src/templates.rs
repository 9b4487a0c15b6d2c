//! HTML templates for the portal.
//!
//! Pages are plain server-rendered HTML built with `format!`; no asset
//! pipeline, no client-side framework.

use crate::state::{Flash, FlashKind};

/// Base HTML layout wrapper with the signed-in header.
pub fn layout(project: &str, title: &str, content: &str) -> String {
    let header = format!(
        r#"<header>
        <strong>{project}</strong>
        <form method="POST" action="/logout"><button type="submit">Log out</button></form>
    </header>"#,
        project = escape(project)
    );
    layout_with_header(project, title, content, &header)
}

/// Layout variant without the logout control, for login/register pages.
pub fn layout_anonymous(project: &str, title: &str, content: &str) -> String {
    let header = format!(
        "<header><strong>{}</strong></header>",
        escape(project)
    );
    layout_with_header(project, title, content, &header)
}

fn layout_with_header(project: &str, title: &str, content: &str, header: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - {project}</title>
    <style>
        body {{ font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #1f2430; }}
        header {{ background: #2d3a5e; color: #fff; padding: 0.8rem 1.5rem; display: flex; justify-content: space-between; align-items: center; }}
        header form {{ margin: 0; }}
        main {{ max-width: 60rem; margin: 2rem auto; padding: 0 1.5rem; }}
        .card {{ background: #fff; border-radius: 8px; padding: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }}
        .flash {{ border-radius: 6px; padding: 0.7rem 1rem; margin-bottom: 1rem; }}
        .flash-success {{ background: #e6f6ea; border: 1px solid #9cd6ab; }}
        .flash-warning {{ background: #fdf3dc; border: 1px solid #e8c676; }}
        .flash-info {{ background: #e8f0fd; border: 1px solid #9fc0ee; }}
        .flash-error {{ background: #fbe6e6; border: 1px solid #e09a9a; }}
        label {{ display: block; margin: 0.8rem 0 0.25rem; font-weight: 600; }}
        input {{ width: 100%; box-sizing: border-box; padding: 0.5rem; border: 1px solid #c3c9d4; border-radius: 6px; }}
        button {{ margin-top: 1.2rem; padding: 0.55rem 1.4rem; background: #2d3a5e; color: #fff; border: none; border-radius: 6px; cursor: pointer; }}
        iframe {{ width: 100%; height: 32rem; border: 1px solid #c3c9d4; border-radius: 8px; margin-top: 1rem; }}
        a {{ color: #2d3a5e; }}
    </style>
</head>
<body>
    {header}
    <main>
        {content}
    </main>
</body>
</html>"##,
        title = escape(title),
        project = escape(project),
        header = header,
        content = content,
    )
}

/// Render queued flash messages.
pub fn flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            let class = match f.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Warning => "flash-warning",
                FlashKind::Info => "flash-info",
            };
            format!(
                r#"<div class="flash {class}">{text}</div>"#,
                text = escape(&f.text)
            )
        })
        .collect()
}

/// Render an error banner, if any.
pub fn error_banner(message: Option<&str>) -> String {
    match message {
        Some(text) => format!(
            r#"<div class="flash flash-error">{}</div>"#,
            escape(text)
        ),
        None => String::new(),
    }
}

/// Simple HTML escape.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>"a&b"</script>"#),
            "&lt;script&gt;&quot;a&amp;b&quot;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_flash_rendering() {
        let rendered = flashes(&[Flash {
            kind: FlashKind::Warning,
            text: "sync <failed>".to_string(),
        }]);
        assert!(rendered.contains("flash-warning"));
        assert!(rendered.contains("sync &lt;failed&gt;"));
    }

    #[test]
    fn test_anonymous_layout_has_no_logout() {
        let html = layout_anonymous("Gridgate", "Login", "<p>hi</p>");
        assert!(!html.contains("/logout"));
    }
}
