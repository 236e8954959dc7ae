//! Server-rendered playground page.

use ormpad_engine::TracedQuery;
use ormpad_schema::EntityInfo;

/// Snippet pre-filled into the editor on first load.
pub const DEFAULT_SNIPPET: &str = "\
# Query the bookstore
let total = Book.count()
print(total)
Book.findMany().where(price > 20).orderBy(title.asc).limit(5)
";

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the full playground page.
pub fn render_page(
    code: &str,
    result: &str,
    queries: &[TracedQuery],
    execution_time: Option<f64>,
    schema: &[EntityInfo],
) -> String {
    let sidebar = render_sidebar(schema);
    let results = render_results(result, queries, execution_time);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>ormpad playground</title>
<style>
  body {{ font-family: -apple-system, "Segoe UI", sans-serif; margin: 0; display: flex; }}
  aside {{ width: 260px; padding: 1rem; background: #f6f8fa; border-right: 1px solid #d0d7de; min-height: 100vh; }}
  main {{ flex: 1; padding: 1rem 2rem; }}
  textarea {{ width: 100%; height: 14rem; font-family: ui-monospace, monospace; font-size: 0.9rem; }}
  pre {{ background: #f6f8fa; padding: 0.75rem; overflow-x: auto; }}
  .entity {{ margin-bottom: 1rem; }}
  .entity h3 {{ margin: 0 0 0.25rem; font-size: 0.95rem; }}
  .entity li {{ font-size: 0.8rem; list-style: none; }}
  .entity ul {{ margin: 0; padding-left: 0.5rem; }}
  .query {{ margin-bottom: 0.5rem; }}
  .time {{ color: #57606a; font-size: 0.8rem; }}
</style>
</head>
<body>
<aside>
<h2>Schema</h2>
{sidebar}
</aside>
<main>
<h1>ormpad playground</h1>
<form method="post" action="/">
<textarea name="code">{code}</textarea>
<p><button type="submit">Run</button></p>
</form>
{results}
</main>
</body>
</html>
"#,
        code = escape_html(code),
    )
}

fn render_sidebar(schema: &[EntityInfo]) -> String {
    let mut html = String::new();
    for entity in schema {
        html.push_str(&format!(
            "<div class=\"entity\"><h3>{}</h3><ul>\n",
            escape_html(&entity.name)
        ));
        for field in &entity.fields {
            let mut label = format!("{}: {}", field.name, field.data_type);
            if let Some(model) = &field.related_model {
                label.push_str(&format!(" &rarr; {}", model));
            }
            html.push_str(&format!("<li>{}</li>\n", label));
        }
        html.push_str("</ul></div>\n");
    }
    html
}

fn render_results(result: &str, queries: &[TracedQuery], execution_time: Option<f64>) -> String {
    if result.is_empty() && queries.is_empty() && execution_time.is_none() {
        return String::new();
    }

    let mut html = String::from("<h2>Result</h2>\n");
    html.push_str(&format!("<pre>{}</pre>\n", escape_html(result)));

    if let Some(seconds) = execution_time {
        html.push_str(&format!(
            "<p class=\"time\">executed in {}s</p>\n",
            seconds
        ));
    }

    if !queries.is_empty() {
        html.push_str(&format!("<h2>Queries ({})</h2>\n", queries.len()));
        for query in queries {
            html.push_str(&format!(
                "<div class=\"query\"><pre>{}</pre><span class=\"time\">{}s</span></div>\n",
                escape_html(&query.sql),
                escape_html(&query.time)
            ));
        }
    }

    html
}
