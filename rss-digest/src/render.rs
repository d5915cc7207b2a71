use crate::config::DigestConfig;
use crate::digest::Digest;
use crate::types::Article;
use html_escape::{encode_double_quoted_attribute, encode_text};

const FONT_STACK: &str =
    "-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Helvetica,Arial,sans-serif";
const THUMB_STYLE: &str =
    "width:100%;max-height:200px;object-fit:cover;border-radius:6px;margin-bottom:8px;";

/// Subject line marker the inbox scan looks for.
pub const SUBSCRIBE_SUBJECT: &str = "ADD RECIPIENT";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub keyword: String,
    pub subscribe_address: String,
    pub header_image: Option<String>,
    pub generator: String,
}

impl RenderOptions {
    pub fn from_config(config: &DigestConfig) -> Self {
        Self {
            title: config.title.clone(),
            keyword: config.keyword.clone(),
            subscribe_address: config.mail.from.clone(),
            header_image: config.header_image.clone(),
            generator: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn empty_message(&self) -> String {
        format!("No {} articles today.", self.keyword)
    }

    pub fn plain_text_fallback(&self) -> String {
        format!("Switch to HTML view to see today's {} headlines.", self.keyword)
    }

    /// `mailto:` link that opens a pre-filled subscribe request.
    pub fn subscribe_link(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.subscribe_address,
            urlencoding::encode(SUBSCRIBE_SUBJECT),
            urlencoding::encode(&format!("Please add me to {}", self.title)),
        )
    }
}

/// Only http(s) links make it into the document.
fn safe_url(url: &str) -> Option<&str> {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Some(url.trim())
    } else {
        None
    }
}

fn render_article(article: &Article) -> String {
    let image = article
        .image
        .as_deref()
        .and_then(safe_url)
        .map(|src| {
            format!(
                r#"<img src="{}" alt="" style="{}">"#,
                encode_double_quoted_attribute(src),
                THUMB_STYLE
            )
        })
        .unwrap_or_default();

    format!(
        r#"
        <tr><td style="padding:0 0 24px 0;">{image}
          <a href="{href}" target="_blank" rel="noopener noreferrer" style="font:700 17px/1.4 {font};
             color:#0366d6;text-decoration:none;">{title}</a><br>
          <span style="font-size:13px;color:#555;">{snippet}</span><br>
          <span style="font-size:11px;color:#888;">{source} • {published}</span>
        </td></tr>"#,
        image = image,
        href = encode_double_quoted_attribute(safe_url(&article.link).unwrap_or("#")),
        font = FONT_STACK,
        title = encode_text(&article.title),
        snippet = encode_text(&article.snippet),
        source = encode_text(&article.source),
        published = article.published.format("%Y-%m-%d %H:%M"),
    )
}

fn render_placeholder(options: &RenderOptions) -> String {
    format!(
        r#"
        <tr><td style="padding:0 0 24px 0;">
          <span style="font:700 17px/1.4 {font};color:#0366d6;">{message}</span>
        </td></tr>"#,
        font = FONT_STACK,
        message = encode_text(&options.empty_message()),
    )
}

fn render_header(digest: &Digest, options: &RenderOptions) -> String {
    let image = options
        .header_image
        .as_deref()
        .map(|src| {
            format!(
                r#"
    <img src="{}"
         alt="{}"
         style="width:100%;max-height:220px;object-fit:cover;display:block;">"#,
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(&options.title),
            )
        })
        .unwrap_or_default();

    // Without a picture behind it the title is drawn dark, in normal flow.
    let (overlay, color) = if options.header_image.is_some() {
        ("position:relative;top:-160px;", "#fff")
    } else {
        ("padding:24px 0 0 0;", "#111")
    };

    format!(
        r#"<tr>
  <td style="padding:0;">{image}
    <div style="{overlay}text-align:center;color:{color};">
      <h1 style="margin:0;font-size:32px;font-weight:800;
                 text-shadow:0 2px 4px rgba(0,0,0,.6);">
        {title}
      </h1>
      <p style="margin:0;font-size:14px;
                text-shadow:0 2px 4px rgba(0,0,0,.6);">
        {date}
      </p>
    </div>
  </td>
</tr>"#,
        image = image,
        overlay = overlay,
        color = color,
        title = encode_text(&options.title).replace(' ', "&nbsp;"),
        date = digest.date.format("%Y-%m-%d"),
    )
}

/// A complete, self-contained HTML document. Styles are inline so mail
/// clients that drop `<style>` blocks still render it.
pub fn render_html(digest: &Digest, options: &RenderOptions) -> String {
    let body = if digest.is_empty() {
        render_placeholder(options)
    } else {
        digest
            .articles
            .iter()
            .map(render_article)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<!doctype html><html><head><meta charset=utf-8>
<meta name=viewport content="width=device-width,initial-scale=1">
<meta name=color-scheme content="light dark"><title>{title} {date}</title></head>
<body style="margin:0;padding:0;background:#fff;font-family:{font}">
<center><table role=presentation width=100% style="max-width:640px;margin:0 auto">
{header}
<tr><td style="padding:24px"><table role=presentation width=100%>{body}</table>
  <div style="text-align:center;padding:18px 0">
    <a href="{mailto}" style="background:#0366d6;color:#fff;font-weight:600;text-decoration:none;
       padding:10px 18px;border-radius:6px;display:inline-block">Add&nbsp;New&nbsp;Recipient</a>
  </div>
  <div style="text-align:center;font-size:11px;color:#97a0a6">
    Generated automatically by {generator}</div>
</td></tr></table></center></body></html>"#,
        title = encode_text(&options.title),
        date = digest.date.format("%Y-%m-%d"),
        font = FONT_STACK,
        header = render_header(digest, options),
        body = body,
        mailto = encode_double_quoted_attribute(&options.subscribe_link()),
        generator = encode_text(&options.generator),
    )
}
