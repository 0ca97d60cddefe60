/*!
 * HTML rendering of source documents.
 *
 * The loader only needs `HtmlRenderer::render`; the default `MdxRenderer`
 * covers the subset of MDX the docs use for translatable prose: YAML front
 * matter, ATX headings, paragraphs and fenced code. Module lines (`import`,
 * `export`) carry no prose and are dropped.
 */

use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use regex::Regex;

/// YAML front matter block at the very start of a document
static FRONT_MATTER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").unwrap()
});

/// `title:` entry inside front matter
static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^title:\s*['"]?(.*?)['"]?\s*$"#).unwrap()
});

/// ATX heading (`## Heading`)
static HEADING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(#{1,6})\s+(.+?)\s*#*\s*$").unwrap()
});

/// MDX module lines
static MODULE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(import|export)\s").unwrap()
});

/// Turns a source document into the HTML uploaded to the vendor
pub trait HtmlRenderer: Send + Sync {
    fn render(&self, slug: &str, source: &str) -> Result<String>;
}

/// Default renderer for `.mdx` documents
#[derive(Debug, Default, Clone, Copy)]
pub struct MdxRenderer;

impl HtmlRenderer for MdxRenderer {
    fn render(&self, slug: &str, source: &str) -> Result<String> {
        let (title, body) = split_front_matter(slug, source)?;

        let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        if let Some(title) = &title {
            html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        }
        html.push_str("</head>\n<body>\n");
        html.push_str(&render_body(body));
        html.push_str("</body>\n</html>\n");

        Ok(html)
    }
}

fn split_front_matter<'a>(slug: &str, source: &'a str) -> Result<(Option<String>, &'a str)> {
    if let Some(captures) = FRONT_MATTER_REGEX.captures(source) {
        let title = TITLE_REGEX
            .captures(&captures[1])
            .map(|c| c[1].to_string())
            .filter(|t| !t.is_empty());
        let end = captures.get(0).map_or(0, |m| m.end());
        return Ok((title, &source[end..]));
    }

    if source.starts_with("---\n") || source.starts_with("---\r\n") {
        return Err(anyhow!("Unterminated front matter in {}", slug));
    }

    Ok((None, source))
}

fn render_body(body: &str) -> String {
    let mut out = String::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut code: Option<Vec<&str>> = None;

    for line in body.lines() {
        if let Some(block) = code.as_mut() {
            if line.trim_start().starts_with("```") {
                out.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(&block.join("\n"))));
                code = None;
            } else {
                block.push(line);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            flush_paragraph(&mut out, &mut paragraph);
            code = Some(Vec::new());
        } else if trimmed.is_empty() {
            flush_paragraph(&mut out, &mut paragraph);
        } else if MODULE_LINE_REGEX.is_match(trimmed) {
            continue;
        } else if let Some(captures) = HEADING_REGEX.captures(trimmed) {
            flush_paragraph(&mut out, &mut paragraph);
            let level = captures[1].len();
            out.push_str(&format!("<h{0}>{1}</h{0}>\n", level, escape_html(&captures[2])));
        } else {
            paragraph.push(trimmed);
        }
    }

    // unterminated fence: keep the text
    if let Some(block) = code {
        out.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(&block.join("\n"))));
    }
    flush_paragraph(&mut out, &mut paragraph);

    out
}

fn flush_paragraph(out: &mut String, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    out.push_str(&format!("<p>{}</p>\n", escape_html(&paragraph.join(" "))));
    paragraph.clear();
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
