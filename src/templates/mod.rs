//! Built-in page templates using the Tera template engine
//!
//! All templates are embedded directly in the binary; a site needs no theme
//! directory on disk.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::date::full_date;

/// Template renderer with the embedded templates loaded
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping stays off: post bodies are HTML fragments. The raw
        // markdown embed escapes explicitly with the `escape` filter.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("plain/layout.html")),
            ("index.html", include_str!("plain/index.html")),
            ("post.html", include_str!("plain/post.html")),
            ("404.html", include_str!("plain/404.html")),
        ])?;

        tera.register_filter("display_date", display_date_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: format an ISO date for display ("2020-01-01" -> "January 1, 2020")
fn display_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("display_date", "value", String, value);
    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(full_date(&date))),
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub id: String,
    pub title: String,
    pub date: String,
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryData {
    pub id: String,
    pub title: String,
    pub date: String,
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        TemplateRenderer::new().unwrap();
    }

    #[test]
    fn test_render_404() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: "Blog".to_string(),
                description: String::new(),
                author: String::new(),
                language: "en".to_string(),
                root: "/".to_string(),
            },
        );
        let html = renderer.render("404.html", &context).unwrap();
        assert!(html.contains("404"));
    }
}
