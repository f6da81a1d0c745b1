//! Generator module - writes static HTML files using the built-in templates

use anyhow::Result;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::Post;
use crate::helpers::date::iso_date;
use crate::templates::{PostData, SiteData, SummaryData, TemplateRenderer};
use crate::Papyr;

/// Static site generator
pub struct Generator {
    site: Papyr,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Papyr) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        Ok(Self {
            site: site.clone(),
            renderer,
        })
    }

    /// Generate the entire site.
    ///
    /// Output depends only on the content store and configuration: an
    /// unchanged store generates byte-identical pages on every run.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        // Copy non-markdown source assets (images, css)
        self.copy_source_assets()?;

        let site_data = self.build_site_data();

        self.generate_index(posts, &site_data)?;
        self.generate_post_pages(posts, &site_data)?;
        self.generate_not_found(&site_data)?;

        Ok(())
    }

    /// Build site data for templates
    fn build_site_data(&self) -> SiteData {
        SiteData {
            title: self.site.config.title.clone(),
            description: self.site.config.description.clone(),
            author: self.site.config.author.clone(),
            language: self.site.config.language.clone(),
            root: self.site.config.root.clone(),
        }
    }

    /// Generate the index page listing all posts
    fn generate_index(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        let summaries: Vec<SummaryData> = posts
            .iter()
            .map(|p| SummaryData {
                id: p.id.clone(),
                title: p.title.clone(),
                date: iso_date(&p.date),
                path: p.path.clone(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("posts", &summaries);

        let html = self.renderer.render("index.html", &context)?;
        fs::write(self.site.public_dir.join("index.html"), html)?;

        Ok(())
    }

    /// Generate one page per post under posts/<id>/index.html
    fn generate_post_pages(&self, posts: &[Post], site_data: &SiteData) -> Result<()> {
        for post in posts {
            let post_data = PostData {
                id: post.id.clone(),
                title: post.title.clone(),
                date: iso_date(&post.date),
                path: post.path.clone(),
                content: post.body.as_str().to_string(),
            };

            let mut context = Context::new();
            context.insert("site", site_data);
            context.insert("post", &post_data);
            context.insert("render_mode", self.site.config.render_mode.as_str());

            let html = self.renderer.render("post.html", &context)?;

            let out_dir = self.site.public_dir.join("posts").join(&post.id);
            fs::create_dir_all(&out_dir)?;
            fs::write(out_dir.join("index.html"), html)?;

            tracing::debug!("Generated {}", post.path);
        }

        Ok(())
    }

    /// Generate the 404 page served for anything outside the route set
    fn generate_not_found(&self, site_data: &SiteData) -> Result<()> {
        let mut context = Context::new();
        context.insert("site", site_data);

        let html = self.renderer.render("404.html", &context)?;
        fs::write(self.site.public_dir.join("404.html"), html)?;

        Ok(())
    }

    /// Copy static assets from the source directory into public/
    fn copy_source_assets(&self) -> Result<()> {
        if !self.site.source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(&self.site.source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || is_markdown(path) {
                continue;
            }

            let relative = path.strip_prefix(&self.site.source_dir).unwrap_or(path);

            // Underscore directories (like _posts) are not published as-is
            let first_component = relative
                .components()
                .next()
                .and_then(|c| c.as_os_str().to_str());
            if let Some(first) = first_component {
                if first.starts_with('_') {
                    continue;
                }
            }

            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

/// Check if a file is a markdown file
fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn build_site(config: &str, posts: &[(&str, &str)]) -> (tempfile::TempDir, Papyr) {
        let dir = tempfile::tempdir().unwrap();
        if !config.is_empty() {
            fs::write(dir.path().join("_config.yml"), config).unwrap();
        }
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        for (name, content) in posts {
            fs::write(posts_dir.join(name), content).unwrap();
        }
        let site = Papyr::new(dir.path()).unwrap();
        (dir, site)
    }

    fn generate(site: &Papyr) {
        let store = ContentStore::new(site);
        let posts = store.load_posts().unwrap();
        Generator::new(site).unwrap().generate(&posts).unwrap();
    }

    fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
        WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(dir).unwrap().to_path_buf();
                (rel, fs::read(e.path()).unwrap())
            })
            .collect()
    }

    const HELLO: &str = "---\ntitle: Hello World\ndate: 2020-01-01\n---\n# Hello\n";
    const SECOND: &str = "---\ntitle: Second Post\ndate: 2021-06-15\n---\nMore text.\n";

    #[test]
    fn test_generate_site() {
        let (_dir, site) = build_site("", &[("hello.md", HELLO), ("second.md", SECOND)]);
        generate(&site);

        let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Hello World"));
        assert!(index.contains("Second Post"));
        assert!(index.contains("posts/hello/"));

        let page = fs::read_to_string(site.public_dir.join("posts/hello/index.html")).unwrap();
        assert!(page.contains("<h1>Hello</h1>"));
        assert!(page.contains("January 1, 2020"));

        assert!(site.public_dir.join("404.html").exists());
    }

    #[test]
    fn test_only_enumerated_pages_generated() {
        let (_dir, site) = build_site("", &[("hello.md", HELLO)]);
        generate(&site);

        let posts_out = site.public_dir.join("posts");
        let entries: Vec<_> = fs::read_dir(posts_out)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["hello"]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let (_dir, site) = build_site("", &[("hello.md", HELLO), ("second.md", SECOND)]);

        generate(&site);
        let first = snapshot(&site.public_dir);

        generate(&site);
        let second = snapshot(&site.public_dir);

        assert_eq!(first, second);
    }

    #[test]
    fn test_markdown_mode_embeds_raw_source() {
        let (_dir, site) = build_site("render_mode: markdown\n", &[("hello.md", HELLO)]);
        generate(&site);

        let page = fs::read_to_string(site.public_dir.join("posts/hello/index.html")).unwrap();
        assert!(page.contains("markdown-source"));
        // Raw markdown is embedded escaped, not converted
        assert!(page.contains("# Hello"));
        assert!(!page.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_source_assets_copied() {
        let (dir, site) = build_site("", &[("hello.md", HELLO)]);
        fs::write(dir.path().join("source/style.css"), "body {}\n").unwrap();
        generate(&site);

        assert!(site.public_dir.join("style.css").exists());
        // Markdown sources are not published verbatim
        assert!(!site.public_dir.join("_posts/hello.md").exists());
    }
}
