//! Content store - reads posts from the source directory

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{FrontMatter, FrontMatterError, MarkdownRenderer, Post, PostBody};
use crate::config::RenderMode;
use crate::Papyr;

/// Errors from the content pipeline.
///
/// Any of these aborts generation; there are no partial builds.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store {path:?} is not readable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid post {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("duplicate post identifier `{0}`")]
    DuplicateId(String),

    #[error("no post with identifier `{0}`")]
    UnknownId(String),

    #[error("failed to render {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

/// Reads posts from `source/_posts` and resolves them into [`Post`] records
pub struct ContentStore {
    posts_dir: PathBuf,
    source_dir: PathBuf,
    render_mode: RenderMode,
    renderer: MarkdownRenderer,
}

impl ContentStore {
    /// Create a content store for a site
    pub fn new(site: &Papyr) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        );
        Self {
            posts_dir: site.source_dir.join("_posts"),
            source_dir: site.source_dir.clone(),
            render_mode: site.config.render_mode,
            renderer,
        }
    }

    /// All valid post identifiers, sorted lexicographically.
    ///
    /// This is the closed route set: an identifier outside it never resolves.
    pub fn post_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries()?.into_iter().map(|(id, _)| id).collect())
    }

    /// Load every post, sorted by date descending then identifier
    pub fn load_posts(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts = Vec::new();
        for (id, path) in self.entries()? {
            posts.push(self.load_file(&path, id)?);
        }

        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(posts)
    }

    /// Resolve a single identifier into a post.
    ///
    /// Identifiers outside the enumerated set are an error, never a fallback.
    pub fn resolve(&self, id: &str) -> Result<Post, StoreError> {
        let entry = self
            .entries()?
            .into_iter()
            .find(|(candidate, _)| candidate == id);

        match entry {
            Some((id, path)) => self.load_file(&path, id),
            None => Err(StoreError::UnknownId(id.to_string())),
        }
    }

    /// Enumerate (identifier, path) pairs for every markdown file in the store
    fn entries(&self) -> Result<Vec<(String, PathBuf)>, StoreError> {
        if !self.posts_dir.is_dir() {
            return Err(StoreError::Unreadable {
                path: self.posts_dir.clone(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such directory",
                ),
            });
        }

        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.posts_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.posts_dir).to_path_buf();
                StoreError::Unreadable {
                    path,
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("walk error")),
                }
            })?;

            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                let id = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or_default()
                    .to_string();
                entries.push((id, path.to_path_buf()));
            }
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut seen = HashSet::new();
        for (id, _) in &entries {
            if !seen.insert(id.clone()) {
                return Err(StoreError::DuplicateId(id.clone()));
            }
        }

        Ok(entries)
    }

    /// Load and compose one post from a file
    fn load_file(&self, path: &Path, id: String) -> Result<Post, StoreError> {
        let content = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let wrap = |source: FrontMatterError| StoreError::FrontMatter {
            path: path.to_path_buf(),
            source,
        };

        let (fm, raw_body) = FrontMatter::parse(&content).map_err(wrap)?;
        let title = fm.require_title().map_err(wrap)?.to_string();
        let date = fm.require_date().map_err(wrap)?;

        let body = match self.render_mode {
            RenderMode::Html => {
                let html = self
                    .renderer
                    .render(raw_body)
                    .map_err(|e| StoreError::Render {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                PostBody::Html(html)
            }
            // Client-side rendering: pass the body through byte-for-byte
            RenderMode::Markdown => PostBody::Markdown(raw_body.to_string()),
        };

        let source = path
            .strip_prefix(&self.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        Ok(Post {
            path: format!("posts/{}/", id),
            id,
            title,
            date,
            body,
            source,
            full_source: path.to_path_buf(),
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
