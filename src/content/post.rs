//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The rendered body of a post.
///
/// Exactly one representation exists per post, chosen by the site's
/// `render_mode`: pre-rendered HTML, or the raw markdown left for the
/// browser to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostBody {
    /// HTML fragment produced at generation time
    Html(String),
    /// Untouched markdown source, rendered client-side
    Markdown(String),
}

impl PostBody {
    /// The inner string, whichever representation this is
    pub fn as_str(&self) -> &str {
        match self {
            PostBody::Html(s) => s,
            PostBody::Markdown(s) => s,
        }
    }
}

/// A blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Identifier derived from the filename, extension stripped
    pub id: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Post body in the configured representation
    pub body: PostBody,

    /// Source file path (relative to the source directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// URL path (without root)
    pub path: String,
}

impl Post {
    /// Summary record for listings
    pub fn summary(&self) -> PostSummary {
        PostSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date,
            path: self.path.clone(),
        }
    }
}

/// Listing entry for a post: identifier, title, and date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub path: String,
}
