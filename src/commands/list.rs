//! List site content

use anyhow::Result;

use crate::content::ContentStore;
use crate::helpers::date::iso_date;
use crate::Papyr;

/// List site content by type
pub fn run(site: &Papyr, content_type: &str) -> Result<()> {
    let store = ContentStore::new(site);

    match content_type {
        "post" | "posts" => {
            let posts = store.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let summary = post.summary();
                println!(
                    "  {} - {} [{}]",
                    iso_date(&summary.date),
                    summary.title,
                    post.source
                );
            }
        }
        "route" | "routes" => {
            let ids = store.post_ids()?;
            println!("Routes ({}):", ids.len());
            for id in ids {
                println!("  /posts/{}/", id);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, route", content_type);
        }
    }

    Ok(())
}
