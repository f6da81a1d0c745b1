//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Papyr;

/// Create a new post file with a front-matter scaffold
pub fn create_post(site: &Papyr, title: &str, path: Option<&str>) -> Result<()> {
    let now = chrono::Local::now();
    let target_dir = site.source_dir.join("_posts");

    fs::create_dir_all(&target_dir)?;

    // Generate filename from the configured pattern
    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        let slug = slug::slugify(title);

        site.config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    let file_path = target_dir.join(&filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: {}\n---\n",
        title,
        now.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

/// Run the new command
pub fn run(site: &Papyr, title: &str) -> Result<()> {
    create_post(site, title, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentStore;

    #[test]
    fn test_create_post() {
        let dir = tempfile::tempdir().unwrap();
        let site = Papyr::new(dir.path()).unwrap();

        create_post(&site, "My First Post", None).unwrap();

        let file = site.source_dir.join("_posts/my-first-post.md");
        assert!(file.exists());

        // The scaffold parses back as a valid post
        let store = ContentStore::new(&site);
        let post = store.resolve("my-first-post").unwrap();
        assert_eq!(post.title, "My First Post");
    }

    #[test]
    fn test_create_post_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Papyr::new(dir.path()).unwrap();

        create_post(&site, "Same Title", None).unwrap();
        assert!(create_post(&site, "Same Title", None).is_err());
    }
}
