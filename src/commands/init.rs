//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Papyr;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("source/_posts"))?;

    // Create default _config.yml
    let config_content = r#"# Papyr Configuration

# Site
title: Papyr
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /

# Directory
source_dir: source
public_dir: public

# Writing
new_post_name: :title.md

# Rendering
# html: convert markdown to HTML at generation time
# markdown: ship raw markdown and render it in the browser
render_mode: html
highlight:
  theme: base16-ocean.dark
  line_number: false
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Create sample posts
    let first_post = r#"---
title: Hello World
date: 2020-01-01
---

Welcome to your new blog. This post lives in `source/_posts/hello-world.md`;
edit it or add more markdown files next to it, then run:

```bash
$ papyr generate
```

to build the site into `public/`, or

```bash
$ papyr server
```

to preview it locally.
"#;

    let second_post = r#"---
title: Writing Posts
date: 2020-01-02
---

Every post starts with a front-matter block holding its **title** and
**date**. The rest of the file is ordinary markdown:

- lists
- [links](https://example.com)
- `inline code`

The filename (minus extension) becomes the post's URL: this file is
`writing-posts.md`, so it is served at `/posts/writing-posts/`.
"#;

    fs::write(
        target_dir.join("source/_posts/hello-world.md"),
        first_post,
    )?;
    fs::write(
        target_dir.join("source/_posts/writing-posts.md"),
        second_post,
    )?;

    Ok(())
}

/// Run the init command with an existing instance
pub fn run(site: &Papyr) -> Result<()> {
    init_site(&site.base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        init_site(dir.path()).unwrap();

        assert!(dir.path().join("_config.yml").exists());
        assert!(dir.path().join("source/_posts/hello-world.md").exists());

        // The scaffolded site loads and generates cleanly
        let site = Papyr::new(dir.path()).unwrap();
        site.generate().unwrap();
        assert!(site.public_dir.join("posts/hello-world/index.html").exists());
    }
}
