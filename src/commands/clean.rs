//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Papyr;

/// Clean the public directory
pub fn run(site: &Papyr) -> Result<()> {
    if site.public_dir.exists() {
        fs::remove_dir_all(&site.public_dir)?;
        tracing::info!("Deleted: {:?}", site.public_dir);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let site = Papyr::new(dir.path()).unwrap();
        fs::create_dir_all(&site.public_dir).unwrap();
        fs::write(site.public_dir.join("index.html"), "<html></html>").unwrap();

        run(&site).unwrap();
        assert!(!site.public_dir.exists());

        // Cleaning an already-clean site is not an error
        run(&site).unwrap();
    }
}
