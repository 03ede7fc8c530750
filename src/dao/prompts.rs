use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

/// File extensions (lowercase) listed as image prompts.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Collection of prompts the deck is built from. Order does not matter, the deck shuffles.
pub trait PromptSource: Send + Sync {
    /// List every prompt currently available.
    fn list(&self) -> io::Result<Vec<String>>;
}

/// Image prompts read from a directory and exposed under a URL prefix.
#[derive(Debug, Clone)]
pub struct ImageDirectorySource {
    dir: PathBuf,
    url_prefix: String,
}

impl ImageDirectorySource {
    /// Serve the images of `dir` as `<url_prefix>/<file name>`.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }
}

impl PromptSource for ImageDirectorySource {
    fn list(&self) -> io::Result<Vec<String>> {
        let mut prompts = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if !is_listed_image(&path) {
                debug!(path = %path.display(), "skipping non-image file");
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                prompts.push(format!("{}/{}", self.url_prefix, name));
            }
        }
        prompts.sort();
        Ok(prompts)
    }
}

fn is_listed_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Fixed list of prompts.
#[derive(Debug, Clone, Default)]
pub struct StaticPrompts(pub Vec<String>);

impl PromptSource for StaticPrompts {
    fn list(&self) -> io::Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn lists_only_supported_images() {
        let dir = std::env::temp_dir().join(format!("charades-images-{}", Uuid::new_v4()));
        fs::create_dir_all(dir.join("nested")).unwrap();
        for name in ["cat.JPG", "dog.png", "notes.txt", "anim.gif", "raw.webp"] {
            fs::write(dir.join(name), b"").unwrap();
        }

        let source = ImageDirectorySource::new(&dir, "/images/");
        let prompts = source.list().unwrap();
        assert_eq!(
            prompts,
            vec!["/images/anim.gif", "/images/cat.JPG", "/images/dog.png"]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let source = ImageDirectorySource::new("/definitely/not/here", "/images");
        assert!(source.list().is_err());
    }
}
