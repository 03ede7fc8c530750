use std::path::{Path, PathBuf};

/// Extensions (lowercase) the tool knows how to caption.
const CAPTIONABLE: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

pub fn is_captionable(path: &Path) -> bool {
    extension(path).is_some_and(|ext| CAPTIONABLE.contains(&ext.as_str()))
}

/// Caption drawn on the picture: its file stem.
pub fn caption_text(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where the captioned copy of `source` lands; webp has no encoder and is written as png.
pub fn output_path(source: &Path, output_dir: &Path) -> PathBuf {
    let name = source.file_name().map(PathBuf::from).unwrap_or_default();
    let target = output_dir.join(name);
    if extension(source).as_deref() == Some("webp") {
        target.with_extension("png")
    } else {
        target
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_extension_case_insensitively() {
        assert!(is_captionable(Path::new("raw/Eiffel Tower.JPG")));
        assert!(is_captionable(Path::new("raw/cat.tiff")));
        assert!(!is_captionable(Path::new("raw/anim.gif")));
        assert!(!is_captionable(Path::new("raw/README")));
    }

    #[test]
    fn caption_is_the_file_stem() {
        assert_eq!(caption_text(Path::new("raw/Eiffel Tower.jpg")), "Eiffel Tower");
    }

    #[test]
    fn webp_is_written_as_png() {
        let out = Path::new("result");
        assert_eq!(
            output_path(Path::new("raw/dog.webp"), out),
            PathBuf::from("result/dog.png")
        );
        assert_eq!(
            output_path(Path::new("raw/dog.jpeg"), out),
            PathBuf::from("result/dog.jpeg")
        );
    }
}
