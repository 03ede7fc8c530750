//! Enlarge every picture of a directory and burn its name into a translucent bottom bar.

#![forbid(unsafe_code)]

mod render;
mod scan;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use fontdue::{Font, FontSettings};

use render::caption_image;
use scan::{caption_text, is_captionable, output_path};

pub fn run() -> Result<()> {
    let mut args = env::args_os().skip(1);
    let (Some(input), Some(output), Some(font_path)) = (args.next(), args.next(), args.next())
    else {
        bail!("usage: tool-caption-images <input dir> <output dir> <font.ttf>");
    };
    let input = PathBuf::from(input);
    let output = PathBuf::from(output);

    let font_bytes = fs::read(&font_path)
        .with_context(|| format!("reading font `{}`", PathBuf::from(&font_path).display()))?;
    let font = Font::from_bytes(font_bytes, FontSettings::default())
        .map_err(|err| anyhow::anyhow!("parsing font: {err}"))?;

    fs::create_dir_all(&output)
        .with_context(|| format!("creating `{}`", output.display()))?;

    let mut entries = fs::read_dir(&input)
        .with_context(|| format!("listing `{}`", input.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_file())
        .collect::<Vec<_>>();
    entries.sort();

    let mut processed = 0usize;
    let mut failed = 0usize;
    for path in entries {
        if !is_captionable(&path) {
            println!("Skipping non-image file: {}", path.display());
            continue;
        }

        let target = output_path(&path, &output);
        match process(&path, &target, &font) {
            Ok(()) => {
                processed += 1;
                println!("Processed: {}", path.display());
            }
            Err(err) => {
                failed += 1;
                eprintln!("Failed to process {}: {err:#}", path.display());
            }
        }
    }

    println!(
        "{processed} image(s) processed, {failed} failed. Output folder: {}",
        output.display()
    );
    Ok(())
}

fn process(source: &Path, target: &Path, font: &Font) -> Result<()> {
    let image = image::open(source).with_context(|| format!("decoding `{}`", source.display()))?;
    let text = caption_text(source);
    let captioned = caption_image(&image, &text, font);

    let is_jpeg = target
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg"));
    let result = if is_jpeg {
        image::DynamicImage::ImageRgba8(captioned).to_rgb8().save(target)
    } else {
        captioned.save(target)
    };
    result.with_context(|| format!("writing `{}`", target.display()))
}
