//! Batch tool captioning raw pictures with their file name, producing the image deck.
//!
//! Usage: `tool-caption-images <input dir> <output dir> <font.ttf>`

#[cfg(feature = "tool-caption-images")]
mod caption;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "tool-caption-images")]
    {
        caption::run()?;
    }
    Ok(())
}
