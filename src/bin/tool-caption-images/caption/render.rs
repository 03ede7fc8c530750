use fontdue::Font;
use image::{DynamicImage, Rgba, RgbaImage, imageops::FilterType};

const SCALE: f32 = 1.5;
/// Share of the height covered by the caption bar.
const BAR_RATIO: f32 = 0.2;
/// Font size relative to the bar height.
const FONT_RATIO: f32 = 0.8;
/// Widest the caption may get, relative to the image width.
const MAX_TEXT_WIDTH_RATIO: f32 = 0.95;
const BAR_OPACITY: f32 = 0.5;

/// Enlarge `image`, darken its bottom band and center `text` in white inside it.
pub fn caption_image(image: &DynamicImage, text: &str, font: &Font) -> RgbaImage {
    let width = ((image.width() as f32) * SCALE).round().max(1.0) as u32;
    let height = ((image.height() as f32) * SCALE).round().max(1.0) as u32;
    let mut canvas = image
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgba8();

    let bar_height = ((height as f32) * BAR_RATIO).round().max(1.0) as u32;
    let bar_top = height - bar_height.min(height);
    darken_band(&mut canvas, bar_top, BAR_OPACITY);

    let size = fit_font_size(
        bar_height as f32 * FONT_RATIO,
        width as f32 * MAX_TEXT_WIDTH_RATIO,
        |size| text_width(font, text, size),
    );
    draw_centered(&mut canvas, font, text, size, bar_top, bar_height);
    canvas
}

/// Blend every pixel from `top` down with black at `opacity`.
pub fn darken_band(canvas: &mut RgbaImage, top: u32, opacity: f32) {
    let keep = 1.0 - opacity.clamp(0.0, 1.0);
    for y in top..canvas.height() {
        for x in 0..canvas.width() {
            let pixel = canvas.get_pixel_mut(x, y);
            for channel in 0..3 {
                pixel[channel] = ((pixel[channel] as f32) * keep).round() as u8;
            }
        }
    }
}

/// Largest size up to `preferred` whose measured width fits in `max_width`.
pub fn fit_font_size(preferred: f32, max_width: f32, measure: impl Fn(f32) -> f32) -> f32 {
    let width = measure(preferred);
    if width <= max_width || width <= 0.0 {
        return preferred;
    }
    (preferred * max_width / width).max(1.0)
}

fn text_width(font: &Font, text: &str, size: f32) -> f32 {
    text.chars()
        .map(|c| font.metrics(c, size).advance_width)
        .sum()
}

fn draw_centered(
    canvas: &mut RgbaImage,
    font: &Font,
    text: &str,
    size: f32,
    bar_top: u32,
    bar_height: u32,
) {
    let (ascent, descent) = font
        .horizontal_line_metrics(size)
        .map(|line| (line.ascent, line.descent))
        .unwrap_or((size * 0.8, -size * 0.2));
    let text_height = ascent - descent;
    let baseline = bar_top as f32 + (bar_height as f32 - text_height) / 2.0 + ascent;
    let mut pen_x = (canvas.width() as f32 - text_width(font, text, size)) / 2.0;

    for c in text.chars() {
        let (metrics, coverage) = font.rasterize(c, size);
        let left = (pen_x + metrics.xmin as f32).round() as i64;
        let top = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i64;

        for row in 0..metrics.height {
            for col in 0..metrics.width {
                let alpha = coverage[row * metrics.width + col];
                if alpha == 0 {
                    continue;
                }
                let x = left + col as i64;
                let y = top + row as i64;
                if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
                    continue;
                }
                blend_white(canvas.get_pixel_mut(x as u32, y as u32), alpha);
            }
        }

        pen_x += metrics.advance_width;
    }
}

fn blend_white(pixel: &mut Rgba<u8>, coverage: u8) {
    let alpha = coverage as f32 / 255.0;
    for channel in 0..3 {
        let base = pixel[channel] as f32;
        pixel[channel] = (base + (255.0 - base) * alpha).round() as u8;
    }
    pixel[3] = pixel[3].max(coverage);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_is_half_dark() {
        let mut canvas = RgbaImage::from_pixel(4, 10, Rgba([200, 100, 50, 255]));
        darken_band(&mut canvas, 8, 0.5);
        assert_eq!(canvas.get_pixel(0, 7), &Rgba([200, 100, 50, 255]));
        assert_eq!(canvas.get_pixel(3, 9), &Rgba([100, 50, 25, 255]));
    }

    #[test]
    fn font_shrinks_to_fit() {
        let measure = |size: f32| size * 10.0;
        assert_eq!(fit_font_size(20.0, 500.0, measure), 20.0);
        assert_eq!(fit_font_size(20.0, 100.0, measure), 10.0);
    }

    #[test]
    fn white_blend_follows_coverage() {
        let mut pixel = Rgba([0, 0, 0, 255]);
        blend_white(&mut pixel, 255);
        assert_eq!(pixel, Rgba([255, 255, 255, 255]));

        let mut pixel = Rgba([100, 100, 100, 255]);
        blend_white(&mut pixel, 0);
        assert_eq!(pixel, Rgba([100, 100, 100, 255]));
    }
}
