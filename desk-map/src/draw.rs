//! Pixel-level drawing on RGBA canvases

use ab_glyph::{FontArc, PxScale};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_text_mut, text_size};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Font used when none is configured
pub const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans-Bold.ttf");

/// Outline of a free desk
pub const MIDNIGHT_BLUE: Rgba<u8> = Rgba([25, 25, 112, 255]);
/// Name of a VIP
pub const DARK_GREEN: Rgba<u8> = Rgba([0, 100, 0, 255]);
/// Name of anybody else, or "Unknown"
pub const DARK_RED: Rgba<u8> = Rgba([139, 0, 0, 255]);
/// Overlay marking a zone's extent on a shared map
pub const ZONE_SHADE: Rgba<u8> = Rgba([128, 128, 128, 64]);
/// Zone name written across its extent
pub const ZONE_TITLE: Rgba<u8> = Rgba([128, 128, 128, 64]);

/// Outline width of free desk rings
pub const RING_WIDTH: u32 = 3;
/// Pixel height of occupant names
pub const NAME_SIZE: f32 = 18.0;
/// Clockwise tilt of occupant names, keeps neighbouring names apart
pub const NAME_TILT_DEGREES: f32 = 13.0;
/// Zone titles that would be smaller are left out
pub const MIN_TITLE_SIZE: f32 = 8.0;

const REFERENCE_SIZE: f32 = 100.0;

/// Alpha-composite `color` over one pixel
pub fn blend(pixel: &mut Rgba<u8>, color: Rgba<u8>) {
    let alpha = f64::from(color[3]) / 255.0;
    for channel in 0..3 {
        let over = f64::from(color[channel]) * alpha;
        let under = f64::from(pixel[channel]) * (1.0 - alpha);
        pixel[channel] = (over + under).round().clamp(0.0, 255.0) as u8;
    }
    pixel[3] = pixel[3].max(color[3]);
}

/// Blend `color` over the rectangle spanned by two corners, clipped to the canvas
pub fn shade_rect(
    canvas: &mut RgbaImage,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    color: Rgba<u8>,
) {
    let (width, height) = canvas.dimensions();
    let clip = |v: f64, max: u32| v.max(0.0).min(f64::from(max)) as u32;
    let (left, right) = (clip(x0.min(x1), width), clip(x0.max(x1), width));
    let (top, bottom) = (clip(y0.min(y1), height), clip(y0.max(y1), height));

    for y in top..bottom {
        for x in left..right {
            blend(canvas.get_pixel_mut(x, y), color);
        }
    }
}

/// Circle outline `width` pixels thick, drawn inward from `radius`
pub fn ring(
    canvas: &mut RgbaImage,
    (cx, cy): (f64, f64),
    radius: f64,
    width: u32,
    color: Rgba<u8>,
) {
    let outer = radius.round() as i32;
    if outer <= 0 {
        return;
    }
    let center = (cx.round() as i32, cy.round() as i32);
    let inner = (outer - width as i32 + 1).max(1);
    for r in inner..=outer {
        draw_hollow_circle_mut(canvas, center, r, color);
    }
}

/// `text` centred on `center`, tilted clockwise by `tilt_degrees`
pub fn label(
    canvas: &mut RgbaImage,
    (cx, cy): (f64, f64),
    text: &str,
    font: &FontArc,
    size: f32,
    tilt_degrees: f32,
    color: Rgba<u8>,
) {
    let Some(mask) = text_mask(text, font, size, tilt_degrees) else {
        return;
    };
    let (width, height) = mask.dimensions();
    let left = cx.round() as i64 - i64::from(width / 2);
    let top = cy.round() as i64 - i64::from(height / 2);
    paint_mask(canvas, &mask, (left, top), color);
}

/// Largest upright `text` fitting the box spanned by two corners, centred in it
pub fn title(
    canvas: &mut RgbaImage,
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    text: &str,
    font: &FontArc,
    color: Rgba<u8>,
) {
    let (width, height) = text_size(PxScale::from(REFERENCE_SIZE), font, text);
    if width == 0 || height == 0 {
        return;
    }
    let fit = ((x1 - x0).abs() / f64::from(width)).min((y1 - y0).abs() / f64::from(height));
    let size = REFERENCE_SIZE * fit as f32;
    if size < MIN_TITLE_SIZE {
        return;
    }
    let center = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    label(canvas, center, text, font, size, 0.0, color);
}

/// Coverage of `text` on a square big enough for any tilt
fn text_mask(text: &str, font: &FontArc, size: f32, tilt_degrees: f32) -> Option<GrayImage> {
    let scale = PxScale::from(size);
    let (width, height) = text_size(scale, font, text);
    if width == 0 || height == 0 {
        return None;
    }
    let side = f64::from(width).hypot(f64::from(height)).ceil() as u32 + 2;
    let mut mask = GrayImage::new(side, side);
    let x = ((side - width) / 2) as i32;
    let y = ((side - height) / 2) as i32;
    draw_text_mut(&mut mask, Luma([255]), x, y, scale, font, text);

    if tilt_degrees == 0.0 {
        return Some(mask);
    }
    Some(rotate_about_center(
        &mask,
        tilt_degrees.to_radians(),
        Interpolation::Bilinear,
        Luma([0]),
    ))
}

/// Blend `color` through `mask`, its top-left corner placed at `(left, top)`
fn paint_mask(
    canvas: &mut RgbaImage,
    mask: &GrayImage,
    (left, top): (i64, i64),
    color: Rgba<u8>,
) {
    let (width, height) = canvas.dimensions();
    for (x, y, coverage) in mask.enumerate_pixels() {
        let coverage = coverage[0];
        if coverage == 0 {
            continue;
        }
        let (px, py) = (left + i64::from(x), top + i64::from(y));
        if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
            continue;
        }
        let alpha = (u16::from(color[3]) * u16::from(coverage) / 255) as u8;
        blend(
            canvas.get_pixel_mut(px as u32, py as u32),
            Rgba([color[0], color[1], color[2], alpha]),
        );
    }
}
