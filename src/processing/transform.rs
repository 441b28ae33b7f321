use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Rotate 90° clockwise. Pixel `(x, y)` lands at `(height - 1 - y, x)`.
pub fn rotate_cw(img: &RgbaImage) -> RgbaImage {
    imageops::rotate90(img)
}

/// Rotate clockwise by `turns` quarter turns; negative values turn counter-clockwise.
pub fn rotate_quarter_turns(img: &RgbaImage, turns: i32) -> RgbaImage {
    match turns.rem_euclid(4) {
        1 => imageops::rotate90(img),
        2 => imageops::rotate180(img),
        3 => imageops::rotate270(img),
        _ => img.clone(),
    }
}

/// Scale `img` down so it fits inside `max_width` x `max_height`, keeping the aspect ratio.
///
/// Images already inside the box are returned as-is. A zero limit disables fitting.
pub fn fit_within(img: RgbaImage, max_width: u32, max_height: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 || max_width == 0 || max_height == 0 {
        return img;
    }
    if w <= max_width && h <= max_height {
        return img;
    }

    let (new_w, new_h) = fitted_dimensions(w, h, max_width, max_height);
    tracing::debug!(from = ?(w, h), to = ?(new_w, new_h), "fitting image for display");
    imageops::resize(&img, new_w, new_h, FilterType::Triangle)
}

fn fitted_dimensions(w: u32, h: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio = (max_width as f64 / w as f64).min(max_height as f64 / h as f64);
    let new_w = ((w as f64 * ratio) as u32).clamp(1, max_width);
    let new_h = ((h as f64 * ratio) as u32).clamp(1, max_height);
    (new_w, new_h)
}
