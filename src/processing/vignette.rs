use image::RgbaImage;

/// Darkens pixels in proportion to their distance from the image center.
///
/// `vignette` is expected in `0..=100`.
pub fn apply(mut rgba: RgbaImage, vignette: i32) -> RgbaImage {
    if vignette <= 0 || rgba.width() == 0 || rgba.height() == 0 {
        return rgba;
    }

    let strength = vignette as f32 / 100.0;
    let cx = rgba.width() as f32 / 2.0;
    let cy = rgba.height() as f32 / 2.0;
    let max_distance = (cx * cx + cy * cy).sqrt();

    for (x, y, px) in rgba.enumerate_pixels_mut() {
        let factor = factor_at(x as f32 - cx, y as f32 - cy, max_distance, strength);
        for c in 0..3 {
            px[c] = (px[c] as f32 * factor).round() as u8;
        }
    }

    rgba
}

fn factor_at(dx: f32, dy: f32, max_distance: f32, strength: f32) -> f32 {
    let distance = (dx * dx + dy * dy).sqrt();
    (1.0 - (distance / max_distance) * strength).clamp(0.0, 1.0)
}
