use image::RgbaImage;
use imageproc::filter::gaussian_blur_f32;

use super::to_u8;

const SIGMA: f32 = 1.5;

/// Unsharp mask for positive `sharpness`, blend toward the blur for negative.
///
/// `sharpness` is expected in `-100..=100`.
pub fn apply(rgba: RgbaImage, sharpness: i32) -> RgbaImage {
    if sharpness == 0 || rgba.width() == 0 || rgba.height() == 0 {
        return rgba;
    }

    let amount = sharpness as f32 / 100.0;
    let blurred = gaussian_blur_f32(&rgba, SIGMA);

    let mut out = rgba;
    for (o, b) in out.pixels_mut().zip(blurred.pixels()) {
        for c in 0..3 {
            let src = o[c] as f32;
            let detail = src - b[c] as f32;
            // amount < 0 subtracts detail, which moves toward the blur
            o[c] = to_u8(src + amount * detail);
        }
    }

    out
}
