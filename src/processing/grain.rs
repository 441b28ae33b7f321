use image::RgbaImage;
use rand::Rng;

use super::to_u8;

/// Adds film grain using the thread-local RNG; output differs run to run.
pub fn apply(rgba: RgbaImage, grain: i32) -> RgbaImage {
    apply_with_rng(rgba, grain, &mut rand::thread_rng())
}

/// Adds one uniform noise sample per pixel, shared by the three color channels.
///
/// `grain` is expected in `0..=100`; [`crate::processing::render`] clamps it.
pub fn apply_with_rng<R: Rng + ?Sized>(mut rgba: RgbaImage, grain: i32, rng: &mut R) -> RgbaImage {
    if grain <= 0 {
        return rgba;
    }

    let amount = grain as f32 / 100.0 * 50.0;
    for px in rgba.pixels_mut() {
        let noise = (rng.r#gen::<f32>() - 0.5) * amount;
        for c in 0..3 {
            px[c] = to_u8(px[c] as f32 + noise);
        }
    }

    rgba
}
