use image::RgbaImage;

use crate::state::Adjustments;

use super::{clamp_channel, luma, to_u8};

/// Applies brightness, contrast, saturation, exposure and temperature, in that order.
///
/// Each step works on the values left by the previous one and clamps to `[0, 255]`
/// before the next step runs. Bytes are only rounded once, after the last step.
pub fn apply(mut rgba: RgbaImage, adj: &Adjustments) -> RgbaImage {
    if adj.tonal_is_identity() {
        return rgba;
    }

    // p * 2.55, kept exact for half steps
    let brightness = adj.brightness as f32 * 255.0 / 100.0;
    let contrast = (adj.contrast + 100) as f32 / 100.0;
    let saturation = (adj.saturation + 100) as f32 / 100.0;
    let exposure = 2.0_f32.powf(adj.exposure as f32 / 100.0);
    let temp = adj.temperature as f32 / 100.0;
    // (red shift, blue shift) for warm vs cool
    let (temp_r, temp_b) = if temp > 0.0 {
        (temp * 30.0, -temp * 20.0)
    } else {
        (temp * 20.0, -temp * 30.0)
    };

    for px in rgba.pixels_mut() {
        let mut rgb = [px[0] as f32, px[1] as f32, px[2] as f32];

        if adj.brightness != 0 {
            rgb = rgb.map(|c| clamp_channel(c + brightness));
        }

        if adj.contrast != 0 {
            rgb = rgb.map(|c| clamp_channel((c - 128.0) * contrast + 128.0));
        }

        if adj.saturation != 0 {
            let gray = luma(rgb[0], rgb[1], rgb[2]);
            rgb = rgb.map(|c| clamp_channel(gray + (c - gray) * saturation));
        }

        if adj.exposure != 0 {
            rgb = rgb.map(|c| clamp_channel(c * exposure));
        }

        if adj.temperature != 0 {
            rgb[0] = clamp_channel(rgb[0] + temp_r);
            rgb[2] = clamp_channel(rgb[2] + temp_b);
        }

        px[0] = to_u8(rgb[0]);
        px[1] = to_u8(rgb[1]);
        px[2] = to_u8(rgb[2]);
    }

    rgba
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use crate::state::Adjustments;

    use super::apply;

    fn one_pixel(rgb: [u8; 3]) -> RgbaImage {
        ImageBuffer::from_pixel(1, 1, Rgba([rgb[0], rgb[1], rgb[2], 255]))
    }

    fn adjusted(rgb: [u8; 3], adj: Adjustments) -> [u8; 4] {
        apply(one_pixel(rgb), &adj).get_pixel(0, 0).0
    }

    #[test]
    fn zero_adjustments_are_identity() {
        let img = ImageBuffer::from_fn(4, 3, |x, y| Rgba([x as u8 * 60, y as u8 * 70, 33, 128]));
        assert_eq!(apply(img.clone(), &Adjustments::default()), img);
    }

    #[test]
    fn brightness_rounds_half_away_from_zero() {
        // 100 + 50 * 2.55 = 227.5
        let adj = Adjustments {
            brightness: 50,
            ..Default::default()
        };
        assert_eq!(adjusted([100, 100, 100], adj), [228, 228, 228, 255]);
    }

    #[test]
    fn brightness_clamps_both_ends() {
        let up = Adjustments {
            brightness: 100,
            ..Default::default()
        };
        let down = Adjustments {
            brightness: -100,
            ..Default::default()
        };
        assert_eq!(adjusted([200, 10, 0], up), [255, 255, 255, 255]);
        assert_eq!(adjusted([200, 10, 255], down), [0, 0, 0, 255]);
    }

    #[test]
    fn contrast_spreads_around_mid_gray() {
        let adj = Adjustments {
            contrast: 50,
            ..Default::default()
        };
        // (178 - 128) * 1.5 + 128 = 203, (78 - 128) * 1.5 + 128 = 53
        assert_eq!(adjusted([178, 78, 128], adj), [203, 53, 128, 255]);

        let flat = Adjustments {
            contrast: -100,
            ..Default::default()
        };
        assert_eq!(adjusted([10, 240, 90], flat), [128, 128, 128, 255]);
    }

    #[test]
    fn full_desaturation_collapses_to_luma() {
        let adj = Adjustments {
            saturation: -100,
            ..Default::default()
        };
        let out = adjusted([200, 100, 50], adj);
        assert_eq!(out, [124, 124, 124, 255]);
    }

    #[test]
    fn exposure_doubles_at_full_scale() {
        let adj = Adjustments {
            exposure: 100,
            ..Default::default()
        };
        assert_eq!(adjusted([60, 100, 200], adj), [120, 200, 255, 255]);
    }

    #[test]
    fn temperature_warms_and_cools() {
        let warm = Adjustments {
            temperature: 100,
            ..Default::default()
        };
        let cool = Adjustments {
            temperature: -100,
            ..Default::default()
        };
        assert_eq!(adjusted([100, 100, 100], warm), [130, 100, 80, 255]);
        assert_eq!(adjusted([100, 100, 100], cool), [80, 100, 130, 255]);
    }

    #[test]
    fn steps_see_previous_step_output() {
        // Brightness saturates to 255 first; contrast then works from 255, not 200.
        let adj = Adjustments {
            brightness: 100,
            contrast: -50,
            ..Default::default()
        };
        // (255 - 128) * 0.5 + 128 = 191.5
        assert_eq!(adjusted([200, 200, 200], adj)[0], 192);
    }

    #[test]
    fn alpha_is_untouched() {
        let img = ImageBuffer::from_pixel(2, 2, Rgba([90u8, 90, 90, 17]));
        let adj = Adjustments {
            brightness: 40,
            saturation: 30,
            temperature: -20,
            ..Default::default()
        };
        let out = apply(img, &adj);
        assert!(out.pixels().all(|p| p[3] == 17));
    }
}
