//! CPU pixel pipeline.
//!
//! A render always starts from a copy of the caller's original and runs
//! filter → adjustments → sharpness → grain → vignette. Every stage takes the
//! working buffer by value, mutates it in place and hands it on.

use std::time::Instant;

use image::RgbaImage;
use tracing::debug;

use crate::state::EditState;

pub mod adjustments;
pub mod filters;
pub mod grain;
pub mod sharpness;
pub mod transform;
pub mod vignette;

/// Render `original` with `state`. The original is never modified.
///
/// Parameters are clamped here, once; the stages take them as given.
pub fn render(original: &RgbaImage, state: &EditState) -> RgbaImage {
    let span = tracing::debug_span!(
        "render",
        width = original.width(),
        height = original.height(),
        filter = %state.filter
    );
    let _enter = span.enter();

    let adj = state.adjustments.clamped();
    let started = Instant::now();
    let mut out = original.clone();

    out = timed("filter", || filters::apply(out, state.filter));
    out = timed("adjustments", || adjustments::apply(out, &adj));
    out = timed("sharpness", || sharpness::apply(out, adj.sharpness));
    out = timed("grain", || grain::apply(out, adj.grain));
    out = timed("vignette", || vignette::apply(out, adj.vignette));

    debug!(elapsed_ms = started.elapsed().as_secs_f64() * 1000.0, "render finished");
    out
}

fn timed(stage: &'static str, f: impl FnOnce() -> RgbaImage) -> RgbaImage {
    let started = Instant::now();
    let out = f();
    debug!(stage, elapsed_ms = started.elapsed().as_secs_f64() * 1000.0, "stage done");
    out
}

/// Rec. 601 luma, as used by the grayscale filters and saturation.
pub(crate) fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

pub(crate) fn clamp_channel(v: f32) -> f32 {
    v.clamp(0.0, 255.0)
}

/// Clamp to the byte range and round to nearest, ties away from zero.
pub(crate) fn to_u8(v: f32) -> u8 {
    clamp_channel(v).round() as u8
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba, RgbaImage};

    use crate::state::{Adjustments, EditState, FilterKind};

    use super::*;

    fn gradient(w: u32, h: u32) -> RgbaImage {
        ImageBuffer::from_fn(w, h, |x, y| {
            Rgba([
                (x * 255 / w.max(1)) as u8,
                (y * 255 / h.max(1)) as u8,
                ((x + y) * 7 % 256) as u8,
                (255 - x % 3 * 40) as u8,
            ])
        })
    }

    #[test]
    fn identity_state_returns_input_unchanged() {
        let img = gradient(13, 9);
        assert_eq!(render(&img, &EditState::default()), img);
    }

    #[test]
    fn render_does_not_touch_original() {
        let img = gradient(6, 6);
        let before = img.clone();
        let state = EditState {
            filter: FilterKind::Sepia,
            adjustments: Adjustments {
                brightness: 40,
                vignette: 80,
                ..Default::default()
            },
        };
        let out = render(&img, &state);
        assert_eq!(img, before);
        assert_ne!(out, img);
    }

    #[test]
    fn extreme_parameters_keep_alpha_and_shape() {
        let img = gradient(16, 12);
        let combos = [
            Adjustments {
                brightness: 100,
                contrast: 100,
                saturation: 100,
                exposure: 100,
                temperature: 100,
                sharpness: 100,
                grain: 100,
                vignette: 100,
            },
            Adjustments {
                brightness: -100,
                contrast: -100,
                saturation: -100,
                exposure: -100,
                temperature: -100,
                sharpness: -100,
                grain: 100,
                vignette: 100,
            },
            Adjustments {
                brightness: 900,
                exposure: -900,
                grain: 400,
                vignette: -4,
                ..Default::default()
            },
        ];
        for filter in FilterKind::ALL {
            for adjustments in combos {
                let out = render(&img, &EditState { filter, adjustments });
                assert_eq!(out.dimensions(), img.dimensions());
                for (o, i) in out.pixels().zip(img.pixels()) {
                    assert_eq!(o[3], i[3]);
                }
            }
        }
    }

    #[test]
    fn render_without_grain_is_deterministic() {
        let img = gradient(20, 20);
        let state = EditState {
            filter: FilterKind::Vintage,
            adjustments: Adjustments {
                contrast: 25,
                saturation: -40,
                temperature: 60,
                sharpness: 30,
                vignette: 50,
                ..Default::default()
            },
        };
        assert_eq!(render(&img, &state), render(&img, &state));
    }

    #[test]
    fn filter_runs_before_adjustments() {
        let img: RgbaImage = ImageBuffer::from_pixel(1, 1, Rgba([100, 150, 200, 255]));
        let adjustments = Adjustments {
            temperature: 100,
            ..Default::default()
        };
        let state = EditState {
            filter: FilterKind::BwClassic,
            adjustments,
        };

        let pipeline = render(&img, &state);
        let reversed = filters::apply(adjustments::apply(img.clone(), &adjustments), FilterKind::BwClassic);

        // Temperature after grayscale leaves a tint; grayscale last removes it.
        assert_ne!(pipeline, reversed);
        let p = pipeline.get_pixel(0, 0);
        assert!(p[0] > p[2]);
        let r = reversed.get_pixel(0, 0);
        assert_eq!(r[0], r[2]);
    }

    #[test]
    fn sepia_on_white_saturates() {
        let img: RgbaImage = ImageBuffer::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        let state = EditState {
            filter: FilterKind::Sepia,
            ..Default::default()
        };
        let out = render(&img, &state);
        assert!(out.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn brightness_fifty_on_mid_gray() {
        let img: RgbaImage = ImageBuffer::from_pixel(1, 1, Rgba([100, 100, 100, 255]));
        let state = EditState {
            adjustments: Adjustments {
                brightness: 50,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(render(&img, &state).get_pixel(0, 0).0, [228, 228, 228, 255]);
    }

    #[test]
    fn empty_bitmap_renders_empty() {
        let img = RgbaImage::new(0, 0);
        let state = EditState {
            filter: FilterKind::BwContrast,
            adjustments: Adjustments {
                brightness: 10,
                sharpness: 50,
                grain: 50,
                vignette: 50,
                ..Default::default()
            },
        };
        let out = render(&img, &state);
        assert_eq!(out.dimensions(), (0, 0));
        assert!(out.as_raw().is_empty());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(to_u8(227.5), 228);
        assert_eq!(to_u8(0.49), 0);
        assert_eq!(to_u8(-12.0), 0);
        assert_eq!(to_u8(300.0), 255);
    }
}
