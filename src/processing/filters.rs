use image::RgbaImage;

use crate::state::FilterKind;

use super::{luma, to_u8};

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

// (weight, bias) per channel, pulling each channel toward the pixel mean.
const VINTAGE: [(f32, f32); 3] = [(0.6, 20.0), (0.5, 10.0), (0.4, -10.0)];

/// Recolors every pixel according to the selected named filter.
pub fn apply(mut rgba: RgbaImage, filter: FilterKind) -> RgbaImage {
    if filter == FilterKind::None {
        return rgba;
    }

    for px in rgba.pixels_mut() {
        let r = px[0] as f32;
        let g = px[1] as f32;
        let b = px[2] as f32;

        let out = match filter {
            FilterKind::None => continue,
            FilterKind::BwClassic => {
                let gray = luma(r, g, b);
                [gray; 3]
            }
            FilterKind::BwContrast => {
                let gray = luma(r, g, b);
                let curved = if gray > 128.0 {
                    (gray * 1.3).min(255.0)
                } else {
                    (gray * 0.7).max(0.0)
                };
                [curved; 3]
            }
            FilterKind::Sepia => {
                SEPIA.map(|[kr, kg, kb]| (r * kr + g * kg + b * kb).min(255.0))
            }
            FilterKind::Vintage => {
                let avg = (r + g + b) / 3.0;
                let mut out = [r, g, b];
                for (c, (weight, bias)) in out.iter_mut().zip(VINTAGE) {
                    *c = avg + (*c - avg) * weight + bias;
                }
                out
            }
        };

        px[0] = to_u8(out[0]);
        px[1] = to_u8(out[1]);
        px[2] = to_u8(out[2]);
    }

    rgba
}
