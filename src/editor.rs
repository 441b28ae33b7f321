use image::RgbaImage;
use tracing::debug;

use crate::processing::{self, transform};
use crate::state::{Adjustments, EditState, FilterKind};

/// Editing session: the original bitmap, the current parameters and the last render.
///
/// Every parameter change re-renders from the original. Nothing is cached between
/// renders.
pub struct Editor {
    original: RgbaImage,
    displayed: RgbaImage,
    state: EditState,
}

impl Editor {
    pub fn new(original: RgbaImage) -> Self {
        Self::with_state(original, EditState::default())
    }

    pub fn with_state(original: RgbaImage, state: EditState) -> Self {
        let displayed = processing::render(&original, &state);
        Self {
            original,
            displayed,
            state,
        }
    }

    pub fn original(&self) -> &RgbaImage {
        &self.original
    }

    pub fn displayed(&self) -> &RgbaImage {
        &self.displayed
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn into_displayed(self) -> RgbaImage {
        self.displayed
    }

    pub fn set_filter(&mut self, filter: FilterKind) {
        self.update(|state| state.filter = filter);
    }

    pub fn set_adjustments(&mut self, adjustments: Adjustments) {
        self.update(|state| state.adjustments = adjustments);
    }

    pub fn set_state(&mut self, state: EditState) {
        self.update(|s| *s = state);
    }

    /// Apply `change` to the parameters and re-render from the original.
    pub fn update(&mut self, change: impl FnOnce(&mut EditState)) {
        change(&mut self.state);
        self.rerender();
    }

    /// Back to no filter and all sliders at zero.
    pub fn reset(&mut self) {
        self.set_state(EditState::default());
    }

    /// Rotate what is currently shown 90° clockwise and make it the new original.
    ///
    /// Edits visible at this point are baked into the new original. The parameters
    /// are kept and rendered again on top of the rotated image straight away.
    pub fn rotate(&mut self) {
        let rotated = transform::rotate_cw(&self.displayed);
        debug!(
            width = rotated.width(),
            height = rotated.height(),
            "rotated; replacing original"
        );
        self.original = rotated;
        self.rerender();
    }

    fn rerender(&mut self) {
        self.displayed = processing::render(&self.original, &self.state);
    }
}
