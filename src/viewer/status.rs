//! Per-image load status, independent of the transform state.

use std::collections::HashMap;

use crate::model::ImageStatus;

static LOADING: ImageStatus = ImageStatus::Loading;

/// Load status for each image index. Unknown indices read as loading.
#[derive(Debug, Clone, Default)]
pub struct ImageStatusStore {
    statuses: HashMap<usize, ImageStatus>,
}

impl ImageStatusStore {
    pub fn get(&self, index: usize) -> &ImageStatus {
        self.statuses.get(&index).unwrap_or(&LOADING)
    }

    pub fn set(&mut self, index: usize, status: ImageStatus) {
        self.statuses.insert(index, status);
    }

    pub fn clear(&mut self) {
        self.statuses.clear();
    }
}
