//! Slide transition state and index arithmetic.

use crate::model::SlideDirection;
use crate::scheduler::TaskHandle;

/// Transient animation state between two images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideState {
    /// No transition in progress
    #[default]
    Idle,
    /// Sliding towards `next_index`; `commit` fires when the transition ends
    Sliding {
        direction: SlideDirection,
        next_index: usize,
        commit: TaskHandle,
    },
}

impl SlideState {
    pub fn is_sliding(&self) -> bool {
        matches!(self, SlideState::Sliding { .. })
    }

    pub fn direction(&self) -> Option<SlideDirection> {
        match self {
            SlideState::Sliding { direction, .. } => Some(*direction),
            SlideState::Idle => None,
        }
    }

    pub fn next_index(&self) -> Option<usize> {
        match self {
            SlideState::Sliding { next_index, .. } => Some(*next_index),
            SlideState::Idle => None,
        }
    }
}

/// Index after `current`, wrapping to the start.
pub fn next_index(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + 1) % len }
}

/// Index before `current`, wrapping to the end.
pub fn previous_index(current: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (current + len - 1) % len }
}

/// Distinct neighbours of `current` (previous first), excluding `current`.
pub fn neighbours(current: usize, len: usize) -> Vec<usize> {
    let mut result = Vec::with_capacity(2);
    for index in [previous_index(current, len), next_index(current, len)] {
        if index != current && !result.contains(&index) {
            result.push(index);
        }
    }
    result
}
