use serde::{Deserialize, Serialize};

use crate::core::SharedPalette;

/// Attachment of a control to a renderable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loaded,
}

/// Load state and starting palette position of one control instance.
///
/// The starting index is read from the shared palette once, at construction,
/// and only when the control asked for a randomized start.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    load_state: LoadState,
    palette: SharedPalette,
    randomized_start: bool,
    starting_color_index: usize,
}

impl Lifecycle {
    #[must_use]
    pub fn new(palette: SharedPalette, randomize_starting_color: bool) -> Self {
        let starting_color_index = if randomize_starting_color {
            palette.next_starting_index()
        } else {
            0
        };
        Self {
            load_state: LoadState::NotLoaded,
            palette,
            randomized_start: randomize_starting_color,
            starting_color_index,
        }
    }

    /// Moves to `Loaded`. Returns `false` when the control was already loaded.
    pub fn mark_loaded(&mut self) -> bool {
        if self.load_state == LoadState::Loaded {
            return false;
        }
        self.load_state = LoadState::Loaded;
        true
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    #[must_use]
    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    #[must_use]
    pub fn randomized_start(&self) -> bool {
        self.randomized_start
    }

    #[must_use]
    pub fn starting_color_index(&self) -> usize {
        self.starting_color_index
    }
}
