use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{ChartError, ChartResult};

use super::types::Color;

/// Default series colors, assigned in order starting from a control's
/// starting index.
pub const DEFAULT_SERIES_COLORS: [Color; 18] = [
    Color::rgb(33, 149, 242),
    Color::rgb(243, 67, 54),
    Color::rgb(254, 192, 7),
    Color::rgb(96, 125, 138),
    Color::rgb(155, 39, 175),
    Color::rgb(0, 149, 135),
    Color::rgb(76, 174, 80),
    Color::rgb(121, 85, 72),
    Color::rgb(232, 30, 99),
    Color::rgb(63, 81, 180),
    Color::rgb(0, 187, 211),
    Color::rgb(138, 194, 73),
    Color::rgb(204, 219, 57),
    Color::rgb(254, 234, 59),
    Color::rgb(254, 152, 0),
    Color::rgb(254, 86, 34),
    Color::rgb(157, 157, 157),
    Color::rgb(103, 58, 182),
];

static GLOBAL_PALETTE: Lazy<SharedPalette> = Lazy::new(SharedPalette::default);

struct StartingColorState {
    colors: Vec<Color>,
    seed: Option<u64>,
    source: Option<StdRng>,
    last_start: Option<usize>,
}

impl StartingColorState {
    fn source(&mut self) -> &mut StdRng {
        let seed = self.seed;
        self.source.get_or_insert_with(|| {
            debug!(seeded = seed.is_some(), "initializing starting-color source");
            match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            }
        })
    }
}

/// Palette and random starting-index source shared by every control that
/// holds a handle to it.
///
/// The random source is created lazily on the first randomized draw and lives
/// as long as the palette. Access is serialized by a mutex so hosts that build
/// controls on several threads still observe one sequence of draws.
#[derive(Clone)]
pub struct SharedPalette {
    state: Arc<Mutex<StartingColorState>>,
}

impl Default for SharedPalette {
    fn default() -> Self {
        Self::from_state(DEFAULT_SERIES_COLORS.to_vec(), None)
    }
}

impl fmt::Debug for SharedPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SharedPalette")
            .field("colors", &state.colors.len())
            .field("source_initialized", &state.source.is_some())
            .field("last_start", &state.last_start)
            .finish()
    }
}

impl SharedPalette {
    /// Process-wide palette used by controls that are not given one explicitly.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_PALETTE.clone()
    }

    pub fn new(colors: Vec<Color>) -> ChartResult<Self> {
        validate_colors(&colors)?;
        Ok(Self::from_state(colors, None))
    }

    /// Palette whose random source is seeded deterministically.
    pub fn with_seed(colors: Vec<Color>, seed: u64) -> ChartResult<Self> {
        validate_colors(&colors)?;
        Ok(Self::from_state(colors, Some(seed)))
    }

    fn from_state(colors: Vec<Color>, seed: Option<u64>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StartingColorState {
                colors,
                seed,
                source: None,
                last_start: None,
            })),
        }
    }

    #[must_use]
    pub fn colors(&self) -> Vec<Color> {
        self.state.lock().colors.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn set_colors(&self, colors: Vec<Color>) -> ChartResult<()> {
        validate_colors(&colors)?;
        let mut state = self.state.lock();
        if let Some(last) = state.last_start {
            state.last_start = Some(last % colors.len());
        }
        state.colors = colors;
        Ok(())
    }

    /// Color for a style index, wrapping around the palette.
    #[must_use]
    pub fn color_for(&self, style_index: usize) -> Color {
        let state = self.state.lock();
        state.colors[style_index % state.colors.len()]
    }

    #[must_use]
    pub fn is_source_initialized(&self) -> bool {
        self.state.lock().source.is_some()
    }

    /// Draws the starting index for a control that requested a randomized palette.
    ///
    /// The first draw is uniform over the palette; each later draw advances the
    /// previous start by a non-zero offset, so consecutive controls never share
    /// a starting index when the palette has more than one color.
    pub fn next_starting_index(&self) -> usize {
        let mut state = self.state.lock();
        let len = state.colors.len();
        if len <= 1 {
            return 0;
        }
        let previous = state.last_start;
        let source = state.source();
        let next = match previous {
            None => source.gen_range(0..len),
            Some(previous) => (previous + source.gen_range(1..len)) % len,
        };
        state.last_start = Some(next);
        next
    }
}

fn validate_colors(colors: &[Color]) -> ChartResult<()> {
    if colors.is_empty() {
        return Err(ChartError::InvalidData(
            "series palette must contain at least one color".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SERIES_COLORS, SharedPalette};
    use crate::core::Color;

    #[test]
    fn source_is_created_on_first_draw_only() {
        let palette = SharedPalette::with_seed(DEFAULT_SERIES_COLORS.to_vec(), 7).expect("palette");
        assert!(!palette.is_source_initialized());

        let _ = palette.next_starting_index();
        assert!(palette.is_source_initialized());
    }

    #[test]
    fn consecutive_draws_never_repeat_the_previous_start() {
        let palette = SharedPalette::with_seed(
            vec![Color::rgb(0, 0, 0), Color::rgb(255, 255, 255)],
            42,
        )
        .expect("palette");

        let mut previous = palette.next_starting_index();
        for _ in 0..32 {
            let next = palette.next_starting_index();
            assert_ne!(next, previous);
            assert!(next < 2);
            previous = next;
        }
    }

    #[test]
    fn single_color_palette_always_starts_at_zero() {
        let palette = SharedPalette::new(vec![Color::rgb(1, 2, 3)]).expect("palette");
        assert_eq!(palette.next_starting_index(), 0);
        assert_eq!(palette.next_starting_index(), 0);
        assert!(!palette.is_source_initialized());
    }

    #[test]
    fn empty_palettes_are_rejected() {
        assert!(SharedPalette::new(Vec::new()).is_err());
        let palette = SharedPalette::default();
        assert!(palette.set_colors(Vec::new()).is_err());
        assert_eq!(palette.len(), DEFAULT_SERIES_COLORS.len());
    }

    #[test]
    fn color_lookup_wraps_around() {
        let palette = SharedPalette::new(vec![Color::rgb(1, 0, 0), Color::rgb(0, 1, 0)])
            .expect("palette");
        assert_eq!(palette.color_for(3), Color::rgb(0, 1, 0));
    }

    #[test]
    fn global_palette_is_one_shared_instance() {
        let first = SharedPalette::global();
        let second = SharedPalette::global();
        assert!(std::sync::Arc::ptr_eq(&first.state, &second.state));
    }
}
