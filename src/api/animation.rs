use chrono::TimeDelta;

/// Derives the redraw cadence handed to the engine from the configured speed
/// and the disable flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrequencyController {
    configured_speed: Option<TimeDelta>,
    disabled: bool,
    engine_default: TimeDelta,
}

impl AnimationFrequencyController {
    /// `engine_default` is used while no speed is configured; negative
    /// defaults are clamped to zero.
    #[must_use]
    pub fn new(engine_default: TimeDelta) -> Self {
        Self {
            configured_speed: None,
            disabled: false,
            engine_default: engine_default.max(TimeDelta::zero()),
        }
    }

    /// Applies both inputs. Returns `true` when the effective cadence changed.
    pub fn sync(&mut self, configured_speed: Option<TimeDelta>, disabled: bool) -> bool {
        let before = self.effective_cadence();
        self.configured_speed = configured_speed;
        self.disabled = disabled;
        before != self.effective_cadence()
    }

    /// Zero whenever animations are disabled, otherwise the configured speed
    /// or the engine default.
    #[must_use]
    pub fn effective_cadence(&self) -> TimeDelta {
        if self.disabled {
            return TimeDelta::zero();
        }
        self.configured_speed.unwrap_or(self.engine_default)
    }

    #[must_use]
    pub fn configured_speed(&self) -> Option<TimeDelta> {
        self.configured_speed
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[must_use]
    pub fn engine_default(&self) -> TimeDelta {
        self.engine_default
    }
}
