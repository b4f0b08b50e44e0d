use crate::error::ChartResult;

use super::{CalculationEngine, PropertySnapshot};

/// Headless engine used by tests and hosts without a drawing layer.
///
/// It still validates every snapshot so tests catch inconsistent control
/// state before a real engine is attached.
#[derive(Debug, Default)]
pub struct NullEngine {
    pub update_count: usize,
    pub redraw_count: usize,
    pub last_snapshot: Option<PropertySnapshot>,
}

impl CalculationEngine for NullEngine {
    fn update(&mut self, snapshot: &PropertySnapshot) -> ChartResult<()> {
        snapshot.validate()?;
        self.update_count += 1;
        self.last_snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn redraw(&mut self, snapshot: &PropertySnapshot) -> ChartResult<()> {
        snapshot.validate()?;
        self.redraw_count += 1;
        self.last_snapshot = Some(snapshot.clone());
        Ok(())
    }
}
