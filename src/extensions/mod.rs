mod presenters;

pub use presenters::{LegendPresenter, TooltipPresenter};
