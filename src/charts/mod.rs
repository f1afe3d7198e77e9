//! Charts module - Static chart rendering

mod format;
mod renderer;
mod style;

pub use renderer::StaticChartRenderer;
