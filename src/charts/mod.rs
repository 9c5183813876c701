//! Charts module - Static chart rendering

mod plotter;
mod renderer;

pub use plotter::{PlotError, Plotter};
pub use renderer::StaticChartRenderer;
