pub mod cache;
pub mod config;
pub mod modifier;
pub mod namespace;
pub mod pipeline;

pub use cache::{RmsdSeriesCache, SeriesKind};
pub use config::FitConfig;
pub use modifier::{FitModifier, BASE_NAME};
pub use pipeline::{DataTable, FrameSource, ParticleFrame, PlotMode};

#[cfg(test)]
mod tests;
