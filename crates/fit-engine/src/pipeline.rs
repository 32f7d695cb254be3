use fxhash::FxHashMap;

use fit_core::error::FitResult;
use fit_core::points::PointSet;
use fit_core::transform::Affine3x4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotMode {
    Line,
    Scatter,
}

/// A rendered time series: frame indices on x, one cache snapshot on y.
/// NaN y-entries are frames not yet computed.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub identifier: String,
    pub title: String,
    pub plot_mode: PlotMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// One frame's particle data at the pipeline boundary: the point set plus
/// the per-point property, scalar attribute, and table surfaces the engine
/// writes into.
#[derive(Debug, Clone, Default)]
pub struct ParticleFrame {
    pub points: PointSet,
    pub properties: FxHashMap<String, Vec<f64>>,
    pub attributes: FxHashMap<String, f64>,
    pub tables: FxHashMap<String, DataTable>,
}

impl ParticleFrame {
    pub fn new(points: PointSet) -> Self {
        Self {
            points,
            properties: FxHashMap::default(),
            attributes: FxHashMap::default(),
            tables: FxHashMap::default(),
        }
    }

    /// Applies a 3x4 affine to every point position in place.
    pub fn apply_affine(&mut self, transform: &Affine3x4) {
        for p in self.points.positions.iter_mut() {
            *p = transform.apply(*p);
        }
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: f64) {
        self.attributes.insert(key.into(), value);
    }

    pub fn set_property(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.properties.insert(name.into(), values);
    }

    pub fn add_table(&mut self, table: DataTable) {
        self.tables.insert(table.identifier.clone(), table);
    }
}

/// The host pipeline's frame-evaluation capability: trajectory length and
/// on-demand access to any frame's fully evaluated point data. The engine
/// uses it to fetch the configured reference frame.
pub trait FrameSource {
    fn n_frames(&self) -> usize;
    fn compute(&self, frame: usize) -> FitResult<ParticleFrame>;
}
