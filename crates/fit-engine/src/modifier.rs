use tracing::debug;

use fit_core::correspondence;
use fit_core::deviation::{mean_squared_deviation, per_point_squared_deviation};
use fit_core::error::FitResult;
use fit_core::kabsch::{self, centroid};
use fit_core::transform::Affine3x4;

use crate::cache::{RmsdSeriesCache, SeriesKind};
use crate::config::FitConfig;
use crate::namespace;
use crate::pipeline::{DataTable, FrameSource, ParticleFrame, PlotMode};

/// Base result-key name. Sibling instances in one pipeline claim numeric
/// suffixes (`Fit`, `Fit.1`, `Fit.2`, ...) on top of it.
pub const BASE_NAME: &str = "Fit";

/// Superimposes each requested frame onto a fixed reference frame with the
/// optimal rigid-body transform and records the residual alignment error
/// per frame. Holds no cross-frame state of its own; everything persistent
/// lives in the host-owned [`RmsdSeriesCache`].
#[derive(Debug, Clone, Default)]
pub struct FitModifier {
    config: FitConfig,
    namespace: Option<String>,
}

impl FitModifier {
    pub fn new(config: FitConfig) -> Self {
        Self {
            config,
            namespace: None,
        }
    }

    /// Fixes the result namespace up front instead of deriving it from the
    /// attribute keys seen at evaluation time. Hosts able to hand out a
    /// stable instance identifier should prefer this.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Upstream frames the output for `frame` depends on, for host-side
    /// invalidation: the configured reference frame and the frame itself.
    pub fn input_caching_hints(&self, frame: usize) -> [usize; 2] {
        [self.config.reference_frame, frame]
    }

    /// Evaluates one frame: aligns `data` onto the reference frame in
    /// place, then writes error attributes, the per-point `RMSD` property,
    /// the cache entries for `frame`, and the two time-series tables.
    ///
    /// Any failure leaves the cache untouched for this frame; no partial
    /// or degraded result is ever produced.
    pub fn evaluate(
        &self,
        data: &mut ParticleFrame,
        frame: usize,
        source: &dyn FrameSource,
        cache: &RmsdSeriesCache,
    ) -> FitResult<()> {
        data.points.ensure_identifiers();
        let mut reference = source.compute(self.config.reference_frame)?;
        reference.points.ensure_identifiers();

        let selected_only = self.config.selected_only;
        let (pos_cur, pos_ref) =
            correspondence::resolve(&data.points, &reference.points, selected_only)?;
        let transform = kabsch::solve(&pos_cur, &pos_ref)?;
        debug!(frame, n_points = pos_cur.len(), "solved rigid alignment");

        // Rotate the whole frame about the origin, then translate so the
        // rotated subset centroid lands on the reference centroid. Net
        // effect: x' = R(x - c_cur) + c_ref.
        data.apply_affine(&Affine3x4::from_linear(transform.rotation));
        let (pos_rotated, _) =
            correspondence::resolve(&data.points, &reference.points, selected_only)?;
        let shift = transform.centroid_reference - centroid(&pos_rotated);
        data.apply_affine(&Affine3x4::from_translation(shift));

        let (pos_aligned, pos_ref) =
            correspondence::resolve(&data.points, &reference.points, selected_only)?;
        let rmsd = mean_squared_deviation(&pos_aligned, &pos_ref);

        let (pos_all, pos_all_ref) =
            correspondence::resolve_with_remap(&data.points, &reference.points)?;
        let per_point = per_point_squared_deviation(&pos_all, &pos_all_ref);
        let rmsd_all = mean_squared_deviation(&pos_all, &pos_all_ref);

        let namespace = match self.namespace.as_ref() {
            Some(fixed) => fixed.clone(),
            None => namespace::claim(BASE_NAME, data.attributes.keys().map(String::as_str)),
        };

        data.set_attribute(format!("{namespace}.RMSD"), rmsd);
        data.set_attribute(format!("{namespace}.RMSD_all"), rmsd_all);
        data.set_property("RMSD", per_point);

        let n_frames = source.n_frames();
        cache.ensure(&namespace, n_frames);
        cache.set(&namespace, SeriesKind::Rmsd, frame, rmsd)?;
        cache.set(&namespace, SeriesKind::RmsdAll, frame, rmsd_all)?;
        debug!(frame, %namespace, rmsd, rmsd_all, "recorded alignment error");

        let frame_axis: Vec<f64> = (0..n_frames).map(|idx| idx as f64).collect();
        data.add_table(DataTable {
            identifier: format!("{namespace}.RMSD"),
            title: format!("{BASE_NAME} RMSD"),
            plot_mode: PlotMode::Scatter,
            x: frame_axis.clone(),
            y: cache.snapshot(&namespace, SeriesKind::Rmsd)?,
        });
        data.add_table(DataTable {
            identifier: format!("{namespace}.RMSD_all"),
            title: format!("{BASE_NAME} RMSD All"),
            plot_mode: PlotMode::Scatter,
            x: frame_axis,
            y: cache.snapshot(&namespace, SeriesKind::RmsdAll)?,
        });
        Ok(())
    }
}
