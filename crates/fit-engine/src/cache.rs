use std::sync::{Mutex, PoisonError, RwLock};

use fxhash::FxHashMap;

use fit_core::error::{FitError, FitResult};

/// The three parallel series kept per result family. `RmsdPrev` is part of
/// the output layout but no evaluation path writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Rmsd,
    RmsdPrev,
    RmsdAll,
}

#[derive(Debug)]
struct Family {
    rmsd: Vec<f64>,
    rmsd_prev: Vec<f64>,
    rmsd_all: Vec<f64>,
}

impl Family {
    fn new(len: usize) -> Self {
        Self {
            rmsd: vec![f64::NAN; len],
            rmsd_prev: vec![f64::NAN; len],
            rmsd_all: vec![f64::NAN; len],
        }
    }

    fn grow(&mut self, len: usize) {
        if len > self.rmsd.len() {
            self.rmsd.resize(len, f64::NAN);
            self.rmsd_prev.resize(len, f64::NAN);
            self.rmsd_all.resize(len, f64::NAN);
        }
    }

    fn series(&self, kind: SeriesKind) -> &Vec<f64> {
        match kind {
            SeriesKind::Rmsd => &self.rmsd,
            SeriesKind::RmsdPrev => &self.rmsd_prev,
            SeriesKind::RmsdAll => &self.rmsd_all,
        }
    }

    fn series_mut(&mut self, kind: SeriesKind) -> &mut Vec<f64> {
        match kind {
            SeriesKind::Rmsd => &mut self.rmsd,
            SeriesKind::RmsdPrev => &mut self.rmsd_prev,
            SeriesKind::RmsdAll => &mut self.rmsd_all,
        }
    }
}

/// Frame-indexed error-series store. Entries start as NaN ("not yet
/// computed") and are overwritten one index at a time as frames are
/// visited, in any order. State here is the only thing that outlives a
/// single frame evaluation; the host owns the cache object.
///
/// Families sit behind their own locks, so writes to two frames of
/// different families and snapshot reads may proceed concurrently.
#[derive(Debug, Default)]
pub struct RmsdSeriesCache {
    families: RwLock<FxHashMap<String, Mutex<Family>>>,
}

impl RmsdSeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently allocates the three series under `family`. A later call
    /// with a larger length grows the arrays with NaN fill, preserving
    /// every written entry; arrays are never shrunk.
    pub fn ensure(&self, family: &str, trajectory_len: usize) {
        let mut map = self
            .families
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = map.get_mut(family) {
            entry
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner)
                .grow(trajectory_len);
        } else {
            map.insert(family.to_string(), Mutex::new(Family::new(trajectory_len)));
        }
    }

    /// Writes `value` at `index`, overwriting any prior value.
    pub fn set(&self, family: &str, kind: SeriesKind, index: usize, value: f64) -> FitResult<()> {
        let map = self.families.read().unwrap_or_else(PoisonError::into_inner);
        let entry = map
            .get(family)
            .ok_or_else(|| FitError::Invalid(format!("unknown series family '{family}'")))?;
        let mut fam = entry.lock().unwrap_or_else(PoisonError::into_inner);
        let series = fam.series_mut(kind);
        let slot = series.get_mut(index).ok_or_else(|| {
            FitError::Invalid(format!(
                "frame index {index} out of range for series family '{family}'"
            ))
        })?;
        *slot = value;
        Ok(())
    }

    /// Full-length copy of one series. NaN entries mean "not yet computed"
    /// and must be rendered as missing data, never as zero.
    pub fn snapshot(&self, family: &str, kind: SeriesKind) -> FitResult<Vec<f64>> {
        let map = self.families.read().unwrap_or_else(PoisonError::into_inner);
        let entry = map
            .get(family)
            .ok_or_else(|| FitError::Invalid(format!("unknown series family '{family}'")))?;
        let fam = entry.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(fam.series(kind).clone())
    }

    pub fn contains(&self, family: &str) -> bool {
        self.families
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(family)
    }
}
