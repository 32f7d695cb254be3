use fxhash::FxHashMap;

use crate::error::{FitError, FitResult};

/// Ordered point container: positions, stable identifiers, optional
/// per-point inclusion flag. Identifiers are expected to be unique within
/// one set; duplicates surface as correspondence errors when two sets are
/// paired.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    pub positions: Vec<[f64; 3]>,
    pub identifiers: Option<Vec<i64>>,
    pub selection: Option<Vec<bool>>,
}

impl PointSet {
    pub fn new(positions: Vec<[f64; 3]>) -> Self {
        Self {
            positions,
            identifiers: None,
            selection: None,
        }
    }

    pub fn with_identifiers(mut self, identifiers: Vec<i64>) -> Self {
        self.identifiers = Some(identifiers);
        self
    }

    pub fn with_selection(mut self, selection: Vec<bool>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Assigns identifiers `0..n` when none are present. No-op otherwise.
    pub fn ensure_identifiers(&mut self) {
        if self.identifiers.is_none() {
            self.identifiers = Some((0..self.positions.len() as i64).collect());
        }
    }

    pub fn ids(&self) -> FitResult<&[i64]> {
        let ids = self
            .identifiers
            .as_ref()
            .ok_or_else(|| FitError::Invalid("point set has no identifiers".into()))?;
        if ids.len() != self.positions.len() {
            return Err(FitError::Invalid(format!(
                "identifier count {} does not match point count {}",
                ids.len(),
                self.positions.len()
            )));
        }
        Ok(ids)
    }

    /// Indices of points participating under the inclusion mask. With
    /// `selected_only` unset the full set participates.
    pub fn included_indices(&self, selected_only: bool) -> FitResult<Vec<usize>> {
        if !selected_only {
            return Ok((0..self.positions.len()).collect());
        }
        let selection = self.selection.as_ref().ok_or_else(|| {
            FitError::MissingSelection("no selection defined on point data".into())
        })?;
        if selection.len() != self.positions.len() {
            return Err(FitError::Invalid(format!(
                "selection flag count {} does not match point count {}",
                selection.len(),
                self.positions.len()
            )));
        }
        Ok(selection
            .iter()
            .enumerate()
            .filter_map(|(idx, &flag)| flag.then_some(idx))
            .collect())
    }

    /// For each point of `other`, the index of the point in `self` with the
    /// same identifier. Both sets must carry the same duplicate-free
    /// identifier set.
    pub fn remap_indices(&self, other: &PointSet) -> FitResult<Vec<usize>> {
        if self.len() != other.len() {
            return Err(FitError::CorrespondenceMismatch(format!(
                "point counts differ: {} vs {}",
                self.len(),
                other.len()
            )));
        }
        let own_ids = self.ids()?;
        let mut by_id = FxHashMap::default();
        by_id.reserve(own_ids.len());
        for (idx, &id) in own_ids.iter().enumerate() {
            if by_id.insert(id, idx).is_some() {
                return Err(FitError::CorrespondenceMismatch(format!(
                    "duplicate identifier {id}"
                )));
            }
        }
        let mut mapping = Vec::with_capacity(other.len());
        let mut seen = vec![false; self.len()];
        for &id in other.ids()? {
            let &idx = by_id.get(&id).ok_or_else(|| {
                FitError::CorrespondenceMismatch(format!("identifier {id} has no counterpart"))
            })?;
            if seen[idx] {
                return Err(FitError::CorrespondenceMismatch(format!(
                    "duplicate identifier {id}"
                )));
            }
            seen[idx] = true;
            mapping.push(idx);
        }
        Ok(mapping)
    }
}
