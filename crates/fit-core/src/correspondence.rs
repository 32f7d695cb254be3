use crate::error::{FitError, FitResult};
use crate::points::PointSet;

/// Resolves identifier correspondence between two point sets and returns
/// index-aligned position arrays in ascending-identifier order. Row `i` of
/// both outputs refers to the same identifier.
///
/// With `selected_only` set, both sets are first filtered to points whose
/// inclusion flag is set. The filtered identifier sets must match exactly;
/// a count or membership difference is a `CorrespondenceMismatch`.
pub fn resolve(
    current: &PointSet,
    reference: &PointSet,
    selected_only: bool,
) -> FitResult<(Vec<[f64; 3]>, Vec<[f64; 3]>)> {
    let cur_pairs = sorted_pairs(current, selected_only)?;
    let ref_pairs = sorted_pairs(reference, selected_only)?;
    if cur_pairs.len() != ref_pairs.len() {
        return Err(FitError::CorrespondenceMismatch(format!(
            "filtered point counts differ: {} vs {}",
            cur_pairs.len(),
            ref_pairs.len()
        )));
    }
    let mut pos_cur = Vec::with_capacity(cur_pairs.len());
    let mut pos_ref = Vec::with_capacity(ref_pairs.len());
    for (&(cur_id, cur_idx), &(ref_id, ref_idx)) in cur_pairs.iter().zip(ref_pairs.iter()) {
        if cur_id != ref_id {
            return Err(FitError::CorrespondenceMismatch(format!(
                "identifier {} has no counterpart",
                cur_id.min(ref_id)
            )));
        }
        pos_cur.push(current.positions[cur_idx]);
        pos_ref.push(reference.positions[ref_idx]);
    }
    Ok((pos_cur, pos_ref))
}

/// Whole-set correspondence via the container's identifier remap. Returns
/// pairs in the current set's native storage order: row `i` is the current
/// point `i` and the reference point sharing its identifier.
///
/// Agrees with [`resolve`] whenever identifiers are a total duplicate-free
/// labeling; the two only differ in output ordering.
pub fn resolve_with_remap(
    current: &PointSet,
    reference: &PointSet,
) -> FitResult<(Vec<[f64; 3]>, Vec<[f64; 3]>)> {
    let mapping = reference.remap_indices(current)?;
    let pos_ref = mapping
        .iter()
        .map(|&idx| reference.positions[idx])
        .collect();
    Ok((current.positions.clone(), pos_ref))
}

fn sorted_pairs(set: &PointSet, selected_only: bool) -> FitResult<Vec<(i64, usize)>> {
    let ids = set.ids()?;
    let included = set.included_indices(selected_only)?;
    let mut pairs: Vec<(i64, usize)> = included.into_iter().map(|idx| (ids[idx], idx)).collect();
    pairs.sort_unstable_by_key(|&(id, _)| id);
    for window in pairs.windows(2) {
        if window[0].0 == window[1].0 {
            return Err(FitError::CorrespondenceMismatch(format!(
                "duplicate identifier {}",
                window[0].0
            )));
        }
    }
    Ok(pairs)
}
