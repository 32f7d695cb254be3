/// Claims a result namespace unique among engine instances sharing one
/// pipeline. The existing attribute keys are the only evidence of sibling
/// instances, so this runs on every evaluation.
///
/// Keys beginning with `base` contribute the integer value of their final
/// `.`-segment when it parses, and `0` otherwise. No matching key yields
/// the bare base name; otherwise the suffix is one past the maximum seen,
/// giving the `base`, `base.1`, `base.2`, ... sequence.
pub fn claim<'a, I>(base: &str, keys: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max_suffix: Option<u32> = None;
    for key in keys {
        let Some(rest) = key.strip_prefix(base) else {
            continue;
        };
        if !rest.is_empty() && !rest.starts_with('.') {
            continue;
        }
        let suffix = key
            .rsplit('.')
            .next()
            .and_then(|tail| tail.parse::<u32>().ok())
            .unwrap_or(0);
        max_suffix = Some(max_suffix.map_or(suffix, |seen| seen.max(suffix)));
    }
    match max_suffix {
        None => base.to_string(),
        Some(max) => format!("{base}.{}", max + 1),
    }
}
