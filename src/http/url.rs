//! Target URL composition.

/// Returns true when `path` carries its own `http://` or `https://` scheme.
fn is_absolute(path: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        path.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Joins `path` onto `base_address` with exactly one `/` between them.
///
/// Absolute paths are returned untouched and the base is ignored. Without a
/// base (or with an empty one) the path is returned as given.
pub fn build_url(path: &str, base_address: Option<&str>) -> String {
    if is_absolute(path) {
        return path.to_string();
    }

    match base_address {
        Some(base) if !base.is_empty() => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ),
        _ => path.to_string(),
    }
}
