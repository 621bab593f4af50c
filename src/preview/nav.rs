//! Directory navigation bar.
//!
//! `/a/b/c` becomes `/`, `a/`, `b/`, `c`: every ancestor is clickable and
//! navigates to its own prefix, the last segment is the current file.

use crate::view::Breadcrumb;

/// Breadcrumbs for `cwd`, root first. Empty for an empty path.
pub fn breadcrumbs(cwd: &str) -> Vec<Breadcrumb> {
    if cwd.is_empty() {
        return Vec::new();
    }
    let trimmed = cwd.trim_end_matches('/');
    if trimmed.is_empty() {
        return vec![Breadcrumb {
            label: "/".to_string(),
            path: "/".to_string(),
            clickable: false,
        }];
    }

    let mut prefixes = vec![trimmed];
    let mut remaining = trimmed;
    while let Some(idx) = remaining.rfind('/') {
        remaining = &remaining[..idx];
        prefixes.push(remaining);
    }
    prefixes.reverse();

    let last = prefixes.len() - 1;
    prefixes
        .into_iter()
        .enumerate()
        .map(|(idx, prefix)| {
            let base = prefix.rsplit('/').next().unwrap_or(prefix);
            let is_last = idx == last;
            Breadcrumb {
                label: if is_last {
                    base.to_string()
                } else {
                    format!("{base}/")
                },
                path: if prefix.is_empty() {
                    "/".to_string()
                } else {
                    prefix.to_string()
                },
                clickable: !is_last,
            }
        })
        .collect()
}
