//! Binary package integrity checks.

use std::path::Path;

/// Names from `required` that do not exist as files under `bins_root`.
///
/// A missing `bins_root` reports every required file.
pub fn missing_files<'a>(
    bins_root: &'a Path,
    required: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    required
        .iter()
        .filter(move |name| !bins_root.join(name).is_file())
        .map(|name| name.to_string())
}
