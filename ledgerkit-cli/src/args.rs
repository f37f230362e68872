use std::ffi::OsString;

/// Rewrite single-dash long flags (`-fiscal 2024`, `-fiscal=2024`) into the
/// `--fiscal` form clap understands. Only the names in `long_flags` are touched.
pub fn normalize_single_dash(
    args: impl IntoIterator<Item = OsString>,
    long_flags: &[&str],
) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| {
            let Some(s) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = s.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(n, _)| n);
            if long_flags.contains(&name) {
                OsString::from(format!("-{s}"))
            } else {
                arg
            }
        })
        .collect()
}
