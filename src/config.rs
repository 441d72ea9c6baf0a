use std::path::PathBuf;

use error::*;

/// Default source/destination roots for a platform, standing in for the
/// hardcoded vault paths a user would otherwise edit into the script.
pub struct RootDefaults {
    pub source_root: &'static str,
    pub dest_root: &'static str,
}

/// Pure over the platform identifier so callers can inject one in tests;
/// production passes `std::env::consts::OS`.
pub fn platform_defaults(os: &str) -> Option<RootDefaults> {
    match os {
        "windows" => Some(RootDefaults {
            source_root: r"E:\notes\Public",
            dest_root: r"E:\sites\wiki",
        }),
        _ => None,
    }
}

pub fn resolve_roots(
    cli_source: Option<&str>,
    cli_dest: Option<&str>,
    os: &str,
) -> Result<(PathBuf, PathBuf)> {
    let defaults = platform_defaults(os);
    let source_root = resolve_root(
        cli_source,
        defaults.as_ref().map(|defaults| defaults.source_root),
        "source",
        os,
    )?;
    let dest_root = resolve_root(
        cli_dest,
        defaults.as_ref().map(|defaults| defaults.dest_root),
        "destination",
        os,
    )?;

    Ok((source_root, dest_root))
}

fn resolve_root(
    cli_value: Option<&str>,
    default_value: Option<&str>,
    which: &str,
    os: &str,
) -> Result<PathBuf> {
    match cli_value.or(default_value) {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!(
            "No {} directory given and no default exists for platform '{}'",
            which,
            os
        ),
    }
}
