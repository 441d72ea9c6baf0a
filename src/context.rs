use std::path::PathBuf;

#[derive(Clone)]
pub struct SyncContext {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub assets_dir: PathBuf,
    pub dry_run: bool
}
