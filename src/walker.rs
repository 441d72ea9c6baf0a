use std::fs;
use std::path::PathBuf;

use action::{ensure_directory, ImageCopyAction, NoteCopyAction, SyncAction, SyncTask};
use context::SyncContext;
use entry::{FileEntry, FileKind};
use error::*;
use mapping::FolderMapping;

#[derive(Debug, PartialEq)]
pub struct SyncSummary {
    pub notes: usize,
    pub images: usize,
}

/// One-shot sync run: validate the roots, make sure the assets directory
/// exists, then walk the source tree and copy every eligible file. The first
/// task failure aborts the remainder; files already copied stay in place.
pub fn sync(mapping: &FolderMapping, context: &SyncContext) -> Result<SyncSummary> {
    if !context.source_root.is_dir() {
        bail!("Source directory {} does not exist", context.source_root.to_string_lossy());
    }
    if !context.dest_root.is_dir() {
        bail!("Destination directory {} does not exist", context.dest_root.to_string_lossy());
    }

    ensure_directory(&context.assets_dir, context.dry_run)?;

    let file_paths: Vec<PathBuf> = collect_files(&context.source_root)?;

    let (tasks, summary) = determine_tasks(mapping, &file_paths, context)?;

    execute_tasks(tasks, context)?;

    Ok(summary)
}

// Stops at the first failure; copies made by earlier tasks stay in place.
pub fn execute_tasks(mut tasks: Vec<SyncTask>, context: &SyncContext) -> Result<()> {
    while let Some(task) = tasks.pop() {
        task.execute(context)?;
    }

    Ok(())
}

pub fn collect_files(directory: &PathBuf) -> Result<Vec<PathBuf>> {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    collect_files_into(directory, &mut file_paths)?;

    Ok(file_paths)
}

fn collect_files_into(directory: &PathBuf, file_paths: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(directory).chain_err(|| {
        format!(
            "Unable to read entries of directory {}",
            directory.to_string_lossy()
        )
    })? {
        let dir_entry = entry.chain_err(|| {
            format!(
                "Unable to read entry of directory {}",
                directory.to_string_lossy()
            )
        })?;
        let file_path = dir_entry.path();
        if file_path.is_dir() {
            collect_files_into(&file_path, file_paths)?;
        } else if file_path.is_file() {
            trace!("Regular file: {}", file_path.to_string_lossy());
            file_paths.push(file_path);
        } else {
            trace!("Not a file: {}", file_path.to_string_lossy());
        }
    }

    Ok(())
}

pub fn determine_tasks<'a>(
    mapping: &FolderMapping,
    files: &Vec<PathBuf>,
    context: &SyncContext,
) -> Result<(Vec<SyncTask<'a>>, SyncSummary)> {
    let mut tasks: Vec<SyncTask<'a>> = Vec::new();
    let mut summary = SyncSummary { notes: 0, images: 0 };
    for file_path in files {
        let entry = FileEntry::from_path(file_path, &context.source_root)?;
        match entry.kind {
            FileKind::Note => match note_destination(mapping, &entry) {
                Some(relative_destination) => {
                    tasks.push(NoteCopyAction::new(relative_destination).create_task(file_path.clone()));
                    summary.notes += 1;
                }
                None => debug!("No folder mapping for note: {}", file_path.to_string_lossy()),
            },
            FileKind::Image => {
                tasks.push(ImageCopyAction.create_task(file_path.clone()));
                summary.images += 1;
            }
            FileKind::Other => trace!("Ignoring file: {}", file_path.to_string_lossy()),
        }
    }

    Ok((tasks, summary))
}

// A note at the source root has no top-level folder and can never be mapped.
fn note_destination(mapping: &FolderMapping, entry: &FileEntry) -> Option<PathBuf> {
    match entry.top_level {
        Some(ref top_level) => mapping
            .lookup(top_level)
            .map(|mapped| PathBuf::from(mapped).join(&entry.sub_path)),
        None => None,
    }
}
