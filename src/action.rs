use std::fs;
use std::path::PathBuf;

use filetime::FileTime;

use context::SyncContext;
use error::*;

pub trait SyncAction {
    fn create_task<'a>(&self, file: PathBuf) -> SyncTask<'a>;
}

pub struct SyncTask<'a> {
    task: Box<dyn FnMut(&SyncContext) -> Result<()> + 'a>
}

impl<'a> SyncTask<'a> {
    pub fn execute(mut self, context: &SyncContext) -> Result<()> {
        let task_function: &mut dyn FnMut(&SyncContext) -> Result<()> = &mut *self.task;
        task_function(context)
    }

    pub fn new<T>(task_function: T) -> SyncTask<'a> where T: FnMut(&SyncContext) -> Result<()> + 'a {
        SyncTask { task: Box::new(task_function) }
    }
}

/// Copies a note into its mapped directory under the destination root,
/// keeping the sub-path below the vault's top-level folder.
pub struct NoteCopyAction {
    relative_destination: PathBuf
}

impl NoteCopyAction {
    pub fn new(relative_destination: PathBuf) -> NoteCopyAction {
        NoteCopyAction { relative_destination }
    }
}

impl SyncAction for NoteCopyAction {
    fn create_task<'a>(&self, file: PathBuf) -> SyncTask<'a> {
        let relative_destination = self.relative_destination.clone();
        let task = move |context: &SyncContext| {
            let output_directory = context.dest_root.join(&relative_destination);
            copy_into_directory(&file, &output_directory, context, "note")
        };

        SyncTask::new(task)
    }
}

/// Copies an image into the flat assets directory, dropping its sub-path.
pub struct ImageCopyAction;

impl SyncAction for ImageCopyAction {
    fn create_task<'a>(&self, file: PathBuf) -> SyncTask<'a> {
        let task = move |context: &SyncContext| {
            let output_directory = context.assets_dir.clone();
            copy_into_directory(&file, &output_directory, context, "image")
        };

        SyncTask::new(task)
    }
}

fn copy_into_directory(file: &PathBuf, output_directory: &PathBuf, context: &SyncContext,
                       label: &str) -> Result<()> {
    ensure_directory(output_directory, context.dry_run)?;
    let file_name = match file.file_name() {
        Some(name) => name,
        None => bail!("Internal failure: File {} does not have a file name. This is a bug.", file.to_string_lossy())
    };
    let destination: PathBuf = output_directory.join(file_name);
    info!("[{}] {} -> {}", label, file.to_string_lossy(), destination.to_string_lossy());
    if !context.dry_run {
        copy_with_metadata(file, &destination)?;
    }

    Ok(())
}

pub fn ensure_directory(directory: &PathBuf, dry_run: bool) -> Result<()> {
    if !directory.is_dir() {
        info!("Creating destination directory: {}", directory.to_string_lossy());
        if !dry_run {
            fs::create_dir_all(directory)
                .chain_err(|| format!("Unable to create destination directory: {}",
                                      directory.to_string_lossy()))?
        }
    }

    Ok(())
}

/// Overwrites `destination` with the content of `source` and carries the
/// source's access and modification times over.
fn copy_with_metadata(source: &PathBuf, destination: &PathBuf) -> Result<()> {
    fs::copy(source, destination)
        .chain_err(|| format!("Unable to copy file {} to destination {}", source.to_string_lossy(),
                              destination.to_string_lossy()))?;
    let metadata = fs::metadata(source)
        .chain_err(|| format!("Unable to read metadata of file {}", source.to_string_lossy()))?;
    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    ::filetime::set_file_times(destination, atime, mtime)
        .chain_err(|| format!("Unable to set timestamps on file {}", destination.to_string_lossy()))?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use testutils::*;

    #[test]
    fn note_copy_task_creates_output_directory_and_copies() {
        let action = NoteCopyAction::new(PathBuf::from("algo").join("STL"));
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("vector.md");
            write_test_file(&source_file, b"# vector\n");
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(source_file.clone());
            task.execute(&context).unwrap();

            let copied = dest_root.join("algo").join("STL").join("vector.md");
            assert_eq!(copied.is_file(), true);
            assert_eq!(fs::read(&copied).unwrap(), b"# vector\n");
        });
    }

    #[test]
    fn note_copy_task_overwrites_existing_file() {
        let action = NoteCopyAction::new(PathBuf::from("algo"));
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("sort.md");
            write_test_file(&source_file, b"new content");
            let dest_root = test_directory.join("site");
            write_test_file(&dest_root.join("algo").join("sort.md"), b"old content");
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(source_file.clone());
            task.execute(&context).unwrap();

            let copied = dest_root.join("algo").join("sort.md");
            assert_eq!(fs::read(&copied).unwrap(), b"new content");
        });
    }

    #[test]
    fn note_copy_task_preserves_modification_time() {
        let action = NoteCopyAction::new(PathBuf::from("algo"));
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("sort.md");
            write_test_file(&source_file, b"content");
            let old_mtime = FileTime::from_unix_time(1_000_000_000, 0);
            ::filetime::set_file_mtime(&source_file, old_mtime).unwrap();
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(source_file.clone());
            task.execute(&context).unwrap();

            let copied_metadata =
                fs::metadata(dest_root.join("algo").join("sort.md")).unwrap();
            assert_eq!(FileTime::from_last_modification_time(&copied_metadata), old_mtime);
        });
    }

    #[test]
    fn note_copy_task_dry_run_mutates_nothing() {
        let action = NoteCopyAction::new(PathBuf::from("algo"));
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("sort.md");
            write_test_file(&source_file, b"content");
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, true);

            let task = action.create_task(source_file.clone());
            task.execute(&context).unwrap();

            assert_eq!(dest_root.join("algo").is_dir(), false);
        });
    }

    #[test]
    fn note_copy_task_file_has_no_file_name() {
        let action = NoteCopyAction::new(PathBuf::from("algo"));
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("sort.md");
            write_test_file(&source_file, b"content");
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(source_file.join(PathBuf::from("..")));
            let result = task.execute(&context);
            assert_eq!(result.is_err(), true);
        });
    }

    #[test]
    fn note_copy_task_missing_source_file() {
        let action = NoteCopyAction::new(PathBuf::from("algo"));
        with_default_test_directory(|test_directory| {
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(test_directory.join("does-not-exist.md"));
            let result = task.execute(&context);
            assert_eq!(result.is_err(), true);
        });
    }

    #[test]
    fn image_copy_task_flattens_into_assets_directory() {
        let action = ImageCopyAction;
        with_default_test_directory(|test_directory| {
            let source_file = test_directory.join("deep").join("nested").join("diagram.png");
            write_test_file(&source_file, b"png bytes");
            let dest_root = test_directory.join("site");
            fs::create_dir_all(&dest_root).unwrap();
            let context = test_sync_context(test_directory, &dest_root, false);

            let task = action.create_task(source_file.clone());
            task.execute(&context).unwrap();

            let copied = context.assets_dir.join("diagram.png");
            assert_eq!(copied.is_file(), true);
            assert_eq!(fs::read(&copied).unwrap(), b"png bytes");
        });
    }

    #[test]
    fn ensure_directory_is_idempotent() {
        with_default_test_directory(|test_directory| {
            let directory = test_directory.join("made");
            ensure_directory(&directory, false).unwrap();
            assert_eq!(directory.is_dir(), true);
            ensure_directory(&directory, false).unwrap();
            assert_eq!(directory.is_dir(), true);
        });
    }

    #[test]
    fn ensure_directory_dry_run_does_not_create() {
        with_default_test_directory(|test_directory| {
            let directory = test_directory.join("not-made");
            ensure_directory(&directory, true).unwrap();
            assert_eq!(directory.is_dir(), false);
        });
    }
}
