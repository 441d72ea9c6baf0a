use std::path::{Component, Path, PathBuf};

use error::*;

/// Extensions treated as image assets. Matched case-insensitively, unlike
/// note detection which requires a literal `md` extension.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileKind {
    Note,
    Image,
    Other,
}

pub fn classify(file: &Path) -> FileKind {
    let extension = match file.extension() {
        Some(extension) => extension.to_string_lossy(),
        None => return FileKind::Other,
    };
    if extension == "md" {
        FileKind::Note
    } else if IMAGE_EXTENSIONS.contains(&extension.to_lowercase().as_str()) {
        FileKind::Image
    } else {
        FileKind::Other
    }
}

/// A single file seen during the walk, decomposed relative to the source
/// root. `top_level` is `None` for files directly at the root, which can
/// therefore never match a folder mapping.
pub struct FileEntry {
    pub kind: FileKind,
    pub top_level: Option<String>,
    pub sub_path: PathBuf,
}

impl FileEntry {
    pub fn from_path(file: &PathBuf, source_root: &PathBuf) -> Result<FileEntry> {
        let relative = file.strip_prefix(source_root).chain_err(|| {
            format!(
                "File {} is not under source root {}",
                file.to_string_lossy(),
                source_root.to_string_lossy()
            )
        })?;
        let parent = relative.parent().unwrap_or(Path::new(""));

        let mut components = parent.components();
        let top_level = match components.next() {
            Some(Component::Normal(name)) => Some(name.to_string_lossy().into_owned()),
            Some(_) => bail!(
                "Relative path {} has a non-normal leading component. This is a bug.",
                relative.to_string_lossy()
            ),
            None => None,
        };
        let sub_path: PathBuf = components.map(|component| component.as_os_str()).collect();

        Ok(FileEntry {
            kind: classify(file),
            top_level,
            sub_path,
        })
    }
}
