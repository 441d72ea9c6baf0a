use super::*;
use std::fs;
use std::fs::File;
use std::io::prelude::*;
use std::path::PathBuf;

pub fn with_default_test_directory<F>(test_method: F)
where
    F: Fn(&PathBuf),
{
    let test_dir_name = "./test_output/output".to_owned() + &random_string();
    with_test_directory(&PathBuf::from(test_dir_name), test_method);
}

pub fn with_test_directory<F>(test_dir: &PathBuf, test_method: F)
where
    F: Fn(&PathBuf),
{
    // Make sure test directory exists and is empty
    if test_dir.is_dir() {
        fs::remove_dir_all(test_dir).unwrap();
    }
    fs::create_dir_all(test_dir).unwrap();
    assert_eq!(test_dir.is_dir(), true);

    test_method(test_dir);

    // Clean up
    fs::remove_dir_all(test_dir).unwrap();
}

// Creates parent directories as needed, so tests can lay out a vault tree in
// one call per file.
pub fn write_test_file(path: &PathBuf, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut file = File::create(path).unwrap();
    file.write_all(contents).unwrap();
    assert_eq!(path.is_file(), true);
}

pub fn test_sync_context(source_root: &PathBuf, dest_root: &PathBuf, dry_run: bool) -> SyncContext {
    SyncContext {
        source_root: source_root.clone(),
        dest_root: dest_root.clone(),
        assets_dir: dest_root.join("public"),
        dry_run,
    }
}

pub fn random_string() -> String {
    let random_number = rand::random::<u32>();
    random_number.to_string()
}
