use std::{fs, io, path::Path};

/// Visits all files in a directory tree, calling the provided callback for each file.
pub fn walk_dir<F>(dir: &Path, callback: &mut F) -> io::Result<()>
where
    F: FnMut(&Path) -> io::Result<()>,
{
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            walk_dir(&path, callback)?;
        } else if path.is_file() {
            callback(&path)?;
        }
    }
    Ok(())
}

/// Sorted paths of all files under `dir` with the given extension,
/// relative to `base` and using `/` separators.
pub fn collect_files_with_extension(
    dir: &Path,
    base: &Path,
    extension: &str,
) -> io::Result<Vec<String>> {
    let mut paths = Vec::new();

    walk_dir(dir, &mut |path| {
        if path.extension().and_then(|e| e.to_str()) != Some(extension) {
            return Ok(());
        }
        let Ok(rel) = path.strip_prefix(base) else {
            return Ok(());
        };
        paths.push(rel.to_string_lossy().replace('\\', "/"));
        Ok(())
    })?;

    paths.sort();
    Ok(paths)
}
