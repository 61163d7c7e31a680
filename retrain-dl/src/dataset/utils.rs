use crate::common::*;

/// Finds all files matching `file_pattern` under `dir` and its
/// subdirectories.
pub fn find_files(dir: impl AsRef<Path>, file_pattern: &str, sort: bool) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/{}", dir.as_ref().display(), file_pattern);
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_ok(|path| path.is_file())
        .try_collect()?;
    if sort {
        files.sort();
    }
    Ok(files)
}

/// Maps class indexes to class directory names, in ascending name order.
pub fn classes_map(image_dir: impl AsRef<Path>) -> Result<IndexMap<usize, String>> {
    let image_dir = image_dir.as_ref();
    ensure!(
        image_dir.is_dir(),
        "image directory '{}' not found",
        image_dir.display()
    );

    let mut names: Vec<_> = fs::read_dir(image_dir)?
        .map(|entry| -> Result<_> {
            let entry = entry?;
            let path = entry.path();
            let name = path.is_dir().then(|| {
                entry
                    .file_name()
                    .into_string()
                    .map_err(|name| format_err!("non-unicode directory name {:?}", name))
            });
            name.transpose()
        })
        .flatten_ok()
        .try_collect::<_, Vec<_>, Error>()?;
    names.sort();

    Ok(names.into_iter().enumerate().collect())
}
