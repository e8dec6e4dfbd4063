use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expands the input paths into the list of pattern files to translate.
/// Files are taken as given, directories contribute their direct entries whose
/// extension matches, sorted by name. Input order is kept otherwise.
/// @paths: Files and directories named on the command line
/// @extension: Extension of pattern files, without the leading dot
/// @return: Pattern files, or the I/O error of the first unreadable path
pub fn discover_sources(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>, (PathBuf, std::io::Error)> {
    let mut sources = vec![];

    for path in paths {
        let metadata = fs::metadata(path).map_err(|error| (path.clone(), error))?;
        if !metadata.is_dir() {
            sources.push(path.clone());
            continue;
        }

        let mut found = vec![];
        for entry in fs::read_dir(path).map_err(|error| (path.clone(), error))? {
            let entry_path = entry.map_err(|error| (path.clone(), error))?.path();
            if entry_path.is_file() && has_extension(&entry_path, extension) {
                found.push(entry_path);
            }
        }
        found.sort();
        debug!("Found {} pattern files in {}", found.len(), path.display());
        sources.extend(found);
    }

    Ok(sources)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|found| found.to_string_lossy() == extension.trim_start_matches('.'))
        .unwrap_or(false)
}
