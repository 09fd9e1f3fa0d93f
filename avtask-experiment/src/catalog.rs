use std::fs;
use std::path::Path;

use crate::error::{ExperimentError, ExperimentResult};

/// Trial folders available in one category folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPool {
    pub name: String,
    pub trials: Vec<String>,
}

impl CategoryPool {
    pub fn new(name: impl Into<String>, trials: Vec<String>) -> Self {
        Self {
            name: name.into(),
            trials,
        }
    }
}

/// Lists the category folders under `root` and the trial folders in each,
/// both ordered by name. Plain files at either level are skipped.
pub fn scan_categories(root: &Path) -> ExperimentResult<Vec<CategoryPool>> {
    let mut pools = Vec::new();
    for name in subdirectories(root)? {
        let trials = subdirectories(&root.join(&name))?;
        println!("Category {}: {} trials", name, trials.len());
        pools.push(CategoryPool::new(name, trials));
    }
    Ok(pools)
}

fn subdirectories(dir: &Path) -> ExperimentResult<Vec<String>> {
    let io_err = |source| ExperimentError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Names of the plain files in `dir`, ordered by name.
pub fn list_files(dir: &Path) -> ExperimentResult<Vec<String>> {
    let io_err = |source| ExperimentError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
