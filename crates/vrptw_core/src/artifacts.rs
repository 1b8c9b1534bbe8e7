use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use tracing::debug;

use crate::{aggregator::Solution, location::Location};

pub const INPUT_FILE: &str = "locations.csv";
pub const SOLUTION_FILE: &str = "solution.json";
pub const MAP_FILE: &str = "solution_map.html";

/// Temporary files for one solve attempt.
///
/// The directory and everything in it is removed when the scope is dropped.
#[derive(Debug)]
pub struct ArtifactScope {
    dir: TempDir,
}

impl ArtifactScope {
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("vrptw-").tempdir()?;
        debug!(path = %dir.path().display(), "created artifact scope");
        Ok(ArtifactScope { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn input_path(&self) -> PathBuf {
        self.dir.path().join(INPUT_FILE)
    }

    pub fn solution_path(&self) -> PathBuf {
        self.dir.path().join(SOLUTION_FILE)
    }

    pub fn map_path(&self) -> PathBuf {
        self.dir.path().join(MAP_FILE)
    }

    pub fn write_input(&self, locations: &[Location]) -> Result<PathBuf, csv::Error> {
        let path = self.input_path();
        let mut writer = csv::Writer::from_path(&path)?;
        for location in locations {
            writer.serialize(location)?;
        }
        writer.flush()?;

        Ok(path)
    }

    pub fn write_solution(&self, solution: &Solution) -> io::Result<PathBuf> {
        let path = self.solution_path();
        fs::write(&path, solution.to_json()?)?;

        Ok(path)
    }

    pub fn write_map(&self, html: &str) -> io::Result<PathBuf> {
        let path = self.map_path();
        fs::write(&path, html)?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::load_locations_from_path, test_utils::rochester_locations};

    #[test]
    fn test_input_reloads() {
        let scope = ArtifactScope::new().unwrap();
        let locations = rochester_locations(5);

        let path = scope.write_input(&locations).unwrap();

        assert_eq!(load_locations_from_path(&path, 0).unwrap(), locations);
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let scope = ArtifactScope::new().unwrap();
        scope.write_map("<html></html>").unwrap();
        let path = scope.path().to_path_buf();
        assert!(scope.map_path().exists());

        drop(scope);

        assert!(!path.exists());
    }

    #[test]
    fn test_directory_removed_on_early_return() {
        fn failing(scope_path: &mut Option<PathBuf>) -> io::Result<()> {
            let scope = ArtifactScope::new()?;
            *scope_path = Some(scope.path().to_path_buf());
            fs::read_to_string(scope.solution_path())?;
            Ok(())
        }

        let mut scope_path = None;
        assert!(failing(&mut scope_path).is_err());
        assert!(!scope_path.unwrap().exists());
    }
}
