//! Persist level records.
//!
//! The generator hands finished [`LevelRecord`] objects to a [`LevelStore`]. The store used by
//! the command line, [`JsonDirStore`], writes one pretty-printed JSON file per level, named
//! after the level id.

use log::debug;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::GeneratorResult;
use crate::level::LevelRecord;

/// Somewhere level records can be saved to and read back from, keyed by level id.
pub trait LevelStore {
    fn save(&self, record: &LevelRecord) -> GeneratorResult<()>;

    fn load(&self, id: &str) -> GeneratorResult<LevelRecord>;
}

/// Stores each level as `level_<id>.json` in a directory.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("level_{id}.json"))
    }
}

impl LevelStore for JsonDirStore {
    fn save(&self, record: &LevelRecord) -> GeneratorResult<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(&record.id);
        debug!("Writing {}", path.display());
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn load(&self, id: &str) -> GeneratorResult<LevelRecord> {
        let reader = BufReader::new(File::open(self.path_for(id))?);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;
    use crate::level::generate_level;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "water_sort_levels_{name}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn saves_and_loads_a_level() {
        let dir = scratch_dir("roundtrip");
        let store = JsonDirStore::new(&dir);
        let record = generate_level(12).unwrap();
        store.save(&record).unwrap();

        let path = store.path_for("012");
        assert!(path.ends_with("level_012.json"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains("\n  \"title\": "));
        assert!(text.contains("\"moves_limit\": null"));
        assert_eq!(store.load("012").unwrap(), record);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_level_is_an_io_error() {
        let store = JsonDirStore::new(scratch_dir("missing"));
        assert!(matches!(store.load("999"), Err(GeneratorError::Io(_))));
    }

    #[test]
    fn unknown_colors_fail_to_load() {
        let dir = scratch_dir("badcolor");
        fs::create_dir_all(&dir).unwrap();
        let store = JsonDirStore::new(&dir);
        fs::write(
            store.path_for("001"),
            r#"{"id":"001","title":"t","tube_capacity":4,"tubes":[["ochre"]],"moves_limit":null,"hints":1}"#,
        )
        .unwrap();
        assert!(matches!(store.load("001"), Err(GeneratorError::Serde(_))));
        fs::remove_dir_all(&dir).unwrap();
    }
}
