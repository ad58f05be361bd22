use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub fn atomic_save_json<T: Serialize>(path: &Path, object: &T) -> Result<(), FileOperationError> {
    let af = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
    af.write(|f| serde_json::to_writer_pretty(BufWriter::new(f), object))?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileOperationError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data = serde_json::from_reader(reader)?;
    Ok(data)
}

#[derive(Debug, Error)]
pub enum FileOperationError {
    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    AtomicWriteSerdeJsonError(#[from] atomicwrites::Error<serde_json::Error>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        limit: usize,
    }

    #[test]
    fn test_atomic_save_then_read_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.json");
        let sample = Sample { name: "body".to_string(), limit: 16 };

        atomic_save_json(&path, &sample).unwrap();
        let loaded: Sample = read_json(&path).unwrap();
        assert_eq!(loaded, sample);

        // overwrite keeps the latest content
        let updated = Sample { name: "title".to_string(), limit: 4 };
        atomic_save_json(&path, &updated).unwrap();
        assert_eq!(read_json::<Sample>(&path).unwrap(), updated);
    }

    #[test]
    fn test_read_json_errors() {
        let dir = TempDir::new().unwrap();

        let missing = read_json::<Sample>(&dir.path().join("missing.json"));
        assert!(matches!(missing, Err(FileOperationError::IoError(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(read_json::<Sample>(&broken), Err(FileOperationError::SerdeJsonError(_))));
    }
}
