use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    Ok(serde_json::from_reader(reader)?)
}

/// Writes `value` as pretty JSON into `out`, or to stdout when no file is given.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<(), anyhow::Error> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, value)?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use wayfarer_matrix_providers::distance_matrix::DistanceMatrix;

    use super::*;

    #[test]
    fn test_write_then_read_matrix() {
        let folder = tempfile::tempdir().unwrap();
        let path = folder.path().join("nested/matrix.json");
        let matrix = DistanceMatrix::from_rows(
            vec!["a".to_string(), "b".to_string()],
            vec![vec![0.0, 12.0], vec![15.0, 0.0]],
        )
        .unwrap();

        write_json(&matrix, Some(&path)).unwrap();
        let read: DistanceMatrix = read_json(&path).unwrap();

        assert_eq!(read, matrix);
        assert_eq!(read.get("b", "a"), Some(15.0));
    }

    #[test]
    fn test_read_missing_file() {
        let folder = tempfile::tempdir().unwrap();

        assert!(read_json::<DistanceMatrix>(&folder.path().join("missing.json")).is_err());
    }
}
