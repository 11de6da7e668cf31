use crate::loader::error::LoadError;
use crate::utils::decode_text;
use log::{debug, info};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

/// Options controlling how a flat file is parsed into a frame.
#[derive(Debug, Clone, Default)]
pub struct CsvOptions {
    /// Rows used for schema inference. `Some(0)` reads every column as text.
    pub infer_schema_length: Option<usize>,
    /// Header names that must be present after parsing.
    pub required_columns: Vec<String>,
}

impl CsvOptions {
    pub fn new(required_columns: &[&str]) -> Self {
        Self {
            infer_schema_length: Some(10_000),
            required_columns: required_columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Reads every column as text, leaving type conversion to the caller.
    pub fn all_text(mut self) -> Self {
        self.infer_schema_length = Some(0);
        self
    }
}

pub struct DatasetLoader;

impl DatasetLoader {
    /// Reads a delimited text file with a header row into a `LazyFrame`.
    ///
    /// The file is decoded as UTF-8 or, when that fails, as Latin-1 before parsing, so
    /// headers and values with extended Latin characters load either way.
    pub fn load(path: &Path, options: &CsvOptions) -> Result<LazyFrame, LoadError> {
        let bytes =
            std::fs::read(path).map_err(|e| LoadError::FileRead(path.to_path_buf(), e))?;
        let df = Self::parse(decode_text(bytes), path, options)?;
        info!(
            "Loaded {} rows and {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        debug!("First rows of {}:\n{}", path.display(), df.head(Some(5)));
        debug!("Last rows of {}:\n{}", path.display(), df.tail(Some(5)));
        Ok(df.lazy())
    }

    fn parse(text: String, path: &Path, options: &CsvOptions) -> Result<DataFrame, LoadError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(options.infer_schema_length)
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()
            .map_err(|e| LoadError::CsvParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some(missing) = options
            .required_columns
            .iter()
            .find(|column| df.get_column_index(column).is_none())
        {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: missing.clone(),
            });
        }

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(bytes: &[u8]) -> Result<NamedTempFile, std::io::Error> {
        let mut file = NamedTempFile::new()?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_reads_header_and_rows() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_fixture(b"a,b\n1,x\n2,y\n")?;
        let df = DatasetLoader::load(file.path(), &CsvOptions::new(&["a", "b"]))?.collect()?;
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("a")?.i64()?.get(1), Some(2));
        Ok(())
    }

    #[test]
    fn test_load_latin1_header() -> Result<(), Box<dyn std::error::Error>> {
        // "Période" with a Latin-1 encoded 'é'
        let mut bytes = b"P".to_vec();
        bytes.push(0xE9);
        bytes.extend_from_slice(b"riode,value\n2021-01-04,1.2296\n");
        let file = write_fixture(&bytes)?;

        let df = DatasetLoader::load(file.path(), &CsvOptions::new(&["Période"]))?.collect()?;
        assert_eq!(df.height(), 1);
        Ok(())
    }

    #[test]
    fn test_all_text_keeps_numbers_as_strings() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_fixture(b"rate\n1.10\n-\n1.12\n")?;
        let options = CsvOptions::new(&["rate"]).all_text();
        let df = DatasetLoader::load(file.path(), &options)?.collect()?;
        let rates: Vec<Option<&str>> = df.column("rate")?.str()?.into_iter().collect();
        assert_eq!(rates, vec![Some("1.10"), Some("-"), Some("1.12")]);
        Ok(())
    }

    #[test]
    fn test_missing_column_is_reported() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_fixture(b"a\n1\n")?;
        let result = DatasetLoader::load(file.path(), &CsvOptions::new(&["a", "traffic_volume"]));
        match result {
            Err(LoadError::MissingColumn { column, .. }) => assert_eq!(column, "traffic_volume"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
        Ok(())
    }

    #[test]
    fn test_missing_file_fails_fast() {
        let result = DatasetLoader::load(Path::new("/nonexistent/traffic.csv"), &CsvOptions::default());
        assert!(matches!(result, Err(LoadError::FileRead(..))));
    }
}
