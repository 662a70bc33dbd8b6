#[cfg(test)]
mod tests {
    use crate::io::loaders::{TableLoader, TableSourceType};
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    fn temp_file_with_suffix(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    /// Test format detection from file extensions
    #[test]
    fn test_source_type_detection() {
        assert_eq!(
            TableSourceType::from_path(Path::new("sample.csv")).unwrap(),
            TableSourceType::Csv
        );
        assert_eq!(
            TableSourceType::from_path(Path::new("dump.JSON")).unwrap(),
            TableSourceType::Json
        );
        assert!(TableSourceType::from_path(Path::new("listings.parquet")).is_err());
        assert!(TableSourceType::from_path(Path::new("listings")).is_err());
    }

    /// Test loading a CSV file through the auto-detecting entry point
    #[test]
    fn test_load_csv_file() {
        let file = temp_file_with_suffix(".csv", "id,price\n1,100\n2,250\n");
        let result = TableLoader::load_from_file(file.path()).unwrap();
        assert_eq!(result.source_type, TableSourceType::Csv);
        assert_eq!(result.num_rows, 2);
        let price = result.dataframe.column("price").unwrap().i64().unwrap();
        assert_eq!(price.get(1), Some(250));
    }

    /// Test loading a JSON file through the auto-detecting entry point
    #[test]
    fn test_load_json_file() {
        let file = temp_file_with_suffix(".json", r#"[{"id": 1, "room_type": "Private room"}]"#);
        let result = TableLoader::load_from_file(file.path()).unwrap();
        assert_eq!(result.source_type, TableSourceType::Json);
        assert_eq!(result.num_rows, 1);
        let room_type = result.dataframe.column("room_type").unwrap().str().unwrap();
        assert_eq!(room_type.get(0), Some("Private room"));
    }

    /// Test loading from a JSON string
    #[test]
    fn test_load_from_json_str() {
        let result = TableLoader::load_from_json_str("[]").unwrap();
        assert_eq!(result.num_rows, 0);
        assert!(TableLoader::load_from_json_str("{not json").is_err());
    }

    /// Test that saving creates missing directories
    #[test]
    fn test_save_csv_creates_directories() {
        let df = TableLoader::load_from_json_str(r#"[{"price": 12.5, "host_name": "Ana"}]"#)
            .unwrap()
            .dataframe;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        TableLoader::save_csv(&df, &path).unwrap();
        let reloaded = TableLoader::load_from_csv(&path).unwrap();
        assert!(reloaded.dataframe.equals_missing(&df));
    }
}
