use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file (by extension) and deserialise into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    tracing::info!(path = %canonical.display(), "read input file");

    if is_yaml(&canonical) {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
    } else {
        serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Resolve and validate the path.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use refinance_core::units::{DiagnosisInput, DisplayUnit};
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reads_json() {
        let file = write_temp(
            ".json",
            r#"{"current_balance": 2500, "current_rate_percent": 1.5, "remaining_years": 25,
                "new_rate_percent": 0.6, "refinance_costs": 80}"#,
        );
        let input: DiagnosisInput = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(input.current_balance, dec!(2500));
        assert_eq!(input.display_unit, DisplayUnit::TenThousand);
    }

    #[test]
    fn test_reads_yaml() {
        let file = write_temp(
            ".yaml",
            "current_balance: 30000000\ncurrent_rate_percent: 1.2\nremaining_years: 20\n\
             new_rate_percent: 0.45\nrefinance_costs: 600000\ndisplay_unit: base\n",
        );
        let input: DiagnosisInput = read_input(file.path().to_str().unwrap()).unwrap();
        assert_eq!(input.display_unit, DisplayUnit::Base);
        assert_eq!(input.remaining_years, 20);
    }

    #[test]
    fn test_missing_file() {
        let err = read_input::<DiagnosisInput>("/nonexistent/input.json").unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_parse_error_names_file() {
        let file = write_temp(".json", "{ not json");
        let err = read_input::<DiagnosisInput>(file.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse"));
    }
}
