//! Tariff table loading.

use std::path::Path;

use anyhow::Context;

use stockroom_delivery::{Tariff, TariffTable};

/// Load the tariff table from a JSON array of tariff records, or fall back to
/// the built-in table when no path is configured.
pub fn load_tariffs(path: Option<&Path>) -> anyhow::Result<TariffTable> {
    let Some(path) = path else {
        tracing::info!("no tariff file configured; using built-in tariffs");
        return Ok(TariffTable::builtin());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tariff file at {:?}", path))?;
    let tariffs: Vec<Tariff> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse tariff file at {:?}", path))?;
    let table = TariffTable::new(tariffs)
        .with_context(|| format!("invalid tariff table in {:?}", path))?;

    tracing::info!(destinations = table.len(), path = %path.display(), "tariffs loaded");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("stockroom-{}-{}.json", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn no_path_yields_builtin_table() {
        assert_eq!(load_tariffs(None).unwrap(), TariffTable::builtin());
    }

    #[test]
    fn file_tariffs_replace_builtin_ones() {
        let path = temp_file(
            "valid",
            r#"[{"code": "am", "display_name": "Армения", "tiers": [500, 540, 580, 650], "overage_rate": 180}]"#,
        );
        let table = load_tariffs(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 1);
        assert!(table.get("ru").is_none());
        assert_eq!(table.get("am").unwrap().tiers[3], 650.0);
    }

    #[test]
    fn duplicate_codes_in_file_are_rejected() {
        let record = r#"{"code": "ru", "display_name": "Россия", "tiers": [1, 2, 3, 4], "overage_rate": 1}"#;
        let path = temp_file("duplicate", &format!("[{record}, {record}]"));
        let err = load_tariffs(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(format!("{err:#}").contains("duplicate tariff code"));
    }

    #[test]
    fn file_with_decreasing_tiers_is_rejected() {
        let path = temp_file(
            "decreasing",
            r#"[{"code": "kz", "display_name": "Kazakhstan", "tiers": [450, 480, 600, 520], "overage_rate": 150}]"#,
        );
        let err = load_tariffs(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(format!("{err:#}").contains("must not decrease"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/stockroom/tariffs.json");
        assert!(load_tariffs(Some(&path)).is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let path = temp_file("malformed", "{ not json");
        let err = load_tariffs(Some(&path)).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{err:#}").contains("failed to parse"));
    }
}
