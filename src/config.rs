// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_DATA_FILE: &str = "API_SE.PRM.ENRL.FE.ZS_DS2_en_excel_v2_20757.xls";

/// How a wide indicator sheet is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReshapeOptions {
    /// Worksheet holding the indicator table
    pub sheet: String,
    /// Physical rows above the header row (metadata banner)
    pub skip_rows: u32,
    /// Header label of the country-name column
    pub country_label: String,
    /// Header label of the ISO3 code column
    pub iso3_label: String,
    /// Columns removed before melting; absent ones are ignored
    pub drop_columns: Vec<String>,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            sheet: "Data".into(),
            skip_rows: 3,
            country_label: "Country Name".into(),
            iso3_label: "Country Code".into(),
            drop_columns: vec!["IndicatorName".into(), "IndicatorCode".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Spreadsheet to load
    pub data_path: PathBuf,

    pub reshape: ReshapeOptions,

    /// Countries pre-selected when no explicit selection is given
    pub default_countries: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            reshape: ReshapeOptions::default(),
            default_countries: vec!["United States".into(), "China".into(), "India".into()],
        }
    }
}

impl Config {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to a map
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(s).context("parsing config YAML")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("in {}", path.display()))
    }

    /// Load `path` if given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_document_yields_defaults() -> Result<()> {
        let cfg = Config::from_yaml_str("")?;
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.reshape.sheet, "Data");
        assert_eq!(cfg.reshape.skip_rows, 3);
        Ok(())
    }

    #[test]
    fn partial_document_keeps_other_defaults() -> Result<()> {
        let cfg = Config::from_yaml_str(
            "data_path: data/enrollment.xlsx\nreshape:\n  skip_rows: 0\ndefault_countries: [Zambia]\n",
        )?;
        assert_eq!(cfg.data_path, PathBuf::from("data/enrollment.xlsx"));
        assert_eq!(cfg.reshape.skip_rows, 0);
        assert_eq!(cfg.reshape.country_label, "Country Name");
        assert_eq!(cfg.default_countries, vec!["Zambia".to_string()]);
        Ok(())
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(Config::from_yaml_str("data_paht: x.xls\n").is_err());
    }

    #[test]
    fn load_from_file() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "reshape:\n  sheet: Sheet1")?;
        let cfg = Config::load(tmp.path())?;
        assert_eq!(cfg.reshape.sheet, "Sheet1");
        assert!(Config::load(Path::new("/definitely/not/here.yaml")).is_err());
        Ok(())
    }
}
