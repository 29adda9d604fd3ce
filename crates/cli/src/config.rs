//! Merchandising configuration for `sku sections` and the configurator
//! commands.
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! preferred_condition = "New"
//!
//! [[sections]]
//! id = "big-storage"
//! title = "Room to spare"
//! limit = 8
//!
//! [[sections.rules]]
//! key = "specs.storage"
//! operator = "gte"
//! value = 256
//!
//! [[sections]]
//! id = "refurbished-phones"
//! rules = [
//!     { key = "category", operator = "eq", value = "phones" },
//!     { key = "specs.condition_grade", operator = "neq", value = "C" },
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sku_eval::DefaultPolicy;
use sku_interchange::SectionConfig;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "SKU_CONFIG";

/// Top-level `sku.toml` document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MerchConfig {
    /// Default-variant policy used by the configurator commands.
    #[serde(default)]
    pub defaults: DefaultPolicy,
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

/// The config path from the flag, falling back to `SKU_CONFIG`.
pub fn config_path(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    })
}

/// Read and parse a config file from `path`.
pub fn read_config(path: &Path) -> Result<MerchConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    parse_config(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

fn parse_config(content: &str) -> Result<MerchConfig, String> {
    let config: MerchConfig = toml::from_str(content).map_err(|e| e.to_string())?;
    let mut seen = std::collections::BTreeSet::new();
    for section in &config.sections {
        if section.id.is_empty() {
            return Err("section id must not be empty".to_string());
        }
        if !seen.insert(section.id.as_str()) {
            return Err(format!("duplicate section id '{}'", section.id));
        }
    }
    tracing::debug!(sections = config.sections.len(), "loaded merchandising config");
    Ok(config)
}

/// Load the config named by the flag or environment, or the default
/// config when neither is set.
pub fn load(flag: Option<&Path>) -> Result<MerchConfig, String> {
    match config_path(flag) {
        Some(path) => read_config(&path),
        None => Ok(MerchConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sku_interchange::{RuleOperator, SpecValue};

    #[test]
    fn parses_sections_and_defaults() {
        let config = parse_config(
            r#"
[defaults]
preferred_condition = "Refurbished"

[[sections]]
id = "big"
title = "Big storage"
limit = 2

[[sections.rules]]
key = "specs.storage"
operator = "gte"
value = 256

[[sections]]
id = "phones"
rules = [{ field = "category", operator = "eq", value = "phones" }]
"#,
        )
        .unwrap();

        assert_eq!(config.defaults.preferred_condition, "Refurbished");
        assert_eq!(config.sections.len(), 2);
        let big = &config.sections[0];
        assert_eq!(big.limit, Some(2));
        assert_eq!(big.rules[0].operator, RuleOperator::Gte);
        assert_eq!(big.rules[0].value, SpecValue::from(256u64));
        assert_eq!(config.sections[1].rules[0].key.as_deref(), Some("category"));
    }

    #[test]
    fn empty_document_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.defaults, DefaultPolicy::default());
        assert!(config.sections.is_empty());
    }

    #[test]
    fn unknown_operator_is_kept() {
        let config = parse_config(
            r#"
[[sections]]
id = "odd"
rules = [{ key = "name", operator = "matches", value = "x" }]
"#,
        )
        .unwrap();
        assert_eq!(config.sections[0].rules[0].operator, RuleOperator::Unknown);
    }

    #[test]
    fn duplicate_section_ids_rejected() {
        let err = parse_config(
            r#"
[[sections]]
id = "a"
[[sections]]
id = "a"
"#,
        )
        .unwrap_err();
        assert!(err.contains("duplicate section id 'a'"));
    }

    #[test]
    fn missing_section_id_rejected() {
        assert!(parse_config("[[sections]]\ntitle = \"x\"").is_err());
    }
}
