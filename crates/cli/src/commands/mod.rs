pub(crate) mod catalog;
pub(crate) mod configure;

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{self, MerchConfig};
use crate::{fail, OutputFormat};

/// Global flags shared by every subcommand.
pub(crate) struct Context {
    pub output: OutputFormat,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

impl Context {
    /// The merchandising config, or defaults when none is named.
    pub(crate) fn merch_config(&self) -> MerchConfig {
        match config::load(self.config.as_deref()) {
            Ok(cfg) => cfg,
            Err(e) => fail(&format!("error: {}", e), self.output, self.quiet),
        }
    }

    /// Print `value` as pretty JSON or through `text`, honoring `--quiet`.
    pub(crate) fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) {
        if self.quiet {
            return;
        }
        match self.output {
            OutputFormat::Json => {
                let pretty = serde_json::to_string_pretty(value)
                    .unwrap_or_else(|e| format!("serialization error: {}", e));
                println!("{}", pretty);
            }
            OutputFormat::Text => {
                let rendered = text(value);
                if !rendered.is_empty() {
                    println!("{}", rendered.trim_end());
                }
            }
        }
    }
}
