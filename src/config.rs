//! YAML request files.
//!
//! A request file sets defaults for `load` and `compare`; flags given on the
//! command line take precedence.
//!
//! ```yaml
//! sheet_prefix: "t_"
//! ignore_sheets: [README]
//! ignore_columns: [created_at, updated_at]
//! auto_complete_not_null: true
//! dump_csv: false
//! ```

use crate::error::{Error, Result};
use crate::request::{CompareRequest, LoadRequest};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureYamlConfig {
    pub sheet_prefix: Option<String>,
    pub ignore_sheets: Vec<String>,
    pub ignore_columns: Vec<String>,
    pub auto_complete_not_null: Option<bool>,
    pub dump_csv: Option<bool>,
}

impl FixtureYamlConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Fill the fields of `request` that were not set explicitly.
    ///
    /// Sheet lists are merged; scalar values only apply when the request
    /// still holds its default.
    pub fn apply_to_load(&self, request: &mut LoadRequest) {
        if request.sheet_prefix.is_empty() {
            if let Some(prefix) = &self.sheet_prefix {
                request.sheet_prefix = prefix.clone();
            }
        }
        merge_names(&mut request.ignore_sheets, &self.ignore_sheets);
        if !request.auto_complete_not_null {
            request.auto_complete_not_null = self.auto_complete_not_null.unwrap_or(false);
        }
        if !request.dump_csv {
            request.dump_csv = self.dump_csv.unwrap_or(false);
        }
    }

    pub fn apply_to_compare(&self, request: &mut CompareRequest) {
        if request.sheet_prefix.is_empty() {
            if let Some(prefix) = &self.sheet_prefix {
                request.sheet_prefix = prefix.clone();
            }
        }
        merge_names(&mut request.ignore_sheets, &self.ignore_sheets);
        merge_names(&mut request.ignore_columns, &self.ignore_columns);
        if !request.dump_csv {
            request.dump_csv = self.dump_csv.unwrap_or(false);
        }
    }
}

fn merge_names(target: &mut Vec<String>, extra: &[String]) {
    for name in extra {
        if !target.contains(name) {
            target.push(name.clone());
        }
    }
}
