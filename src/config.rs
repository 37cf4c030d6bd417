//! User configuration (`config.toml`).
//!
//! Loading never fails: anything wrong with the file is reported as a warning
//! and the defaults are kept.

use directories::ProjectDirs;
use gridkeys_core::PermissionLevel;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_GRID_EXTENT: usize = 10_000;
const MAX_COLUMN_WIDTH: u16 = 64;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    session: Option<SessionSection>,
    grid: Option<GridSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionSection {
    sheet: Option<String>,
    permission: Option<String>,
    auto_confirm_close: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GridSection {
    columns: Option<usize>,
    rows: Option<usize>,
    column_width: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    filter: Option<String>,
    directory: Option<PathBuf>,
}

/// Resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Sheet name, also used as the sheet id.
    pub sheet_name: String,
    pub permission: PermissionLevel,
    /// Let the code editor confirm staged closes straight away.
    pub auto_confirm_close: bool,
    pub columns: usize,
    pub rows: usize,
    pub column_width: u16,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sheet_name: "Sheet 1".to_string(),
            permission: PermissionLevel::Editor,
            auto_confirm_close: true,
            columns: 26,
            rows: 100,
            column_width: 10,
            log_filter: "gridkeys=info,gridkeys_core=info".to_string(),
            log_dir: None,
        }
    }
}

/// Load the config from `config_file`, or the user config dir if not given.
///
/// Returns the config plus any warnings to show the user.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config_file(&path) {
        Ok(content) => {
            let config = parse_config(&content, &mut warnings);
            (config, warnings)
        }
        Err(warning) => {
            warnings.push(warning);
            (Config::default(), warnings)
        }
    }
}

fn read_config_file(path: &Path) -> Result<String, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    std::fs::read_to_string(path).map_err(|err| format!("Failed to read {}: {}", path.display(), err))
}

pub(crate) fn parse_config(content: &str, warnings: &mut Vec<String>) -> Config {
    let mut config = Config::default();
    let file = match toml::from_str::<ConfigFile>(content) {
        Ok(file) => file,
        Err(err) => {
            warnings.push(format!("Failed to parse config: {}", err));
            return config;
        }
    };

    if let Some(session) = file.session {
        if let Some(sheet) = session.sheet.map(|s| s.trim().to_string()) {
            if sheet.is_empty() {
                warnings.push("Ignoring empty sheet name".to_string());
            } else {
                config.sheet_name = sheet;
            }
        }
        if let Some(raw) = session.permission {
            match raw.parse::<PermissionLevel>() {
                Ok(level) => config.permission = level,
                Err(err) => warnings.push(format!("Invalid permission in config: {}", err)),
            }
        }
        if let Some(auto) = session.auto_confirm_close {
            config.auto_confirm_close = auto;
        }
    }

    if let Some(grid) = file.grid {
        if let Some(columns) = grid.columns {
            match checked_extent("columns", columns) {
                Ok(columns) => config.columns = columns,
                Err(warning) => warnings.push(warning),
            }
        }
        if let Some(rows) = grid.rows {
            match checked_extent("rows", rows) {
                Ok(rows) => config.rows = rows,
                Err(warning) => warnings.push(warning),
            }
        }
        if let Some(width) = grid.column_width {
            if (3..=MAX_COLUMN_WIDTH).contains(&width) {
                config.column_width = width;
            } else {
                warnings.push(format!(
                    "Invalid column_width {} (expected 3..={})",
                    width, MAX_COLUMN_WIDTH
                ));
            }
        }
    }

    if let Some(logging) = file.logging {
        if let Some(filter) = logging.filter.filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        config.log_dir = logging.directory;
    }

    config
}

fn checked_extent(name: &str, value: usize) -> Result<usize, String> {
    if value == 0 || value > MAX_GRID_EXTENT {
        Err(format!(
            "Invalid {} {} (expected 1..={})",
            name, value, MAX_GRID_EXTENT
        ))
    } else {
        Ok(value)
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridkeys")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
