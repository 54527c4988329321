use anyhow::{anyhow, Result};
use config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub struct WormholeConfig {
    /// Path to the directory holding wormhole's data
    pub data_dir: String,

    /// File name of the SQLite database inside `data_dir`
    pub database_file: String,
}

const DEFAULT_DATABASE_FILE: &str = "wormhole.db";

const EMPTY_CONFIG: &str = r#"### wormhole configuration file

### directory for the wormhole database
# data_dir = "~/.wormhole"

### database file name inside data_dir
# database_file = "wormhole.db"
"#;

/// Keys accepted in the config file and as `WORMHOLE_*` variables
#[derive(Debug, Default, Deserialize)]
struct ConfigKeys {
    data_dir: Option<String>,
    database_file: Option<String>,
}

impl Default for WormholeConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        Self::from_keys(ConfigKeys::default(), &home_dir)
    }
}

impl WormholeConfig {
    /// Load the configuration
    ///
    /// Reads `path`, or `$HOME/.wormhole/wormhole.toml` when none is given,
    /// then applies `WORMHOLE_*` environment variables on top. A missing
    /// config file is created from a commented template.
    pub fn new(path: &Option<String>) -> Result<WormholeConfig> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();

        let config_file = match path {
            Some(p) => PathBuf::from(p),
            None => Path::new(&home_dir).join(".wormhole").join("wormhole.toml"),
        };
        ensure_config_file(&config_file)?;

        // E.g., `WORMHOLE_DATA_DIR=/srv/mc/plugins/Wormhole wormhole migrate`
        let keys: ConfigKeys = Config::builder()
            .add_source(config::File::from(config_file.as_path()).required(false))
            .add_source(config::Environment::with_prefix("WORMHOLE"))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| {
                anyhow!(
                    "Failed to load configuration from {}: {}",
                    config_file.display(),
                    e
                )
            })?;

        Ok(Self::from_keys(keys, &home_dir))
    }

    fn from_keys(keys: ConfigKeys, home_dir: &str) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        Self {
            data_dir: non_empty(keys.data_dir)
                .map(|d| expand_home(&d, home_dir))
                .unwrap_or_else(|| format!("{}/.wormhole", home_dir)),
            database_file: non_empty(keys.database_file)
                .unwrap_or_else(|| DEFAULT_DATABASE_FILE.to_string()),
        }
    }

    /// Get the path to the SQLite database file
    pub fn database_path(&self) -> String {
        let data_dir = self.data_dir.trim_end_matches('/');
        format!("{}/{}", data_dir, self.database_file)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("Data Directory:     {}", self.data_dir),
            format!("Database Path:      {}", self.database_path()),
        ]
        .join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.wormhole/wormhole.toml", home_dir)
    }
}

fn ensure_config_file(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Unable to create directory {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, EMPTY_CONFIG)
        .map_err(|e| anyhow!("Unable to create config file {}: {}", path.display(), e))
}

fn expand_home(path: &str, home_dir: &str) -> String {
    match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => format!("{}{}", home_dir, rest),
        _ => path.to_string(),
    }
}

/// Information about the SQLite database, gathered without migrating it
#[derive(Debug, Serialize, Clone)]
pub struct DatabaseInfo {
    pub path: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub schema_status: String,
    pub schema_version: i64,
    pub latest_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub players_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jumps_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signs_count: Option<u64>,
}

impl DatabaseInfo {
    /// Human-readable multi-line summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Database Path:      {}", self.path),
            format!("Exists:             {}", self.exists),
        ];
        if let Some(size) = self.size_bytes {
            lines.push(format!("Size:               {}", format_size(size)));
        }
        lines.push(format!("Schema Status:      {}", self.schema_status));
        lines.push(format!(
            "Schema Version:     {} (latest {})",
            self.schema_version, self.latest_version
        ));
        for (name, count) in [
            ("Players", self.players_count),
            ("Jumps", self.jumps_count),
            ("Signs", self.signs_count),
        ] {
            if let Some(count) = count {
                lines.push(format!("{:<20}{}", format!("{}:", name), count));
            }
        }
        lines.join("\n")
    }
}

/// Get SQLite database information
///
/// A missing file is reported as such and is not created.
pub fn get_database_info(config: &WormholeConfig) -> DatabaseInfo {
    use crate::database::{DatabaseManager, SchemaManager, LATEST_VERSION, UNVERSIONED};

    let path = config.database_path();
    let exists = Path::new(&path).exists();
    let size_bytes = if exists {
        std::fs::metadata(&path).ok().map(|m| m.len())
    } else {
        None
    };

    let mut info = DatabaseInfo {
        path: path.clone(),
        exists,
        size_bytes,
        schema_status: "missing".to_string(),
        schema_version: UNVERSIONED,
        latest_version: LATEST_VERSION,
        players_count: None,
        jumps_count: None,
        signs_count: None,
    };

    if !exists {
        return info;
    }

    let mut db = DatabaseManager::new(&path);
    {
        let mut schema = SchemaManager::new(&mut db);
        info.schema_version = schema.current_version();
        info.schema_status = schema.check_status().to_string();
    }

    let mut count = |table: &str| match db.table_exists(table) {
        Ok(true) => db.table_count(table).ok(),
        _ => None,
    };
    info.players_count = count("players");
    info.jumps_count = count("jumps");
    info.signs_count = count("signs");

    info
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
