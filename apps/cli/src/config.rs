use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use traffic_app::AppConfig;

pub const CONFIG_ENV: &str = "TRAFFIC_PARSER_CONFIG";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: AppConfig,
    pub file: PathBuf,
    pub created: bool,
}

/// Flag first, then `$TRAFFIC_PARSER_CONFIG`, then the default data directory.
pub fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    match env::var_os(CONFIG_ENV) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => AppConfig::default().data_dir.join(CONFIG_FILE_NAME),
    }
}

pub fn load_or_create(file: &Path) -> Result<ConfigLoad, String> {
    if file.exists() {
        let contents = fs::read_to_string(file)
            .map_err(|err| format!("read config {}: {}", file.display(), err))?;
        let config: AppConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            file: file.to_path_buf(),
            created: false,
        });
    }

    if let Some(dir) = file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    }
    let config = AppConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(file, contents).map_err(|err| format!("write config {}: {}", file.display(), err))?;

    Ok(ConfigLoad {
        config,
        file: file.to_path_buf(),
        created: true,
    })
}
