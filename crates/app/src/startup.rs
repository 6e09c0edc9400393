use crate::app::AppConfig;
use crate::error::Result;

pub fn ensure_data_dir(config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    Ok(())
}
