use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::campaigns::CampaignData;
use crate::config::Config;

pub fn get_config() -> Config {
    let config_path = Path::new("config.json");

    let config_json = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(err) => {
            log_warn!("Failed to read config.json ({}), using defaults", err);
            return Config::default();
        }
    };
    match serde_json::from_str::<Config>(&config_json) {
        Ok(config) => config,
        Err(err) => {
            println!("Failed to parse config.json: {}", err);
            log_warn!("Failed to parse config.json ({}), using defaults", err);
            Config::default()
        }
    }
}

pub fn load_campaign_data(path: &Path) -> anyhow::Result<CampaignData> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading campaign data from {}", path.display()))?;
    parse_campaign_data(&json).with_context(|| format!("parsing {}", path.display()))
}

pub fn parse_campaign_data(json: &str) -> anyhow::Result<CampaignData> {
    let data: CampaignData = serde_json::from_str(json)?;
    if data.campaigns.is_empty() {
        anyhow::bail!("campaign data contains no campaigns");
    }
    Ok(data)
}
