use std::{fs, path::PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub token_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8082/api".into(),
            token_file: "./data/session.toml".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("console.toml") {
        if let Ok(file_cfg) = toml::from_str::<Settings>(&raw) {
            settings = file_cfg;
        }
    }

    if let Ok(v) = std::env::var("STUDY_HUB_API_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Ok(v) = std::env::var("STUDY_HUB_TOKEN_FILE") {
        settings.token_file = v.into();
    }
    if let Ok(v) = std::env::var("APP__TOKEN_FILE") {
        settings.token_file = v.into();
    }

    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_backend() {
        let settings = Settings::default();
        assert_eq!(settings.api_base_url, "http://localhost:8082/api");
    }

    #[test]
    fn partial_config_files_keep_the_remaining_defaults() {
        let settings: Settings =
            toml::from_str(r#"api_base_url = "https://admin.studyhub.dev/api""#).expect("parse");
        assert_eq!(settings.api_base_url, "https://admin.studyhub.dev/api");
        assert_eq!(settings.token_file, PathBuf::from("./data/session.toml"));
    }
}
