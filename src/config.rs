use std::path::PathBuf;

use crate::types::activity::FieldPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub max_file_size: usize,
    pub upload_dir: PathBuf,
    pub field_policy: FieldPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            max_file_size: 25 * 1024 * 1024,
            upload_dir: PathBuf::from("./uploads"),
            field_policy: FieldPolicy::Lenient,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_file_size = std::env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(defaults.max_file_size);

        let upload_dir = std::env::var("UPLOAD_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);

        let field_policy = match std::env::var("FIELD_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!("FIELD_POLICY: {}, using lenient", e);
                FieldPolicy::Lenient
            }),
            Err(_) => defaults.field_policy,
        };

        Self {
            port,
            max_file_size,
            upload_dir,
            field_policy,
        }
    }
}
