use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

use crate::models::ComponentKind;

pub const DEFAULT_BASE_URL: &str = "https://www.techpowerup.com";
const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
    "(KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36"
);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub base_url: String,
    /// Listing page path per category, relative to `base_url`. A category
    /// missing here cannot be listed.
    pub categories: HashMap<String, String>,
    pub user_agent: String,
    pub request_timeout_seconds: u64,
    pub max_retries: u32,
    pub database_path: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut categories = HashMap::new();
        for (kind, path) in [
            (ComponentKind::Cpu, "/cpu-specs/"),
            (ComponentKind::Gpu, "/gpu-specs/"),
        ] {
            categories.insert(kind.key().to_string(), path.to_string());
        }

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            categories,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_seconds: 25,
            max_retries: 3,
            database_path: "tpu_specs.db".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `tpu_specs.toml` if present, then `TPU_SPECS_*`
    /// environment variables (`TPU_SPECS_CATEGORIES__CPU=/cpu-specs/`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Config::default();
        let mut builder = config::Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("user_agent", defaults.user_agent)?
            .set_default(
                "request_timeout_seconds",
                defaults.request_timeout_seconds as i64,
            )?
            .set_default("max_retries", defaults.max_retries as i64)?
            .set_default("database_path", defaults.database_path)?;

        for (kind, path) in defaults.categories {
            builder = builder.set_default(format!("categories.{}", kind), path)?;
        }

        builder
            .add_source(config::File::with_name("tpu_specs").required(false))
            .add_source(
                config::Environment::with_prefix("TPU_SPECS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Absolute listing URL for `kind`, if one is configured.
    pub fn listing_url(&self, kind: ComponentKind) -> Option<String> {
        self.categories
            .get(kind.key())
            .map(|path| join_base_url(&self.base_url, path))
    }
}

/// Prefixes a site path with `base_url`, keeping any path the base carries.
/// Absolute URLs are returned unchanged.
pub fn join_base_url(base_url: &str, path: &str) -> String {
    if Url::parse(path).is_ok() {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    match path.strip_prefix('/') {
        Some(_) => format!("{base}{path}"),
        None => format!("{base}/{path}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_listing_urls() {
        let config = Config::default();
        assert_eq!(
            config.listing_url(ComponentKind::Cpu).as_deref(),
            Some("https://www.techpowerup.com/cpu-specs/")
        );
        assert_eq!(
            config.listing_url(ComponentKind::Gpu).as_deref(),
            Some("https://www.techpowerup.com/gpu-specs/")
        );
    }

    #[test]
    fn unconfigured_category_has_no_url() {
        let mut config = Config::default();
        config.categories.remove("gpu");
        assert_eq!(config.listing_url(ComponentKind::Gpu), None);
    }

    #[test]
    fn site_paths_keep_base_path() {
        assert_eq!(
            join_base_url("https://mirror.test/tpu/", "/cpu-specs/a.c1"),
            "https://mirror.test/tpu/cpu-specs/a.c1"
        );
        assert_eq!(
            join_base_url("https://mirror.test/tpu", "cpu-specs/a.c1"),
            "https://mirror.test/tpu/cpu-specs/a.c1"
        );
        assert_eq!(
            join_base_url("https://mirror.test/tpu", "https://cdn.test/x.c1"),
            "https://cdn.test/x.c1"
        );
    }
}
