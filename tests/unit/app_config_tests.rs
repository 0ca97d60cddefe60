/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use std::fs;

use doc_translation_queue::app_config::{Config, LogLevel};
use doc_translation_queue::errors::ConfigError;
use doc_translation_queue::language_utils::LocaleTable;

use crate::common;

/// Test default configuration values
#[test]
fn test_defaultConfig_shouldHaveExpectedDefaults() {
    let config = Config::default();

    assert_eq!(config.docs_site_url, "https://docs.newrelic.com");
    assert_eq!(config.content_root, "src/content/");
    assert_eq!(config.content_extension, ".mdx");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.backoff_base_ms, 1000);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.database_path.is_none());
}

#[test]
fn test_load_withMissingFile_shouldFallBackToDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let config = Config::load(dir.path().join("absent.json"))?;
    assert!(config.vendor.api_url.is_empty());
    Ok(())
}

#[test]
fn test_load_withFile_shouldReadVendorBlockAndLocales() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");
    fs::write(
        &path,
        r#"{
            "vendor": {
                "api_url": "https://api.vendor.test",
                "user_identifier": "user",
                "user_secret": "secret",
                "project_id": "proj-9"
            },
            "locale_ids": { "jp": "ja-JP", "kr": "ko-KR" },
            "retry": { "max_attempts": 5 }
        }"#,
    )?;

    let config = Config::load(&path)?;

    assert_eq!(config.vendor.project_id, "proj-9");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.backoff_base_ms, 1000);
    assert_eq!(config.locale_ids, LocaleTable::from_pairs([("jp", "ja-JP"), ("kr", "ko-KR")]));
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_load_withMalformedJson_shouldNameTheFile() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json")?;

    let err = Config::load(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));
    Ok(())
}

#[test]
fn test_validate_withEmptyLocaleTable_shouldReportLocales() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let mut config = common::test_config("http://127.0.0.1:9", dir.path());
    config.locale_ids = LocaleTable::from_pairs(Vec::<(String, String)>::new());

    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::MissingConfig("locale_ids".to_string())
    );
    Ok(())
}

#[test]
fn test_databasePath_withExplicitPath_shouldUseIt() -> Result<()> {
    let mut config = Config::default();
    config.database_path = Some("queue.db".into());
    assert_eq!(config.database_path()?, std::path::PathBuf::from("queue.db"));
    Ok(())
}
