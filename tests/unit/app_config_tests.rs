/*!
 * Tests for configuration defaults, parsing and validation
 */

use anyhow::Result;
use pdfswahili::app_config::{Config, LogLevel, TranslationProvider};
use crate::common;

#[test]
fn test_defaultConfig_shouldTranslateEnglishToSwahiliWithGoogle() {
    let config = Config::default();
    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "sw");
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.get_max_chars_per_request(), 4500);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_delay_ms, 1500);
    assert!(!config.translation.common.fail_fast);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_llmProviders_shouldUseSmallerChunks() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    assert_eq!(config.translation.get_max_chars_per_request(), 2000);
    assert_eq!(config.translation.get_model(), "llama3.2:3b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
}

#[test]
fn test_minimalJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_language": "sw",
        "translation": { "provider": "google" }
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.get_max_chars_per_request(), 4500);
    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
    assert_eq!(config.pdf.font_size, 11.0);
    assert_eq!(config.pdf.placeholder, '?');
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_providerEntry_shouldOverrideDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "en",
        "target_language": "sw",
        "translation": {
            "provider": "lmstudio",
            "available_providers": [
                { "type": "lmstudio", "model": "qwen2.5", "endpoint": "http://gpu-box:1234/v1", "max_chars_per_request": 1200 }
            ],
            "common": { "retry_count": 1, "fail_fast": true }
        },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.provider, TranslationProvider::LMStudio);
    assert_eq!(config.translation.get_model(), "qwen2.5");
    assert_eq!(config.translation.get_endpoint(), "http://gpu-box:1234/v1");
    assert_eq!(config.translation.get_max_chars_per_request(), 1200);
    assert_eq!(config.translation.common.retry_count, 1);
    assert_eq!(config.translation.common.retry_delay_ms, 1500);
    assert!(config.translation.common.fail_fast);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

#[test]
fn test_validate_withKeylessOpenAI_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_err());

    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withKeylessLmStudio_shouldPass() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LMStudio;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.target_language = "zz".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.source_language = "auto".to_string();
    assert!(config.validate().is_ok());

    let mut config = Config::default();
    config.translation.active_provider_config_mut().max_chars_per_request = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pdf.font_size = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.pdf.placeholder = 'ŋ';
    assert!(config.validate().is_err());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(config.target_language, "sw");

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.translation.available_providers.len(), 5);
    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

#[test]
fn test_providerDisplay_shouldMatchConfigName() {
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::LMStudio.to_string(), "lmstudio");
    assert_eq!(TranslationProvider::OpenAI.to_string(), "openai");
}
