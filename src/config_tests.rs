//! Unit tests for configuration module
//!
//! These tests validate configuration parsing, defaults, and validation.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use crate::config::*;
    use crate::embeddings::EmbeddingProvider;
    use crate::errors::TriageError;
    use crate::vector_store::ChromaApi;

    // ====== Default Value Tests ======

    #[test]
    fn test_defaults_follow_upstream_service() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8001);
        assert!(config.server.enable_cors);
        assert_eq!(config.embeddings.dimension, 384);
        assert_eq!(config.embeddings.endpoint, "http://localhost:5050/embed");
        assert_eq!(config.vector_store.url, "http://localhost:8000");
        assert_eq!(config.vector_store.collection, "support_tickets");
        assert_eq!(config.llm.llm_endpoint, "https://openrouter.ai/api/v1");
        assert_eq!(config.llm.llm_model, "deepseek/deepseek-chat-v3-0324:free");
        assert_eq!(config.llm.max_tokens, 400);
        assert!((config.llm.temperature - 1.2).abs() < f32::EPSILON);
        assert!((config.match_threshold() - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    // ====== Parsing Tests ======

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, 8001);
        assert_eq!(config.embeddings.provider, "sidecar");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r#"
[server]
port = 9000

[triage]
match_threshold = 0.35

[llm]
llm_key = "sk-test"
"#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!((config.match_threshold() - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.llm_key(), "sk-test");
        assert_eq!(config.llm_model(), "deepseek/deepseek-chat-v3-0324:free");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("[server\nport = 1").unwrap_err();
        assert!(matches!(err, TriageError::TomlParsing(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[vector_store]\ncollection = \"tickets_test\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.vector_store.collection, "tickets_test");
    }

    #[test]
    fn test_from_missing_file_is_io_error() {
        let err = AppConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, TriageError::Io(_)));
    }

    // ====== Environment Override Tests ======

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "9100"),
            ("CHROMADB_URL", "http://chroma:8000"),
            ("EMBEDDING_URL", "http://embedder:5050/embed"),
            ("DEEPSEEK_API_KEY", "deepseek-key"),
            ("LLM_MODEL", "openai/gpt-4o-mini"),
        ]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.vector_store.url, "http://chroma:8000");
        assert_eq!(config.embeddings.endpoint, "http://embedder:5050/embed");
        assert_eq!(config.llm_key(), "deepseek-key");
        assert_eq!(config.llm_model(), "openai/gpt-4o-mini");
    }

    #[test]
    fn test_llm_api_key_wins_over_deepseek_key() {
        let env: HashMap<&str, &str> =
            HashMap::from([("LLM_API_KEY", "primary"), ("DEEPSEEK_API_KEY", "secondary")]);

        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(|v| (*v).to_string()));
        assert_eq!(config.llm_key(), "primary");
    }

    #[test]
    fn test_unparseable_port_is_ignored() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(|key| (key == "PORT").then(|| "eighty".to_string()));
        assert_eq!(config.server.port, 8001);
    }

    // ====== Validation Tests ======

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = AppConfig::default();
        config.vector_store.url = "localhost without scheme".to_string();
        assert!(matches!(config.validate(), Err(TriageError::UrlError(_))));
    }

    #[test]
    fn test_validate_rejects_zero_dimension() {
        let mut config = AppConfig::default();
        config.embeddings.dimension = 0;
        assert!(matches!(config.validate(), Err(TriageError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_threshold_out_of_range() {
        let mut config = AppConfig::default();
        config.triage.match_threshold = 0.0;
        assert!(config.validate().is_err());
        config.triage.match_threshold = 2.5;
        assert!(config.validate().is_err());
        config.triage.match_threshold = 2.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = AppConfig::default();
        config.embeddings.provider = "mystery".to_string();
        assert!(matches!(config.validate(), Err(TriageError::ConfigError(_))));
    }

    #[test]
    fn test_embedding_provider_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.embedding_provider().unwrap(), EmbeddingProvider::Sidecar);
        config.embeddings.provider = "OpenAI".to_string();
        assert_eq!(config.embedding_provider().unwrap(), EmbeddingProvider::OpenAI);
        config.embeddings.provider = "ollama".to_string();
        assert_eq!(config.embedding_provider().unwrap(), EmbeddingProvider::Ollama);
    }

    #[test]
    fn test_chroma_api_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.chroma_api().unwrap(), ChromaApi::V2);
        config.vector_store.api_version = "V1".to_string();
        assert_eq!(config.chroma_api().unwrap(), ChromaApi::V1);
    }

    #[test]
    fn test_validate_rejects_unknown_chroma_api() {
        let mut config = AppConfig::default();
        config.vector_store.api_version = "v3".to_string();
        assert!(matches!(config.validate(), Err(TriageError::ConfigError(_))));
    }

    #[test]
    fn test_chroma_api_version_from_toml() {
        let config = AppConfig::from_toml_str("[vector_store]\napi_version = \"v1\"").unwrap();
        assert_eq!(config.vector_store.api_version, "v1");
        assert_eq!(config.vector_store.tenant, "default_tenant");
        assert_eq!(config.vector_store.database, "default_database");
    }

    // ====== Helper Tests ======

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        assert_eq!(config.bind_address(), "127.0.0.1:8001");
    }

    #[test]
    fn test_redacted_masks_keys() {
        let mut config = AppConfig::default();
        config.llm.llm_key = "sk-or-v1-abcdef".to_string();
        config.embeddings.api_key = Some("sk-embed-123".to_string());

        let redacted = config.redacted();
        assert_eq!(redacted.llm.llm_key, "sk-o****");
        assert_eq!(redacted.embeddings.api_key.as_deref(), Some("sk-e****"));
        // original untouched
        assert_eq!(config.llm.llm_key, "sk-or-v1-abcdef");
    }

    #[test]
    fn test_redacted_leaves_empty_key_empty() {
        let redacted = AppConfig::default().redacted();
        assert_eq!(redacted.llm.llm_key, "");
    }
}
