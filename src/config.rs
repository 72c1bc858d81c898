//! Configuração do cliente carregada a partir de `pickup.toml`.
//!
//! A struct [`PickupConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! As variáveis de ambiente `PICKUP_API_URL`, `PICKUP_AUTH_TOKEN` e
//! `PICKUP_DRIVER_ID` têm precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::session::SessionContext;

/// Nome do arquivo procurado no diretório atual.
pub const CONFIG_FILE: &str = "pickup.toml";

/// Configuração de nível superior carregada de `pickup.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PickupConfig {
    /// URL base da API do marketplace (ex.: `https://api.example.com/v1`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Token bearer da sessão do motorista.
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Identificador do motorista autenticado.
    #[serde(default)]
    pub driver_id: Option<String>,

    /// Timeout de conexão em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Timeout total de cada requisição em segundos.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Se `true`, uma resposta não-2xx numa atualização de status vira
    /// atualização local (comportamento original). Se `false`, é erro.
    #[serde(default = "default_degrade_on_server_rejection")]
    pub degrade_on_server_rejection: bool,
}

// Valor padrão para a URL base: servidor local de desenvolvimento.
fn default_api_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

// Valor padrão para o timeout de conexão: 10s.
fn default_connect_timeout_secs() -> u64 {
    10
}

// Valor padrão para o timeout de requisição: 30s.
fn default_request_timeout_secs() -> u64 {
    30
}

fn default_degrade_on_server_rejection() -> bool {
    true
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            auth_token: None,
            driver_id: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            degrade_on_server_rejection: default_degrade_on_server_rejection(),
        }
    }
}

impl PickupConfig {
    /// Carrega a configuração de `pickup.toml` no diretório atual,
    /// aplicando as variáveis de ambiente por cima.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Carrega a configuração de um caminho explícito (sem fallback),
    /// aplicando as variáveis de ambiente por cima.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&contents)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Lê o arquivo se existir; usa valores padrão caso contrário.
    fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<PickupConfig>(contents)?)
    }

    /// Variáveis de ambiente têm precedência sobre o arquivo.
    /// Valores vazios são ignorados.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup("PICKUP_API_URL") {
            self.api_base_url = url;
        }
        if let Some(token) = lookup("PICKUP_AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
        if let Some(driver) = lookup("PICKUP_DRIVER_ID") {
            self.driver_id = Some(driver);
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Cria o contexto de sessão a partir do token e do motorista configurados.
    pub fn session(&self) -> SessionContext {
        SessionContext::new(self.auth_token.clone(), self.driver_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = PickupConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.degrade_on_server_rejection);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            api_base_url = "https://api.example.com/v1"
            auth_token = "tok-123"
            degrade_on_server_rejection = false
        "#;
        let config = PickupConfig::parse(toml_str).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com/v1");
        assert_eq!(config.auth_token.as_deref(), Some("tok-123"));
        assert!(!config.degrade_on_server_rejection);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.driver_id.is_none());
    }

    #[test]
    fn env_overrides_file_and_skips_blank_values() {
        let mut config = PickupConfig {
            auth_token: Some("from-file".into()),
            driver_id: Some("drv-file".into()),
            ..Default::default()
        };
        let env: HashMap<&str, &str> = HashMap::from([
            ("PICKUP_AUTH_TOKEN", "from-env"),
            ("PICKUP_DRIVER_ID", "  "),
        ]);
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.auth_token.as_deref(), Some("from-env"));
        assert_eq!(config.driver_id.as_deref(), Some("drv-file"));
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
    }

    #[test]
    fn from_file_reads_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "driver_id = \"drv-9\"\nrequest_timeout_secs = 5").unwrap();

        let config = PickupConfig::from_file(file.path()).unwrap();
        assert_eq!(config.driver_id.as_deref(), Some("drv-9"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn from_file_falls_back_to_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = PickupConfig::from_file(&dir.path().join("pickup.toml")).unwrap();
        assert_eq!(config.connect_timeout_secs, 10);
    }

    #[test]
    fn invalid_toml_is_reported_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = \"soon\"").unwrap();

        let err = PickupConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn session_uses_configured_identity() {
        let config = PickupConfig {
            auth_token: Some("tok".into()),
            driver_id: Some("drv-1".into()),
            ..Default::default()
        };
        let session = config.session();
        assert_eq!(session.token().unwrap(), "tok");
        assert_eq!(session.driver_id().unwrap(), "drv-1");
    }
}
