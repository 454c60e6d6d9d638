//! Configuration module
//!
//! Process-wide settings read once at startup from the environment (and an
//! optional `.env` file). The resulting [`Config`] is immutable and handed to
//! the application state; nothing reads the environment after boot.

use std::env;
use std::path::PathBuf;

use crate::storage_types::{RecordBackend, StorageBackend};

const DEFAULT_PORT: u16 = 5000;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const SPEECH_TIMEOUT_SECS: u64 = 60;
const DEFAULT_UPLOADS_TABLE: &str = "maindatabase";
const DEFAULT_SUBUPLOADS_TABLE: &str = "maindatabase_subuploads";

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_upload_size_bytes: usize,
    /// `compact` (default) or `json`
    pub log_format: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            max_upload_size_bytes: MAX_UPLOAD_SIZE_MB * 1024 * 1024,
            log_format: "compact".to_string(),
        }
    }
}

/// Full service configuration
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    /// Owner of every record this process writes or reads.
    pub company_id: String,
    // Object storage
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Metadata records
    pub metadata_backend: Option<RecordBackend>,
    pub dynamodb_region: Option<String>,
    pub dynamodb_endpoint: Option<String>,
    pub uploads_table: String,
    pub subuploads_table: String,
    // Speech synthesis
    pub azure_speech_key: String,
    pub azure_service_region: String,
    pub speech_endpoint: Option<String>,
    pub speech_language: String,
    pub speech_voice: String,
    pub speech_style: String,
    pub speech_style_degree: String,
    pub speech_timeout_secs: u64,
    pub speech_output_format: String,
    // Audio transcoding
    pub ffmpeg_path: String,
    pub audio_work_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            company_id: String::new(),
            storage_backend: None,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            metadata_backend: None,
            dynamodb_region: None,
            dynamodb_endpoint: None,
            uploads_table: DEFAULT_UPLOADS_TABLE.to_string(),
            subuploads_table: DEFAULT_SUBUPLOADS_TABLE.to_string(),
            azure_speech_key: String::new(),
            azure_service_region: String::new(),
            speech_endpoint: None,
            speech_language: "ja-JP".to_string(),
            speech_voice: "ja-JP-DaichiNeural".to_string(),
            speech_style: "customerservice".to_string(),
            speech_style_degree: "3".to_string(),
            speech_timeout_secs: SPEECH_TIMEOUT_SECS,
            speech_output_format: "mp3".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            audio_work_dir: None,
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn upload_limit_bytes(megabytes: usize) -> Result<usize, anyhow::Error> {
    megabytes
        .checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_UPLOAD_SIZE_MB is too large: {}", megabytes))
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = ServiceConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let max_upload_size_bytes = upload_limit_bytes(
            env::var("MAX_UPLOAD_SIZE_MB")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(MAX_UPLOAD_SIZE_MB),
        )?;

        let company_id = optional_var("COMPANY_ID")
            .ok_or_else(|| anyhow::anyhow!("COMPANY_ID must be set"))?;

        let storage_backend = optional_var("STORAGE_BACKEND")
            .map(|v| v.parse::<StorageBackend>())
            .transpose()?;
        let metadata_backend = optional_var("METADATA_BACKEND")
            .map(|v| v.parse::<RecordBackend>())
            .transpose()?;

        let azure_speech_key = optional_var("AZURE_SPEECH_KEY")
            .ok_or_else(|| anyhow::anyhow!("AZURE_SPEECH_KEY must be set"))?;
        let azure_service_region = optional_var("AZURE_SERVICE_REGION")
            .ok_or_else(|| anyhow::anyhow!("AZURE_SERVICE_REGION must be set"))?;

        let speech_timeout_secs = env::var("SPEECH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(SPEECH_TIMEOUT_SECS);

        Ok(Self {
            base: BaseConfig {
                server_port,
                cors_origins,
                environment,
                max_upload_size_bytes,
                log_format: optional_var("LOG_FORMAT")
                    .map(|v| v.to_lowercase())
                    .unwrap_or_else(|| "compact".to_string()),
            },
            company_id,
            storage_backend,
            s3_bucket: optional_var("S3_BUCKET"),
            s3_region: optional_var("S3_REGION"),
            s3_endpoint: optional_var("S3_ENDPOINT"),
            aws_region: optional_var("AWS_REGION"),
            local_storage_path: optional_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: optional_var("LOCAL_STORAGE_BASE_URL"),
            metadata_backend,
            dynamodb_region: optional_var("DYNAMODB_REGION"),
            dynamodb_endpoint: optional_var("DYNAMODB_ENDPOINT"),
            uploads_table: optional_var("UPLOADS_TABLE").unwrap_or(defaults.uploads_table),
            subuploads_table: optional_var("SUBUPLOADS_TABLE")
                .unwrap_or(defaults.subuploads_table),
            azure_speech_key,
            azure_service_region,
            speech_endpoint: optional_var("SPEECH_ENDPOINT"),
            speech_language: optional_var("SPEECH_LANGUAGE").unwrap_or(defaults.speech_language),
            speech_voice: optional_var("SPEECH_VOICE").unwrap_or(defaults.speech_voice),
            speech_style: optional_var("SPEECH_STYLE").unwrap_or(defaults.speech_style),
            speech_style_degree: optional_var("SPEECH_STYLE_DEGREE")
                .unwrap_or(defaults.speech_style_degree),
            speech_timeout_secs,
            speech_output_format: optional_var("SPEECH_OUTPUT_FORMAT")
                .unwrap_or(defaults.speech_output_format),
            ffmpeg_path: optional_var("FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path),
            audio_work_dir: optional_var("AUDIO_WORK_DIR").map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.company_id.trim().is_empty() {
            return Err(anyhow::anyhow!("COMPANY_ID must not be empty"));
        }

        if self.base.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.metadata_backend.unwrap_or(RecordBackend::DynamoDb) == RecordBackend::DynamoDb {
            if self.dynamodb_region.is_none() && self.aws_region.is_none() {
                return Err(anyhow::anyhow!(
                    "DYNAMODB_REGION or AWS_REGION must be set when using DynamoDB"
                ));
            }
            if self.uploads_table == self.subuploads_table {
                return Err(anyhow::anyhow!(
                    "UPLOADS_TABLE and SUBUPLOADS_TABLE must name different tables"
                ));
            }
        }

        if self.azure_speech_key.is_empty() || self.azure_service_region.is_empty() {
            return Err(anyhow::anyhow!(
                "AZURE_SPEECH_KEY and AZURE_SERVICE_REGION must be set"
            ));
        }

        if self.speech_timeout_secs == 0 {
            return Err(anyhow::anyhow!("SPEECH_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    pub fn new(config: ServiceConfig) -> Self {
        Config(Box::new(config))
    }

    fn inner(&self) -> &ServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().base.max_upload_size_bytes
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn company_id(&self) -> &str {
        &self.inner().company_id
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    /// S3 region, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.inner()
            .s3_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn metadata_backend(&self) -> Option<RecordBackend> {
        self.inner().metadata_backend
    }

    /// DynamoDB region, falling back to `AWS_REGION`.
    pub fn dynamodb_region(&self) -> Option<&str> {
        self.inner()
            .dynamodb_region
            .as_deref()
            .or(self.inner().aws_region.as_deref())
    }

    pub fn dynamodb_endpoint(&self) -> Option<&str> {
        self.inner().dynamodb_endpoint.as_deref()
    }

    pub fn uploads_table(&self) -> &str {
        &self.inner().uploads_table
    }

    pub fn subuploads_table(&self) -> &str {
        &self.inner().subuploads_table
    }

    pub fn azure_speech_key(&self) -> &str {
        &self.inner().azure_speech_key
    }

    pub fn azure_service_region(&self) -> &str {
        &self.inner().azure_service_region
    }

    pub fn speech_endpoint(&self) -> Option<&str> {
        self.inner().speech_endpoint.as_deref()
    }

    pub fn speech_language(&self) -> &str {
        &self.inner().speech_language
    }

    pub fn speech_voice(&self) -> &str {
        &self.inner().speech_voice
    }

    pub fn speech_style(&self) -> &str {
        &self.inner().speech_style
    }

    pub fn speech_style_degree(&self) -> &str {
        &self.inner().speech_style_degree
    }

    pub fn speech_timeout_secs(&self) -> u64 {
        self.inner().speech_timeout_secs
    }

    pub fn speech_output_format(&self) -> &str {
        &self.inner().speech_output_format
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.inner().ffmpeg_path
    }

    pub fn audio_work_dir(&self) -> Option<&std::path::Path> {
        self.inner().audio_work_dir.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServiceConfig {
        ServiceConfig {
            company_id: "acme".to_string(),
            s3_bucket: Some("bucket".to_string()),
            s3_region: Some("ap-northeast-3".to_string()),
            dynamodb_region: Some("ap-northeast-1".to_string()),
            azure_speech_key: "key".to_string(),
            azure_service_region: "japaneast".to_string(),
            ..ServiceConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_upload_limit_is_converted_to_bytes() {
        assert_eq!(upload_limit_bytes(100).unwrap(), 100 * 1024 * 1024);
    }

    #[test]
    fn test_oversized_upload_limit_is_rejected() {
        let err = upload_limit_bytes(usize::MAX).unwrap_err();
        assert!(err.to_string().contains("MAX_UPLOAD_SIZE_MB"));
    }

    #[test]
    fn test_missing_bucket_is_rejected_for_s3() {
        let config = ServiceConfig {
            s3_bucket: None,
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_local_backend_requires_path_and_url() {
        let config = ServiceConfig {
            storage_backend: Some(StorageBackend::Local),
            local_storage_path: Some("/tmp/textcast".to_string()),
            ..valid_config()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("LOCAL_STORAGE_BASE_URL"));
    }

    #[test]
    fn test_tables_must_differ_for_dynamodb() {
        let config = ServiceConfig {
            subuploads_table: DEFAULT_UPLOADS_TABLE.to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());

        let memory = ServiceConfig {
            metadata_backend: Some(RecordBackend::Memory),
            subuploads_table: DEFAULT_UPLOADS_TABLE.to_string(),
            ..valid_config()
        };
        assert!(memory.validate().is_ok());
    }

    #[test]
    fn test_region_fallback_to_aws_region() {
        let config = Config::new(ServiceConfig {
            s3_region: None,
            dynamodb_region: None,
            aws_region: Some("us-east-1".to_string()),
            ..valid_config()
        });
        assert_eq!(config.s3_region(), Some("us-east-1"));
        assert_eq!(config.dynamodb_region(), Some("us-east-1"));
    }

    #[test]
    fn test_is_production() {
        let mut inner = valid_config();
        inner.base.environment = "PROD".to_string();
        assert!(Config::new(inner).is_production());
        assert!(!Config::new(valid_config()).is_production());
    }
}
