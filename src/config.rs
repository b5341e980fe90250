// invoice-pdf-service/src/config.rs

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub templates: TemplateConfig,
    pub pdf: PdfConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    pub path: String,
    pub escape_html: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
    pub binary: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Directory holding the engine's native runtime, prepended to the child `PATH`.
    pub runtime_path: Option<String>,
}

/// Where the GTK+ runtime usually lives for a MSYS2 WeasyPrint install.
#[cfg(windows)]
pub const DEFAULT_RUNTIME_PATH: Option<&str> = Some("C:\\msys64\\mingw64\\bin");
#[cfg(not(windows))]
pub const DEFAULT_RUNTIME_PATH: Option<&str> = None;

pub const DEFAULT_ALLOWED_ORIGINS: &[&str] =
    &["http://localhost:8000", "http://127.0.0.1:8001", "null"];

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            // Start with default values
            .set_default("service.name", "invoice-pdf-service")?
            .set_default("service.log_level", "info")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000_i64)?
            .set_default("cors.allowed_origins", DEFAULT_ALLOWED_ORIGINS.to_vec())?
            .set_default("templates.path", "./templates/invoice.html.hbs")?
            .set_default("templates.escape_html", false)?
            .set_default("pdf.binary", "weasyprint")?
            .set_default("pdf.extra_args", Vec::<String>::new())?;

        if let Some(path) = DEFAULT_RUNTIME_PATH {
            builder = builder.set_default("pdf.runtime_path", path)?;
        }

        let config = builder
            // Load from config file if it exists
            .add_source(File::with_name("config").required(false))
            // Override with environment variables (e.g., INVOICE__SERVER__PORT)
            .add_source(
                Environment::with_prefix("INVOICE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("pdf.extra_args")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
