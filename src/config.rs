//! Configuration management for hazmap.
//!
//! This module handles the layered configuration system with the following
//! precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::dataset::LayerId;
use crate::error::{HazmapError, Result};
use crate::scale::get_colormap;

/// Command-line arguments for hazmap
#[derive(Parser, Debug)]
#[command(name = "hazmap")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding `<key>_geodata.json` dataset files
    pub data_dir: PathBuf,

    /// Dataset key to load at startup
    #[arg(short, long, env = "HAZMAP_DATASET")]
    pub dataset: Option<String>,

    /// Host address to bind to
    #[arg(short = 'H', long, env = "HAZMAP_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "HAZMAP_PORT", default_value = "8000")]
    pub port: u16,

    /// Number of worker threads
    #[arg(short, long, env = "HAZMAP_WORKERS")]
    pub workers: Option<usize>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "HAZMAP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HAZMAP_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Map view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Administrative layer ids the view can switch between
    #[serde(default = "default_layers")]
    pub layers: Vec<LayerId>,

    /// Initially-active layer
    #[serde(default = "default_layer")]
    pub default_layer: LayerId,

    /// Palette used for the choropleth fill
    #[serde(default = "default_colormap")]
    pub colormap: String,

    /// Number of legend classes
    #[serde(default = "default_legend_classes")]
    pub legend_classes: usize,
}

/// Dataset source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding dataset files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Dataset key to load at startup
    #[serde(default)]
    pub initial_dataset: Option<String>,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Map view configuration
    #[serde(default)]
    pub map: MapConfig,

    /// Dataset source configuration
    #[serde(default)]
    pub data: DataConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, PathBuf)> {
        let args = Args::parse();

        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        config.server.host = args.host;
        config.server.port = args.port;
        if args.workers.is_some() {
            config.server.workers = args.workers;
        }
        if args.dataset.is_some() {
            config.data.initial_dataset = args.dataset;
        }
        config.log_level = args.log_level;

        // Data directory from the command line takes precedence
        let data_dir = args.data_dir;

        Ok((config, data_dir))
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.server.host = other.server.host;
        self.server.port = other.server.port;
        if other.server.workers.is_some() {
            self.server.workers = other.server.workers;
        }
        self.map = other.map;
        self.data = other.data;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate server host (must be a valid IP or hostname)
        if self.server.host.is_empty() {
            return Err(HazmapError::Config {
                message: "Server host cannot be empty".to_string(),
            });
        }

        // Validate port (0 is not a valid port for users)
        if self.server.port == 0 {
            return Err(HazmapError::Config {
                message: "Server port cannot be 0".to_string(),
            });
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(HazmapError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Validate the layer set
        if self.map.layers.is_empty() {
            return Err(HazmapError::Config {
                message: "At least one administrative layer must be configured".to_string(),
            });
        }
        if !self.map.layers.contains(&self.map.default_layer) {
            return Err(HazmapError::Config {
                message: format!(
                    "Default layer {} is not among the configured layers {:?}",
                    self.map.default_layer, self.map.layers
                ),
            });
        }

        // Validate the palette name
        get_colormap(&self.map.colormap).map_err(|_| HazmapError::Config {
            message: format!("Unknown colormap: {}", self.map.colormap),
        })?;

        if self.map.legend_classes == 0 {
            return Err(HazmapError::Config {
                message: "Legend must have at least one class".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            map: MapConfig::default(),
            data: DataConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            layers: default_layers(),
            default_layer: default_layer(),
            colormap: default_colormap(),
            legend_classes: default_legend_classes(),
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_layers() -> Vec<LayerId> {
    vec![0, 1, 2]
}

fn default_layer() -> LayerId {
    1
}

fn default_colormap() -> String {
    "rdylgn".to_string()
}

fn default_legend_classes() -> usize {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}
