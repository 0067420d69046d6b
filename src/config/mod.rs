pub mod toml_config;

use crate::core::chart::SeatChart;
use crate::core::reference::ReferenceAllocator;
use crate::core::render::RenderOptions;
#[cfg(feature = "cli")]
use crate::core::render::RedactionPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use toml_config::{StoreKind, TomlConfig};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "seat-booking")]
#[command(about = "Seat booking desk for an 80-row cabin")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Booking store file (overrides store.path)
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Keep bookings in memory only
    #[arg(long)]
    pub in_memory: bool,

    /// Show booking references in the seating chart
    #[arg(long)]
    pub reveal_references: bool,

    /// Book seats without asking for passenger details
    #[arg(long)]
    pub no_passenger_details: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Runtime settings resolved from defaults, the TOML file and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_kind: StoreKind,
    pub store_path: PathBuf,
    pub render: RenderOptions,
    pub max_attempts: u32,
    pub seed: Option<u64>,
    pub collect_passenger_details: bool,
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_toml(&TomlConfig::default())
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        Self {
            store_kind: config.store.kind,
            store_path: PathBuf::from(&config.store.path),
            render: RenderOptions {
                policy: config.display.policy(),
                booked_marker: config.display.booked_marker,
            },
            max_attempts: config.reference.max_attempts,
            seed: config.reference.seed,
            collect_passenger_details: config.booking.collect_passenger_details,
            log_level: config.logging.level.clone(),
        }
    }

    /// Loads the TOML file named on the command line, if any, then applies
    /// the flag overrides.
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig) -> Result<Self> {
        let mut settings = match &cli.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Self::from_toml(&config)
            }
            None => Self::default(),
        };
        settings.apply_cli(cli);
        Ok(settings)
    }

    #[cfg(feature = "cli")]
    pub fn apply_cli(&mut self, cli: &CliConfig) {
        if let Some(path) = &cli.store {
            self.store_kind = StoreKind::Json;
            self.store_path = path.clone();
        }
        if cli.in_memory {
            self.store_kind = StoreKind::Memory;
        }
        if cli.reveal_references {
            self.render.policy = RedactionPolicy::Reveal;
        }
        if cli.no_passenger_details {
            self.collect_passenger_details = false;
        }
    }

    pub fn allocator(&self) -> ReferenceAllocator {
        let allocator = match self.seed {
            Some(seed) => ReferenceAllocator::seeded(seed),
            None => ReferenceAllocator::new(),
        };
        allocator.with_max_attempts(self.max_attempts)
    }

    pub fn chart(&self) -> SeatChart {
        SeatChart::with_allocator(self.allocator())
    }
}
