pub mod config;
pub mod metrics;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, ServerConfig, StorageConfig,
};
pub use ticket::{CreateTicketRequest, JsonTicketStore, Ticket, TicketError, TicketStore};
