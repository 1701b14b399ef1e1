pub mod loader;
pub mod schema;

pub use loader::{CliOverrides, ConfigError, load_config, load_dotenv};
pub use schema::Config;
