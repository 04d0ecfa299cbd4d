//! Session construction errors.

use hecs::Entity;
use scrubbot_logic::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("entity {0:?} is not a cleaning agent")]
    NotAnAgent(Entity),
    #[error("entity {0:?} is not a surface")]
    NotASurface(Entity),
}
