use uuid::Uuid;

use crate::engine::EngineConfig;
use crate::error::ConfigError;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn port(&self) -> String;
    fn engine_config(&self) -> Result<EngineConfig, ConfigError>;
    fn demo_doctor_id(&self) -> Option<Uuid>;
}
