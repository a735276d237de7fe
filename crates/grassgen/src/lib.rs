pub mod blade;
pub mod config;
pub mod controls;
pub mod field;
pub mod instances;
pub mod scene;
pub mod shading;
pub mod wind;

pub use config::{ConfigError, FieldConfig, GrassGenConfig};
pub use field::{FieldOptions, GrassField};
pub use scene::{GrassLayer, SceneSurface};
