use crate::grass::scene::GrassDrawable;
use bevy::prelude::*;
use grassgen::config::DEFAULT_CONFIG_PATH;
use grassgen::{FieldOptions, GrassField, GrassGenConfig};

/// Configuration the field is built from, read once at startup
#[derive(Resource, Debug, Clone, Default)]
pub struct GrassSettings {
    pub config: GrassGenConfig,
}

impl GrassSettings {
    pub fn load() -> Self {
        Self {
            config: GrassGenConfig::load_or_default(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn field_options(&self) -> FieldOptions {
        FieldOptions {
            tick_interval: self.config.animation.tick_interval(),
            seed: self.config.animation.seed,
        }
    }
}

pub type BevyGrassField = GrassField<Handle<Mesh>, GrassDrawable>;

/// The one grass field of the app; `None` until startup has built it
#[derive(Resource, Default)]
pub struct ActiveGrassField(pub Option<BevyGrassField>);
