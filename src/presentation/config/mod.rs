mod settings;

pub use settings::{
    DatabaseSettings, ExtractionSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
};
