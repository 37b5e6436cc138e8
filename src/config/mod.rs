pub mod settings;

pub use settings::{
    ApiSettings, AppSettings, ChainSettings, NarrativeSettings, PublisherSettings,
    ScoringSettings, Settings,
};
