pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{LocalStorage, TableConverter};
pub use core::batch::{BatchEngine, BatchPipeline, BatchSummary};
pub use core::cache::{CacheKey, DailyCache};
pub use core::calculator::{calculate_pillars, PillarCalculator};
pub use core::daily::{daily_luck, DailyLuck};
pub use core::elements::tally_elements;
pub use core::pillars::{day_pillar, hour_pillar, month_pillar, year_pillar};
pub use domain::model::{
    BirthMoment, Branch, CalendarKind, ChartReport, Element, ElementTally, FourPillars,
    HourInput, LunarDate, Pillar, RawBirthInput, SolarDate, Stem,
};
pub use domain::ports::LunisolarConverter;
pub use utils::error::{Result, SajuError};
