pub mod batch;
pub mod cache;
pub mod calculator;
pub mod daily;
pub mod elements;
pub mod pillars;

pub use crate::domain::model::{BatchInput, BatchResult, FourPillars, RawBirthInput};
pub use crate::domain::ports::{ConfigProvider, LunisolarConverter, Pipeline, Storage};
pub use crate::utils::error::Result;
