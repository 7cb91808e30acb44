use crate::domain::model::{BatchInput, BatchResult, CalendarKind, LunarDate, SolarDate};
use crate::utils::error::Result;

/// 陰曆轉陽曆。唯一的失敗情況是 SajuError::Conversion
pub trait LunisolarConverter: Send + Sync {
    fn lunar_to_solar(&self, date: LunarDate) -> Result<SolarDate>;
}

impl<T: LunisolarConverter + ?Sized> LunisolarConverter for &T {
    fn lunar_to_solar(&self, date: LunarDate) -> Result<SolarDate> {
        (**self).lunar_to_solar(date)
    }
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn default_calendar(&self) -> CalendarKind;
    fn skip_invalid_records(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<BatchInput>;
    fn transform(&self, input: BatchInput) -> Result<BatchResult>;
    fn load(&self, result: BatchResult) -> Result<String>;
}
