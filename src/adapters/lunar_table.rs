use crate::domain::model::{LunarDate, SolarDate};
use crate::domain::ports::LunisolarConverter;
use crate::utils::error::{Result, SajuError};
use chrono::{Datelike, Days, NaiveDate};

pub const MIN_LUNAR_YEAR: i32 = 1900;
pub const MAX_LUNAR_YEAR: i32 = 2100;

/// 陰曆 1900 年正月初一 = 陽曆 1900-01-31
const BASE_SOLAR: (i32, u32, u32) = (1900, 1, 31);

// 每年一個值：
//   bit 0-3   閏月月份（0 表示無閏月）
//   bit 4-15  正月到十二月是否為大月（bit 15 = 正月），大月 30 天、小月 29 天
//   bit 16    閏月是否為大月
const LUNAR_INFO: [u32; (MAX_LUNAR_YEAR - MIN_LUNAR_YEAR + 1) as usize] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520, // 2100
];

/// 內建的查表式陰陽曆轉換器，支援陰曆 1900–2100 年
#[derive(Debug, Clone, Copy, Default)]
pub struct TableConverter;

impl TableConverter {
    pub fn new() -> Self {
        Self
    }

    /// 該年的閏月月份，沒有閏月時回傳 None
    pub fn leap_month(&self, year: i32) -> Option<u32> {
        let leap = year_info(year)? & 0xf;
        (leap != 0).then_some(leap)
    }

    /// 某個陰曆月份的天數；月份不存在時回傳 None
    pub fn month_days(&self, year: i32, month: u32, leap: bool) -> Option<u32> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if leap {
            return (self.leap_month(year) == Some(month)).then(|| leap_month_len(year));
        }
        year_info(year).map(|_| regular_month_len(year, month))
    }

    pub fn solar_to_lunar(&self, date: SolarDate) -> Result<LunarDate> {
        let target = NaiveDate::from_ymd_opt(date.year, date.month, date.day)
            .ok_or_else(|| SajuError::conversion(format!("{} is not a valid solar date", date)))?;
        let base = base_date()?;

        let mut offset = u32::try_from((target - base).num_days()).map_err(|_| {
            SajuError::conversion(format!("{} is before the supported range", date))
        })?;

        let mut year = MIN_LUNAR_YEAR;
        while year <= MAX_LUNAR_YEAR && offset >= year_len(year) {
            offset -= year_len(year);
            year += 1;
        }
        if year > MAX_LUNAR_YEAR {
            return Err(SajuError::conversion(format!(
                "{} is after the supported range",
                date
            )));
        }

        let leap_month = self.leap_month(year);
        for month in 1..=12 {
            let days = regular_month_len(year, month);
            if offset < days {
                return Ok(LunarDate::new(year, month, offset + 1));
            }
            offset -= days;

            if leap_month == Some(month) {
                let days = leap_month_len(year);
                if offset < days {
                    return Ok(LunarDate::leap(year, month, offset + 1));
                }
                offset -= days;
            }
        }

        Err(SajuError::conversion(format!(
            "{} could not be located in lunar year {}",
            date, year
        )))
    }
}

impl LunisolarConverter for TableConverter {
    fn lunar_to_solar(&self, date: LunarDate) -> Result<SolarDate> {
        if !(MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&date.year) {
            return Err(SajuError::conversion(format!(
                "lunar year {} is outside the supported range {}-{}",
                date.year, MIN_LUNAR_YEAR, MAX_LUNAR_YEAR
            )));
        }

        let month_len = self.month_days(date.year, date.month, date.leap).ok_or_else(|| {
            if date.leap {
                SajuError::conversion(format!(
                    "lunar year {} has no leap month {}",
                    date.year, date.month
                ))
            } else {
                SajuError::conversion(format!("lunar month {} does not exist", date.month))
            }
        })?;

        if date.day < 1 || date.day > month_len {
            return Err(SajuError::conversion(format!(
                "lunar {} has only {} days",
                date, month_len
            )));
        }

        let mut offset: u64 = (MIN_LUNAR_YEAR..date.year)
            .map(|y| u64::from(year_len(y)))
            .sum();

        let leap_month = self.leap_month(date.year);
        for month in 1..date.month {
            offset += u64::from(regular_month_len(date.year, month));
            if leap_month == Some(month) {
                offset += u64::from(leap_month_len(date.year));
            }
        }
        // 閏月排在同名的平月之後
        if date.leap {
            offset += u64::from(regular_month_len(date.year, date.month));
        }
        offset += u64::from(date.day - 1);

        let solar = base_date()?
            .checked_add_days(Days::new(offset))
            .ok_or_else(|| SajuError::conversion(format!("{} overflows the solar calendar", date)))?;

        tracing::debug!("Converted lunar {} to solar {}", date, solar);

        Ok(SolarDate::new(solar.year(), solar.month(), solar.day()))
    }
}

fn base_date() -> Result<NaiveDate> {
    let (year, month, day) = BASE_SOLAR;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| SajuError::conversion("invalid lunar table base date"))
}

fn year_info(year: i32) -> Option<u32> {
    let index = usize::try_from(year.checked_sub(MIN_LUNAR_YEAR)?).ok()?;
    LUNAR_INFO.get(index).copied()
}

// 以下函式只在 year_info 有值時呼叫
fn regular_month_len(year: i32, month: u32) -> u32 {
    let info = year_info(year).unwrap_or_default();
    if info & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

fn leap_month_len(year: i32) -> u32 {
    let info = year_info(year).unwrap_or_default();
    if info & 0xf == 0 {
        0
    } else if info & 0x10000 != 0 {
        30
    } else {
        29
    }
}

fn year_len(year: i32) -> u32 {
    (1..=12).map(|m| regular_month_len(year, m)).sum::<u32>() + leap_month_len(year)
}
