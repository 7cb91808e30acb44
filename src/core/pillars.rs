//! 四柱的干支推算。
//!
//! 年柱以西元 4 年為甲子起點；日柱以 [`DAY_EPOCH`] 為基準日計算天數差。
//! 所有取模都用 `rem_euclid`，基準日之前的日期也會落在合法範圍。

use crate::domain::model::{Pillar, Stem};
use crate::utils::error::{Result, SajuError};
use chrono::NaiveDate;

/// 年干支的起點：西元 4 年為甲子年
pub const YEAR_CYCLE_EPOCH: i64 = 4;

/// 日柱基準日（陽曆 1900-01-01）
pub const DAY_EPOCH: (i32, u32, u32) = (1900, 1, 1);

/// 1900-01-01 為甲戌日：天干序 0、地支序 10。
/// 已對照 1949-10-01 甲子日、2000-01-01 戊午日驗證
pub const DAY_EPOCH_STEM_OFFSET: i64 = 0;
pub const DAY_EPOCH_BRANCH_OFFSET: i64 = 10;

pub fn year_pillar(year: i32) -> Pillar {
    let offset = i64::from(year) - YEAR_CYCLE_EPOCH;
    Pillar::from_indices(offset, offset)
}

/// 月干由年干決定（重新計算年干，不依賴呼叫端傳入）；寅月對應陽曆 1 月
pub fn month_pillar(year: i32, month: u32) -> Pillar {
    let year_stem = (i64::from(year) - YEAR_CYCLE_EPOCH).rem_euclid(10);
    let month = i64::from(month);
    Pillar::from_indices(year_stem * 2 + month, month + 1)
}

/// 日期不存在（例如 2 月 30 日）時回傳 InvalidInput
pub fn day_pillar(year: i32, month: u32, day: u32) -> Result<Pillar> {
    let delta = days_since_epoch(year, month, day)?;
    Ok(Pillar::from_indices(
        delta + DAY_EPOCH_STEM_OFFSET,
        delta + DAY_EPOCH_BRANCH_OFFSET,
    ))
}

/// 每兩小時一個地支，23:00–00:59 為子時
pub fn hour_pillar(hour: u32, day_stem: Stem) -> Pillar {
    let branch = (i64::from(hour) + 1) / 2 % 12;
    let day_stem = day_stem.index() as i64;
    Pillar::from_indices(day_stem * 2 + branch, branch)
}

pub fn days_since_epoch(year: i32, month: u32, day: u32) -> Result<i64> {
    let target = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        SajuError::invalid_input(
            "date",
            format!("{:04}-{:02}-{:02}", year, month, day),
            "Date does not exist in the solar calendar",
        )
    })?;

    let (epoch_year, epoch_month, epoch_day) = DAY_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(epoch_year, epoch_month, epoch_day).ok_or_else(|| {
        SajuError::invalid_input("date", "1900-01-01", "Invalid day pillar epoch")
    })?;

    Ok((target - epoch).num_days())
}
