use crate::domain::model::{BirthMoment, CalendarKind};
use chrono::NaiveDate;
use std::collections::HashMap;

/// 快取鍵：完整的出生輸入。同樣的年月日，陽曆與陰曆（含閏月）是不同的鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// 正規化後的時辰，"14-16" 與 14 視為同一個鍵
    pub hour: u32,
    pub calendar: CalendarKind,
    /// 陽曆輸入一律為 false
    pub leap_month: bool,
}

impl From<&BirthMoment> for CacheKey {
    fn from(moment: &BirthMoment) -> Self {
        Self {
            year: moment.year,
            month: moment.month,
            day: moment.day,
            hour: moment.hour.normalize(),
            calendar: moment.calendar,
            leap_month: moment.calendar == CalendarKind::Lunar && moment.leap_month,
        }
    }
}

/// 以日為單位的快取：日期一換，整個快取清空。
/// 由呼叫端持有；需要跨執行緒共用時請自行包 Mutex
#[derive(Debug, Clone)]
pub struct DailyCache<V> {
    current_day: Option<NaiveDate>,
    entries: HashMap<CacheKey, V>,
}

impl<V> Default for DailyCache<V> {
    fn default() -> Self {
        Self {
            current_day: None,
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> DailyCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_day(&self) -> Option<NaiveDate> {
        self.current_day
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, today: NaiveDate, key: &CacheKey) -> Option<V> {
        self.roll_over(today);
        self.entries.get(key).cloned()
    }

    pub fn get_or_insert_with<F>(&mut self, today: NaiveDate, key: CacheKey, produce: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.roll_over(today);
        if let Some(value) = self.entries.get(&key) {
            tracing::debug!("💾 Cache hit for {:?} on {}", key, today);
            return value.clone();
        }

        tracing::debug!("🆕 Cache miss for {:?} on {}", key, today);
        let value = produce();
        self.entries.insert(key, value.clone());
        value
    }

    /// 產生失敗時不寫入快取
    pub fn get_or_try_insert_with<F, E>(
        &mut self,
        today: NaiveDate,
        key: CacheKey,
        produce: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.roll_over(today);
        if let Some(value) = self.entries.get(&key) {
            tracing::debug!("💾 Cache hit for {:?} on {}", key, today);
            return Ok(value.clone());
        }

        let value = produce()?;
        self.entries.insert(key, value.clone());
        tracing::debug!("✅ Cached {:?} (entries: {})", key, self.entries.len());
        Ok(value)
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if self.current_day != Some(today) {
            if !self.entries.is_empty() {
                tracing::info!(
                    "🗑️ Clearing {} cached entries for new day {}",
                    self.entries.len(),
                    today
                );
            }
            self.entries.clear();
            self.current_day = Some(today);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn solar_key(year: i32, month: u32, day: u32, hour: u32) -> CacheKey {
        CacheKey::from(&BirthMoment::solar(year, month, day, hour))
    }

    #[test]
    fn test_hit_within_same_day() {
        let mut cache = DailyCache::new();
        let calls = Cell::new(0);
        let key = solar_key(1990, 1, 1, 12);

        let produce = || {
            calls.set(calls.get() + 1);
            "fortune".to_string()
        };

        assert_eq!(cache.get_or_insert_with(day(19), key, produce), "fortune");
        assert_eq!(cache.get_or_insert_with(day(19), key, produce), "fortune");
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_rollover_clears_entries() {
        let mut cache = DailyCache::new();
        let key = solar_key(1990, 1, 1, 12);

        cache.get_or_insert_with(day(19), key, || 1);
        cache.get_or_insert_with(day(19), solar_key(2000, 5, 5, 8), || 2);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get(day(20), &key), None);
        assert!(cache.is_empty());
        assert_eq!(cache.current_day(), Some(day(20)));
        assert_eq!(cache.get_or_insert_with(day(20), key, || 3), 3);
    }

    #[test]
    fn test_failed_production_is_not_cached() {
        let mut cache: DailyCache<u32> = DailyCache::new();
        let key = solar_key(1990, 1, 1, 12);

        let result: Result<u32, &str> = cache.get_or_try_insert_with(day(19), key, || Err("boom"));
        assert!(result.is_err());
        assert!(cache.is_empty());

        let result: Result<u32, &str> = cache.get_or_try_insert_with(day(19), key, || Ok(7));
        assert_eq!(result, Ok(7));
        assert_eq!(cache.get(day(19), &key), Some(7));
    }

    #[test]
    fn test_key_covers_calendar_and_leap_flag() {
        let solar = CacheKey::from(&BirthMoment::solar(2023, 2, 1, 12));
        let lunar = CacheKey::from(&BirthMoment::lunar(2023, 2, 1, 12));
        let leap = CacheKey::from(&BirthMoment::lunar(2023, 2, 1, 12).with_leap_month(true));
        assert_ne!(solar, lunar);
        assert_ne!(lunar, leap);

        // 陽曆沒有閏月，旗標不影響鍵
        let solar_flagged = CacheKey::from(&BirthMoment::solar(2023, 2, 1, 12).with_leap_month(true));
        assert_eq!(solar, solar_flagged);

        // 時辰先正規化
        assert_eq!(solar, CacheKey::from(&BirthMoment::solar(2023, 2, 1, "12-14")));

        let mut cache = DailyCache::new();
        cache.get_or_insert_with(day(19), solar, || "solar");
        assert_eq!(cache.get_or_insert_with(day(19), lunar, || "lunar"), "lunar");
        assert_eq!(cache.get_or_insert_with(day(19), leap, || "leap"), "leap");
        assert_eq!(cache.len(), 3);
    }
}
