use crate::utils::error::{Result, SajuError};
use crate::utils::validation::parse_integer;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 天干，順序固定為 갑을병정무기경신임계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

/// 地支，順序固定為 자축인묘진사오미신유술해
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

/// 五行。ALL 的順序同時是強弱平手時的判定順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Stem {
    pub const COUNT: usize = 10;

    pub const ALL: [Stem; Stem::COUNT] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    /// 任意整數都會先取模 10，負數也安全
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(Self::COUNT as i64) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        ["갑", "을", "병", "정", "무", "기", "경", "신", "임", "계"][self.index()]
    }

    pub fn hanja(self) -> &'static str {
        ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"][self.index()]
    }

    pub fn element(self) -> Element {
        match self {
            Stem::Gap | Stem::Eul => Element::Wood,
            Stem::Byeong | Stem::Jeong => Element::Fire,
            Stem::Mu | Stem::Gi => Element::Earth,
            Stem::Gyeong | Stem::Sin => Element::Metal,
            Stem::Im | Stem::Gye => Element::Water,
        }
    }
}

impl Branch {
    pub const COUNT: usize = 12;

    pub const ALL: [Branch; Branch::COUNT] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(Self::COUNT as i64) as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        [
            "자", "축", "인", "묘", "진", "사", "오", "미", "신", "유", "술", "해",
        ][self.index()]
    }

    pub fn hanja(self) -> &'static str {
        [
            "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
        ][self.index()]
    }

    pub fn element(self) -> Element {
        match self {
            Branch::In | Branch::Myo => Element::Wood,
            Branch::Sa | Branch::O => Element::Fire,
            Branch::Chuk | Branch::Jin | Branch::Mi | Branch::Sul => Element::Earth,
            Branch::Sin | Branch::Yu => Element::Metal,
            Branch::Ja | Branch::Hae => Element::Water,
        }
    }
}

impl Element {
    pub const COUNT: usize = 5;

    pub const ALL: [Element; Element::COUNT] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        ["목", "화", "토", "금", "수"][self.index()]
    }

    pub fn hanja(self) -> &'static str {
        ["木", "火", "土", "金", "水"][self.index()]
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Stem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl Serialize for Branch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// 一柱：天干 + 地支，輸出時為兩個字的組合（例如 "경오"）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    pub fn from_indices(stem_index: i64, branch_index: i64) -> Self {
        Self {
            stem: Stem::from_index(stem_index),
            branch: Branch::from_index(branch_index),
        }
    }

    pub fn hanja(&self) -> String {
        format!("{}{}", self.stem.hanja(), self.branch.hanja())
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem.label(), self.branch.label())
    }
}

impl Serialize for Pillar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 四柱。時柱的天干依賴日柱的天干，所以日柱一定先算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FourPillars {
    pub year: Pillar,
    pub month: Pillar,
    pub day: Pillar,
    pub hour: Pillar,
}

impl FourPillars {
    pub fn pillars(&self) -> [Pillar; 4] {
        [self.year, self.month, self.day, self.hour]
    }

    /// 日干（日主）
    pub fn day_master(&self) -> Stem {
        self.day.stem
    }

    /// 八個字各自的五行，順序為 年干、年支、月干 … 時支
    pub fn elements(&self) -> impl Iterator<Item = Element> {
        self.pillars()
            .into_iter()
            .flat_map(|p| [p.stem.element(), p.branch.element()])
    }
}

impl fmt::Display for FourPillars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.year, self.month, self.day, self.hour)
    }
}

/// 五行計數。所有計數加總一定是 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ElementTally {
    counts: [u8; Element::COUNT],
}

impl ElementTally {
    pub fn from_counts(counts: [u8; Element::COUNT]) -> Self {
        Self { counts }
    }

    pub fn increment(&mut self, element: Element) {
        self.counts[element.index()] += 1;
    }

    pub fn count(&self, element: Element) -> u8 {
        self.counts[element.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| u32::from(c)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Element, u8)> + '_ {
        Element::ALL.into_iter().map(move |e| (e, self.count(e)))
    }

    /// 最多的五行；平手時取 Element::ALL 順序中的第一個
    pub fn strongest(&self) -> Element {
        let mut best = Element::ALL[0];
        for element in Element::ALL {
            if self.count(element) > self.count(best) {
                best = element;
            }
        }
        best
    }

    /// 最少的五行；平手規則同 strongest
    pub fn weakest(&self) -> Element {
        let mut worst = Element::ALL[0];
        for element in Element::ALL {
            if self.count(element) < self.count(worst) {
                worst = element;
            }
        }
        worst
    }
}

impl Serialize for ElementTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Element::COUNT))?;
        for (element, count) in self.iter() {
            map.serialize_entry(element.label(), &count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarKind {
    #[default]
    Solar,
    Lunar,
}

impl FromStr for CalendarKind {
    type Err = SajuError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "solar" | "양력" => Ok(CalendarKind::Solar),
            "lunar" | "음력" => Ok(CalendarKind::Lunar),
            _ => Err(SajuError::invalid_input(
                "calendar",
                s,
                "Expected 'solar' or 'lunar'",
            )),
        }
    }
}

impl fmt::Display for CalendarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarKind::Solar => f.write_str("solar"),
            CalendarKind::Lunar => f.write_str("lunar"),
        }
    }
}

/// 代表「不知道出生時辰」的字樣
const UNKNOWN_HOUR_TOKENS: [&str; 3] = ["unknown", "알 수 없음", "모름"];

/// 出生時辰不明或無法解析時一律當作午時（12 點）
pub const DEFAULT_HOUR: u32 = 12;

/// 出生時辰的原始輸入
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HourInput {
    Exact(i64),
    #[default]
    Unknown,
    Text(String),
}

impl HourInput {
    /// 轉成 0..=23 的小時，永遠不會失敗
    pub fn normalize(&self) -> u32 {
        match self {
            HourInput::Exact(hour) => hour_in_range(*hour),
            HourInput::Unknown => DEFAULT_HOUR,
            HourInput::Text(text) => {
                let text = text.trim();
                if text.is_empty()
                    || UNKNOWN_HOUR_TOKENS
                        .iter()
                        .any(|token| text.eq_ignore_ascii_case(token))
                {
                    return DEFAULT_HOUR;
                }

                // "14-16" 這種區間取第一個數字
                let first = match text.split_once('-') {
                    Some((start, _)) => start,
                    None => text,
                };

                first
                    .trim()
                    .parse::<i64>()
                    .map(hour_in_range)
                    .unwrap_or(DEFAULT_HOUR)
            }
        }
    }
}

fn hour_in_range(hour: i64) -> u32 {
    u32::try_from(hour)
        .ok()
        .filter(|h| *h <= 23)
        .unwrap_or(DEFAULT_HOUR)
}

impl From<u32> for HourInput {
    fn from(hour: u32) -> Self {
        HourInput::Exact(i64::from(hour))
    }
}

impl From<i32> for HourInput {
    fn from(hour: i32) -> Self {
        HourInput::Exact(i64::from(hour))
    }
}

impl From<Option<u32>> for HourInput {
    fn from(hour: Option<u32>) -> Self {
        hour.map(HourInput::from).unwrap_or(HourInput::Unknown)
    }
}

impl From<&str> for HourInput {
    fn from(text: &str) -> Self {
        HourInput::Text(text.to_string())
    }
}

impl From<Option<FieldValue>> for HourInput {
    fn from(value: Option<FieldValue>) -> Self {
        match value {
            None => HourInput::Unknown,
            Some(FieldValue::Integer(hour)) => HourInput::Exact(hour),
            Some(FieldValue::Text(text)) => HourInput::Text(text),
        }
    }
}

/// 出生時刻。年月日在計算時才做範圍檢查
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthMoment {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: HourInput,
    pub calendar: CalendarKind,
    /// 只在陰曆輸入時有意義：指定為閏月
    pub leap_month: bool,
}

impl BirthMoment {
    pub fn solar(year: i32, month: u32, day: u32, hour: impl Into<HourInput>) -> Self {
        Self {
            year,
            month,
            day,
            hour: hour.into(),
            calendar: CalendarKind::Solar,
            leap_month: false,
        }
    }

    pub fn lunar(year: i32, month: u32, day: u32, hour: impl Into<HourInput>) -> Self {
        Self {
            calendar: CalendarKind::Lunar,
            ..Self::solar(year, month, day, hour)
        }
    }

    #[must_use]
    pub fn with_leap_month(mut self, leap_month: bool) -> Self {
        self.leap_month = leap_month;
        self
    }
}

/// JSON/CSV 欄位可能是數字也可能是字串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
}

impl FieldValue {
    fn to_integer(&self, field_name: &str) -> Result<i64> {
        match self {
            FieldValue::Integer(value) => Ok(*value),
            FieldValue::Text(text) => parse_integer(field_name, text),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(value) => write!(f, "{}", value),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// 尚未驗證的生辰資料（批次輸入、JSON 請求）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBirthInput {
    #[serde(default)]
    pub name: Option<String>,
    pub year: FieldValue,
    pub month: FieldValue,
    pub day: FieldValue,
    #[serde(default)]
    pub hour: Option<FieldValue>,
    #[serde(default)]
    pub calendar: Option<String>,
    #[serde(default)]
    pub leap_month: Option<bool>,
}

impl TryFrom<RawBirthInput> for BirthMoment {
    type Error = SajuError;

    fn try_from(raw: RawBirthInput) -> Result<Self> {
        let year = raw.year.to_integer("year")?;
        let month = raw.month.to_integer("month")?;
        let day = raw.day.to_integer("day")?;

        let calendar = match raw.calendar.as_deref().map(str::trim) {
            None | Some("") => CalendarKind::Solar,
            Some(text) => text.parse()?,
        };

        Ok(BirthMoment {
            year: i32::try_from(year)
                .map_err(|_| SajuError::invalid_input("year", year, "Value is out of range"))?,
            month: u32::try_from(month)
                .map_err(|_| SajuError::invalid_input("month", month, "Value is out of range"))?,
            day: u32::try_from(day)
                .map_err(|_| SajuError::invalid_input("day", day, "Value is out of range"))?,
            hour: HourInput::from(raw.hour),
            calendar,
            leap_month: raw.leap_month.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl SolarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl fmt::Display for SolarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub leap: bool,
}

impl LunarDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            leap: false,
        }
    }

    pub fn leap(year: i32, month: u32, day: u32) -> Self {
        Self {
            leap: true,
            ..Self::new(year, month, day)
        }
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;
        if self.leap {
            f.write_str(" (leap)")?;
        }
        Ok(())
    }
}

/// 一次計算的完整結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartReport {
    pub solar_date: SolarDate,
    pub hour: u32,
    pub pillars: FourPillars,
    pub day_master: Stem,
    pub elements: ElementTally,
    pub strongest: Element,
    pub weakest: Element,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub row: usize,
    pub name: Option<String>,
    pub report: ChartReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub row: usize,
    pub name: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub charts: Vec<BatchEntry>,
    pub failures: Vec<BatchFailure>,
}

/// 讀檔階段的結果。無法解析的列在這裡就記為失敗，不進入計算
#[derive(Debug, Clone, Default)]
pub struct BatchInput {
    /// (列號, 原始資料)，列號從 1 開始
    pub records: Vec<(usize, RawBirthInput)>,
    pub failures: Vec<BatchFailure>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_tables() {
        assert_eq!(Stem::from_index(0), Stem::Gap);
        assert_eq!(Stem::from_index(-1), Stem::Gye);
        assert_eq!(Branch::from_index(13), Branch::Chuk);
        assert_eq!(Stem::Sin.label(), Branch::Sin.label());
        assert_eq!(Stem::Sin.hanja(), "辛");
        assert_eq!(Branch::Sin.hanja(), "申");

        // 天干各兩個，地支為 2 或 3 個（土有四個）
        for element in Element::ALL {
            let stems = Stem::ALL.iter().filter(|s| s.element() == element).count();
            assert_eq!(stems, 2);
        }
        let earth = Branch::ALL
            .iter()
            .filter(|b| b.element() == Element::Earth)
            .count();
        assert_eq!(earth, 4);
    }

    #[test]
    fn test_pillar_rendering() {
        let pillar = Pillar::new(Stem::Gyeong, Branch::O);
        assert_eq!(pillar.to_string(), "경오");
        assert_eq!(pillar.hanja(), "庚午");
        assert_eq!(serde_json::to_string(&pillar).unwrap(), "\"경오\"");
    }

    #[test]
    fn test_hour_normalization() {
        assert_eq!(HourInput::Unknown.normalize(), 12);
        assert_eq!(HourInput::from(None::<u32>).normalize(), 12);
        assert_eq!(HourInput::from(7).normalize(), 7);
        assert_eq!(HourInput::from(0).normalize(), 0);
        assert_eq!(HourInput::from("14-16").normalize(), 14);
        assert_eq!(HourInput::from(" 23 - 01 ").normalize(), 23);
        assert_eq!(HourInput::from("9").normalize(), 9);
        assert_eq!(HourInput::from("abc").normalize(), 12);
        assert_eq!(HourInput::from("알 수 없음").normalize(), 12);
        assert_eq!(HourInput::from("Unknown").normalize(), 12);
        assert_eq!(HourInput::from("").normalize(), 12);
        assert_eq!(HourInput::Exact(24).normalize(), 12);
        assert_eq!(HourInput::Exact(-3).normalize(), 12);
        assert_eq!(HourInput::from("30-32").normalize(), 12);
    }

    #[test]
    fn test_tally_tie_order() {
        let tally = ElementTally::from_counts([0, 0, 8, 0, 0]);
        assert_eq!(tally.total(), 8);
        assert_eq!(tally.strongest(), Element::Earth);
        assert_eq!(tally.weakest(), Element::Wood);

        let tally = ElementTally::from_counts([2, 2, 1, 2, 1]);
        assert_eq!(tally.strongest(), Element::Wood);
        assert_eq!(tally.weakest(), Element::Earth);
    }

    #[test]
    fn test_tally_serializes_in_fixed_order() {
        let tally = ElementTally::from_counts([3, 4, 0, 1, 0]);
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"목":3,"화":4,"토":0,"금":1,"수":0}"#);
    }

    #[test]
    fn test_calendar_kind_parsing() {
        assert_eq!("Lunar".parse::<CalendarKind>().unwrap(), CalendarKind::Lunar);
        assert_eq!("양력".parse::<CalendarKind>().unwrap(), CalendarKind::Solar);
        assert!("gregorian".parse::<CalendarKind>().is_err());
    }

    #[test]
    fn test_raw_input_conversion() {
        let raw: RawBirthInput = serde_json::from_value(serde_json::json!({
            "year": "1990",
            "month": 1,
            "day": "27",
            "hour": "14-16",
            "calendar": "lunar"
        }))
        .unwrap();

        let moment = BirthMoment::try_from(raw).unwrap();
        assert_eq!(moment.year, 1990);
        assert_eq!(moment.day, 27);
        assert_eq!(moment.hour.normalize(), 14);
        assert_eq!(moment.calendar, CalendarKind::Lunar);
        assert!(!moment.leap_month);
    }

    #[test]
    fn test_raw_input_rejects_non_numeric_fields() {
        let raw: RawBirthInput = serde_json::from_value(serde_json::json!({
            "year": "nineteen ninety",
            "month": 1,
            "day": 1
        }))
        .unwrap();

        let err = BirthMoment::try_from(raw).unwrap_err();
        assert!(matches!(err, SajuError::InvalidInput { ref field, .. } if field == "year"));

        let raw: RawBirthInput = serde_json::from_value(serde_json::json!({
            "year": 1990,
            "month": -1,
            "day": 1
        }))
        .unwrap();
        assert!(BirthMoment::try_from(raw).is_err());
    }
}
