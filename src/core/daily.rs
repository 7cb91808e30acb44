//! 每日幸運號碼、幸運色與注意事項。
//!
//! 結果只由日期決定：以 ISO 日期字串的 SHA-256 作為亂數種子，同一天（同一版本的程式）
//! 永遠得到相同輸出。這部分只是展示用的點綴，不屬於四柱計算。

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::Serialize;
use sha2::{Digest, Sha256};

pub const LUCKY_NUMBER_MAX: usize = 45;
pub const LUCKY_NUMBER_COUNT: usize = 7;
pub const RISK_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LuckyColor {
    pub name: &'static str,
    pub hex: &'static str,
}

const LUCKY_COLORS: [LuckyColor; 3] = [
    LuckyColor {
        name: "로얄 퍼플",
        hex: "#6B46C1",
    },
    LuckyColor {
        name: "라벤더 골드",
        hex: "#9F7AEA",
    },
    LuckyColor {
        name: "트와일라잇 퍼플",
        hex: "#7C3AED",
    },
];

const DAILY_RISKS: [&str; 5] = ["계단", "물웅덩이", "서두름", "날카로운 물건", "차량"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyLuck {
    pub date: NaiveDate,
    /// 1..=45 之間 7 個不重複號碼，由小到大
    pub lucky_numbers: Vec<u8>,
    pub lucky_color: LuckyColor,
    pub risks: Vec<&'static str>,
}

pub fn daily_luck(date: NaiveDate) -> DailyLuck {
    let seed = seed_for(date);
    let mut rng = StdRng::from_seed(seed);

    let mut lucky_numbers: Vec<u8> = index::sample(&mut rng, LUCKY_NUMBER_MAX, LUCKY_NUMBER_COUNT)
        .into_iter()
        .filter_map(|i| u8::try_from(i + 1).ok())
        .collect();
    lucky_numbers.sort_unstable();

    let risks = index::sample(&mut rng, DAILY_RISKS.len(), RISK_COUNT)
        .into_iter()
        .map(|i| DAILY_RISKS[i])
        .collect();

    let color_key = seed[..8]
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));
    let lucky_color = LUCKY_COLORS[(color_key % LUCKY_COLORS.len() as u64) as usize];

    DailyLuck {
        date,
        lucky_numbers,
        lucky_color,
        risks,
    }
}

fn seed_for(date: NaiveDate) -> [u8; 32] {
    let digest = Sha256::digest(date.format("%Y-%m-%d").to_string().as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    seed
}
