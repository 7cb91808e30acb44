use clap::Parser;
use saju_calc::core::daily::DailyLuck;
use saju_calc::utils::{logger, validation::Validate};
use saju_calc::{
    daily_luck, BirthMoment, ChartReport, CliConfig, Element, LunarDate, PillarCalculator,
    SajuError,
};
use std::fmt::{self, Write};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting saju-calc");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Argument validation failed: {}", e);
        exit_with(&e);
    }

    match run(&config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e);
        }
    }
}

fn run(config: &CliConfig) -> saju_calc::Result<String> {
    let moment = BirthMoment::try_from(config.to_raw_input())?;
    let calculator = PillarCalculator::new();
    let report = calculator.report(&moment)?;

    // 顯示用的陰曆日期，轉換失敗不影響結果
    let lunar = calculator
        .converter()
        .solar_to_lunar(report.solar_date)
        .ok();
    let luck = config
        .luck
        .then(|| daily_luck(chrono::Local::now().date_naive()));

    if config.json {
        let document = serde_json::json!({
            "chart": report,
            "lunar_date": lunar,
            "daily_luck": luck,
        });
        return Ok(serde_json::to_string_pretty(&document)?);
    }

    render_text(&report, lunar.as_ref(), luck.as_ref())
        .map_err(|e| SajuError::IoError(std::io::Error::other(e)))
}

fn render_text(
    report: &ChartReport,
    lunar: Option<&LunarDate>,
    luck: Option<&DailyLuck>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let pillars = &report.pillars;

    writeln!(out, "🗓️  Solar date: {} {:02}h", report.solar_date, report.hour)?;
    if let Some(lunar) = lunar {
        writeln!(out, "🌙 Lunar date: {}", lunar)?;
    }
    writeln!(out)?;
    writeln!(out, "     시   일   월   년")?;
    writeln!(
        out,
        "    {} {} {} {}",
        pillars.hour, pillars.day, pillars.month, pillars.year
    )?;
    writeln!(
        out,
        "    {} {} {} {}",
        pillars.hour.hanja(),
        pillars.day.hanja(),
        pillars.month.hanja(),
        pillars.year.hanja()
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "☯️  Day master: {} ({})",
        report.day_master,
        report.day_master.hanja()
    )?;

    let counts: Vec<String> = report
        .elements
        .iter()
        .map(|(element, count)| format!("{}({}) {}", element, element.hanja(), count))
        .collect();
    writeln!(out, "🎨 Elements: {}", counts.join("  "))?;
    writeln!(
        out,
        "   Strongest: {}  Weakest: {}",
        describe(report.strongest),
        describe(report.weakest)
    )?;

    if let Some(luck) = luck {
        let numbers: Vec<String> = luck.lucky_numbers.iter().map(u8::to_string).collect();
        writeln!(out)?;
        writeln!(out, "🍀 Lucky numbers ({}): {}", luck.date, numbers.join(", "))?;
        writeln!(
            out,
            "🎨 Lucky color: {} {}",
            luck.lucky_color.name, luck.lucky_color.hex
        )?;
        writeln!(out, "⚠️  Watch out for: {}", luck.risks.join(", "))?;
    }

    Ok(out.trim_end().to_string())
}

fn describe(element: Element) -> String {
    format!("{}({})", element, element.hanja())
}

fn exit_with(e: &SajuError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_lists_pillars_from_hour_to_year() {
        let report = PillarCalculator::new()
            .report(&BirthMoment::solar(1990, 1, 1, 12))
            .unwrap();
        let lunar = LunarDate::new(1989, 12, 5);
        let luck = daily_luck(chrono::NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());

        let text = render_text(&report, Some(&lunar), Some(&luck)).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "🗓️  Solar date: 1990-01-01 12h");
        assert_eq!(lines[1], "🌙 Lunar date: 1989-12-05");
        assert_eq!(lines[4].trim(), "갑오 병인 정인 경오");
        assert_eq!(lines[5].trim(), "甲午 丙寅 丁寅 庚午");
        assert!(text.contains("☯️  Day master: 병 (丙)"));
        assert!(text.contains("Strongest: 화(火)  Weakest: 토(土)"));
        assert!(text.contains("🍀 Lucky numbers (2026-10-19)"));
    }

    #[test]
    fn test_render_text_without_optional_sections() {
        let report = PillarCalculator::new()
            .report(&BirthMoment::solar(2000, 1, 1, 0))
            .unwrap();
        let text = render_text(&report, None, None).unwrap();

        assert!(!text.contains("Lunar date"));
        assert!(!text.contains("Lucky"));
        assert!(text.ends_with("Weakest: 목(木)"));
    }
}
