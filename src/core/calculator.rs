use crate::adapters::lunar_table::TableConverter;
use crate::core::elements::tally_elements;
use crate::core::pillars::{day_pillar, hour_pillar, month_pillar, year_pillar};
use crate::domain::model::{
    BirthMoment, CalendarKind, ChartReport, FourPillars, LunarDate, SolarDate,
};
use crate::domain::ports::LunisolarConverter;
use crate::utils::error::Result;
use crate::utils::validation::validate_range;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// 四柱計算器。本身沒有狀態，可在多執行緒間共用
#[derive(Debug, Clone, Default)]
pub struct PillarCalculator<C: LunisolarConverter = TableConverter> {
    converter: C,
}

impl PillarCalculator<TableConverter> {
    pub fn new() -> Self {
        Self::with_converter(TableConverter::new())
    }
}

impl<C: LunisolarConverter> PillarCalculator<C> {
    pub fn with_converter(converter: C) -> Self {
        Self { converter }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// 全有或全無：任何一步失敗都不會回傳部分結果
    pub fn calculate(&self, moment: &BirthMoment) -> Result<FourPillars> {
        let (_, _, pillars) = self.resolve(moment)?;
        Ok(pillars)
    }

    /// 四柱加上五行統計
    pub fn report(&self, moment: &BirthMoment) -> Result<ChartReport> {
        let (solar_date, hour, pillars) = self.resolve(moment)?;
        let elements = tally_elements(&pillars);

        Ok(ChartReport {
            solar_date,
            hour,
            pillars,
            day_master: pillars.day_master(),
            elements,
            strongest: elements.strongest(),
            weakest: elements.weakest(),
        })
    }

    fn resolve(&self, moment: &BirthMoment) -> Result<(SolarDate, u32, FourPillars)> {
        let hour = moment.hour.normalize();

        validate_range("year", moment.year, MIN_YEAR, MAX_YEAR)?;
        validate_range("month", moment.month, 1, 12)?;
        validate_range("day", moment.day, 1, 31)?;

        let solar = match moment.calendar {
            CalendarKind::Solar => SolarDate::new(moment.year, moment.month, moment.day),
            CalendarKind::Lunar => {
                let lunar = LunarDate {
                    year: moment.year,
                    month: moment.month,
                    day: moment.day,
                    leap: moment.leap_month,
                };
                let solar = self.converter.lunar_to_solar(lunar)?;
                tracing::debug!("Lunar {} resolved to solar {}", lunar, solar);
                solar
            }
        };

        // 日柱必須在時柱之前
        let year = year_pillar(solar.year);
        let month = month_pillar(solar.year, solar.month);
        let day = day_pillar(solar.year, solar.month, solar.day)?;
        let hour_p = hour_pillar(hour, day.stem);

        let pillars = FourPillars {
            year,
            month,
            day,
            hour: hour_p,
        };
        tracing::debug!("Calculated pillars for {} {:02}h: {}", solar, hour, pillars);

        Ok((solar, hour, pillars))
    }
}

/// 使用內建陰曆表的便捷函式
pub fn calculate_pillars(moment: &BirthMoment) -> Result<FourPillars> {
    PillarCalculator::new().calculate(moment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Element, HourInput, Stem};
    use crate::utils::error::SajuError;

    /// 永遠失敗的轉換器，用來確認錯誤會往上傳
    struct FailingConverter;

    impl LunisolarConverter for FailingConverter {
        fn lunar_to_solar(&self, date: LunarDate) -> Result<SolarDate> {
            Err(SajuError::conversion(format!("no table for {}", date)))
        }
    }

    /// 固定回傳同一天的轉換器
    struct FixedConverter(SolarDate);

    impl LunisolarConverter for FixedConverter {
        fn lunar_to_solar(&self, _date: LunarDate) -> Result<SolarDate> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_reference_chart() {
        let pillars = calculate_pillars(&BirthMoment::solar(1990, 1, 1, 12)).unwrap();
        assert_eq!(pillars.year.to_string(), "경오");
        assert_eq!(pillars.month.to_string(), "정인");
        assert_eq!(pillars.day.to_string(), "병인");
        assert_eq!(pillars.hour.to_string(), "갑오");
    }

    #[test]
    fn test_report_includes_tally() {
        let report = PillarCalculator::new()
            .report(&BirthMoment::solar(1990, 1, 1, 12))
            .unwrap();
        assert_eq!(report.day_master, Stem::Byeong);
        assert_eq!(report.elements.total(), 8);
        assert_eq!(report.strongest, Element::Fire);
        assert_eq!(report.weakest, Element::Earth);
        assert_eq!(report.hour, 12);
    }

    #[test]
    fn test_unknown_hour_defaults_to_noon() {
        let calculator = PillarCalculator::new();
        let noon = calculator.calculate(&BirthMoment::solar(1990, 1, 1, 12)).unwrap();
        let unknown = calculator
            .calculate(&BirthMoment::solar(1990, 1, 1, HourInput::Unknown))
            .unwrap();
        let garbage = calculator
            .calculate(&BirthMoment::solar(1990, 1, 1, "abc"))
            .unwrap();
        assert_eq!(noon, unknown);
        assert_eq!(noon, garbage);
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let calculator = PillarCalculator::new();
        for moment in [
            BirthMoment::solar(1990, 13, 1, 12),
            BirthMoment::solar(1990, 0, 1, 12),
            BirthMoment::solar(1990, 1, 32, 12),
            BirthMoment::solar(1899, 1, 1, 12),
            BirthMoment::solar(2101, 1, 1, 12),
            BirthMoment::solar(1990, 2, 30, 12),
        ] {
            let err = calculator.calculate(&moment).unwrap_err();
            assert!(
                matches!(err, SajuError::InvalidInput { .. }),
                "{:?} gave {:?}",
                moment,
                err
            );
        }
    }

    #[test]
    fn test_conversion_failure_propagates() {
        let calculator = PillarCalculator::with_converter(FailingConverter);
        let err = calculator
            .calculate(&BirthMoment::lunar(1990, 1, 1, 12))
            .unwrap_err();
        assert!(matches!(err, SajuError::Conversion { .. }));

        // 陽曆輸入不會呼叫轉換器
        assert!(calculator.calculate(&BirthMoment::solar(1990, 1, 1, 12)).is_ok());
    }

    #[test]
    fn test_lunar_input_uses_converted_date() {
        let converted = SolarDate::new(1990, 1, 27);
        let calculator = PillarCalculator::with_converter(FixedConverter(converted));
        let lunar = calculator
            .calculate(&BirthMoment::lunar(1990, 1, 1, 14))
            .unwrap();
        let solar = calculator
            .calculate(&BirthMoment::solar(1990, 1, 27, 14))
            .unwrap();
        assert_eq!(lunar, solar);
    }
}
