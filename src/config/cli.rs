use crate::domain::model::{CalendarKind, FieldValue, RawBirthInput};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "saju-calc")]
#[command(about = "Four pillars (saju) birth chart calculator")]
pub struct CliConfig {
    #[arg(long, help = "Birth year (1900-2100)")]
    pub year: String,

    #[arg(long, help = "Birth month (1-12)")]
    pub month: String,

    #[arg(long, help = "Birth day (1-31)")]
    pub day: String,

    #[arg(long, help = "Birth hour: 0-23, a range such as 14-16, or 'unknown'")]
    pub hour: Option<String>,

    #[arg(long, default_value = "solar", help = "Calendar of the given date: solar or lunar")]
    pub calendar: String,

    #[arg(long, help = "The lunar date falls in the intercalary (leap) month")]
    pub leap_month: bool,

    #[arg(long, help = "Include today's lucky numbers, color and risks")]
    pub luck: bool,

    #[arg(long, help = "Print the result as JSON")]
    pub json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn to_raw_input(&self) -> RawBirthInput {
        RawBirthInput {
            name: None,
            year: FieldValue::Text(self.year.clone()),
            month: FieldValue::Text(self.month.clone()),
            day: FieldValue::Text(self.day.clone()),
            hour: self.hour.clone().map(FieldValue::Text),
            calendar: Some(self.calendar.clone()),
            leap_month: Some(self.leap_month),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        self.calendar.parse::<CalendarKind>()?;
        Ok(())
    }
}
