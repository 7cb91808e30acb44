use crate::core::calculator::PillarCalculator;
use crate::domain::model::{
    BatchEntry, BatchFailure, BatchInput, BatchResult, BirthMoment, Element, RawBirthInput,
};
use crate::domain::ports::{ConfigProvider, LunisolarConverter, Pipeline, Storage};
use crate::utils::error::{Result, SajuError};
use std::path::Path;

pub const CSV_OUTPUT_FILE: &str = "charts.csv";
pub const JSON_OUTPUT_FILE: &str = "charts.json";

/// 從 CSV 讀入生辰、計算四柱、輸出 CSV/JSON
pub struct BatchPipeline<S: Storage, C: ConfigProvider, L: LunisolarConverter> {
    storage: S,
    config: C,
    calculator: PillarCalculator<L>,
}

impl<S: Storage, C: ConfigProvider, L: LunisolarConverter> BatchPipeline<S, C, L> {
    pub fn new(storage: S, config: C, calculator: PillarCalculator<L>) -> Self {
        Self {
            storage,
            config,
            calculator,
        }
    }

    fn to_moment(&self, raw: RawBirthInput) -> Result<BirthMoment> {
        let has_calendar = raw
            .calendar
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        let mut moment = BirthMoment::try_from(raw)?;
        // 沒指定曆法時使用設定檔的預設值
        if !has_calendar {
            moment.calendar = self.config.default_calendar();
        }
        Ok(moment)
    }

    /// skip 時記下失敗並繼續；fail 時直接回傳錯誤
    fn record_failure(
        &self,
        failures: &mut Vec<BatchFailure>,
        row: usize,
        name: Option<String>,
        error: SajuError,
    ) -> Result<()> {
        if !self.config.skip_invalid_records() {
            tracing::error!("❌ Row {} failed: {}", row, error);
            return Err(error);
        }

        tracing::warn!("⚠️ Skipping row {}: {}", row, error);
        failures.push(BatchFailure {
            row,
            name,
            error: error.to_string(),
        });
        Ok(())
    }

    fn render_csv(result: &BatchResult) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            "row", "name", "solar_date", "hour", "year", "month", "day", "hour_pillar",
        ];
        header.extend(Element::ALL.iter().map(|e| e.label()));
        header.extend(["strongest", "weakest"]);
        writer.write_record(&header)?;

        for entry in &result.charts {
            let report = &entry.report;
            let mut record = vec![
                entry.row.to_string(),
                entry.name.clone().unwrap_or_default(),
                report.solar_date.to_string(),
                report.hour.to_string(),
                report.pillars.year.to_string(),
                report.pillars.month.to_string(),
                report.pillars.day.to_string(),
                report.pillars.hour.to_string(),
            ];
            record.extend(report.elements.iter().map(|(_, count)| count.to_string()));
            record.push(report.strongest.to_string());
            record.push(report.weakest.to_string());
            writer.write_record(&record)?;
        }

        writer
            .into_inner()
            .map_err(|e| SajuError::IoError(e.into_error()))
    }
}

impl<S: Storage, C: ConfigProvider, L: LunisolarConverter> Pipeline for BatchPipeline<S, C, L> {
    fn extract(&self) -> Result<BatchInput> {
        let input_path = self.config.input_path();
        tracing::debug!("Reading birth records from: {}", input_path);

        let data = self.storage.read_file(input_path)?;
        // 欄位數不一致的列交給逐列解析處理，不讓整個檔案失敗
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(data.as_slice());

        let headers = reader.headers()?.clone();
        let name_column = headers.iter().position(|h| h == "name");

        let mut input = BatchInput::default();

        // 行號從 1 開始，不含標題列
        for (index, record) in reader.records().enumerate() {
            let row = index + 1;

            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    self.record_failure(&mut input.failures, row, None, e.into())?;
                    continue;
                }
            };

            match record.deserialize::<RawBirthInput>(Some(&headers)) {
                Ok(raw) => input.records.push((row, raw)),
                Err(e) => {
                    let name = name_column
                        .and_then(|i| record.get(i))
                        .filter(|name| !name.is_empty())
                        .map(str::to_string);
                    self.record_failure(&mut input.failures, row, name, e.into())?;
                }
            }
        }

        if input.records.is_empty() && input.failures.is_empty() {
            tracing::warn!("Input file {} contains no birth records", input_path);
        }

        Ok(input)
    }

    fn transform(&self, input: BatchInput) -> Result<BatchResult> {
        let mut result = BatchResult {
            charts: Vec::with_capacity(input.records.len()),
            failures: input.failures,
        };

        for (row, raw) in input.records {
            let name = raw.name.clone();

            let outcome = self
                .to_moment(raw)
                .and_then(|moment| self.calculator.report(&moment));

            match outcome {
                Ok(report) => result.charts.push(BatchEntry { row, name, report }),
                Err(e) => self.record_failure(&mut result.failures, row, name, e)?,
            }
        }

        result.failures.sort_by_key(|failure| failure.row);
        Ok(result)
    }

    fn load(&self, result: BatchResult) -> Result<String> {
        let output_path = self.config.output_path();

        for format in self.config.output_formats() {
            match format.as_str() {
                "csv" => {
                    let data = Self::render_csv(&result)?;
                    let path = output_file(output_path, CSV_OUTPUT_FILE);
                    self.storage.write_file(&path, &data)?;
                    tracing::debug!("Wrote {} charts to {}", result.charts.len(), path);
                }
                "json" => {
                    let document = serde_json::json!({
                        "charts": result.charts,
                        "failures": result.failures,
                    });
                    let data = serde_json::to_vec_pretty(&document)?;
                    let path = output_file(output_path, JSON_OUTPUT_FILE);
                    self.storage.write_file(&path, &data)?;
                    tracing::debug!("Wrote {} charts to {}", result.charts.len(), path);
                }
                other => tracing::warn!("Ignoring unsupported output format: {}", other),
            }
        }

        Ok(output_path.to_string())
    }
}

fn output_file(output_path: &str, file_name: &str) -> String {
    Path::new(output_path)
        .join(file_name)
        .to_string_lossy()
        .into_owned()
}

/// 依序執行 extract → transform → load
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

/// 一次批次執行的摘要
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub output_path: String,
    pub processed: usize,
    pub failed: usize,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<BatchSummary> {
        tracing::info!("Starting batch chart calculation...");

        let input = self.pipeline.extract()?;
        tracing::info!(
            "Extracted {} birth records ({} unreadable)",
            input.records.len(),
            input.failures.len()
        );

        let result = self.pipeline.transform(input)?;
        let processed = result.charts.len();
        let failed = result.failures.len();
        tracing::info!("Calculated {} charts ({} skipped)", processed, failed);

        let output_path = self.pipeline.load(result)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(BatchSummary {
            output_path,
            processed,
            failed,
        })
    }
}
