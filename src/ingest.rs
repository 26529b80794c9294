use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::models::{DailyRecord, Mood};

/// Load-side failure taxonomy. Everything here is reported to the user as a
/// readable message; nothing downstream runs on partial data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },
    #[error("no records to analyze")]
    NoData,
}

#[derive(serde::Deserialize)]
struct CsvRow {
    #[serde(alias = "날짜")]
    date: String,
    #[serde(alias = "수면시간")]
    sleep_hours: f64,
    #[serde(alias = "공부시간")]
    study_hours: f64,
    #[serde(alias = "운동시간")]
    exercise_hours: f64,
    #[serde(alias = "기분")]
    mood: String,
}

/// Loads the record set from a CSV file, or falls back to the built-in
/// sample data when no path is given.
pub fn load_records(csv_path: Option<&Path>) -> Result<Vec<DailyRecord>, DataError> {
    match csv_path {
        None => {
            debug!("no input file supplied, using built-in sample data");
            Ok(sample_records())
        }
        Some(path) => {
            if !path.exists() {
                return Err(DataError::MissingInput(path.to_path_buf()));
            }
            let file = std::fs::File::open(path).map_err(|e| DataError::MalformedInput {
                line: 0,
                reason: format!("cannot open {}: {e}", path.display()),
            })?;
            let records = parse_reader(file)?;
            debug!(count = records.len(), "loaded records from {}", path.display());
            Ok(records)
        }
    }
}

/// Parses CSV rows into records. Accepts English or Korean column headers.
/// Rows land sorted by date ascending regardless of file order.
pub fn parse_reader<R: io::Read>(reader: R) -> Result<Vec<DailyRecord>, DataError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        // line 1 is the header row
        let line = index + 2;
        let row = result.map_err(|e| DataError::MalformedInput {
            line,
            reason: e.to_string(),
        })?;
        records.push(parse_row(line, row)?);
    }

    if records.is_empty() {
        return Err(DataError::NoData);
    }

    records.sort_by_key(|r| r.date);
    Ok(records)
}

fn parse_row(line: usize, row: CsvRow) -> Result<DailyRecord, DataError> {
    let date = parse_date(row.date.trim()).ok_or_else(|| DataError::MalformedInput {
        line,
        reason: format!("unparsable date {:?}", row.date),
    })?;

    for (name, value) in [
        ("sleep_hours", row.sleep_hours),
        ("study_hours", row.study_hours),
        ("exercise_hours", row.exercise_hours),
    ] {
        if value < 0.0 || !value.is_finite() {
            return Err(DataError::MalformedInput {
                line,
                reason: format!("{name} must be a non-negative number, got {value}"),
            });
        }
    }

    Ok(DailyRecord {
        date,
        sleep_hours: row.sleep_hours,
        study_hours: row.study_hours,
        exercise_hours: row.exercise_hours,
        mood: Mood::parse(&row.mood),
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y.%m.%d"))
        .ok()
}

/// Two weeks of literal rows used when no file is supplied.
pub fn sample_records() -> Vec<DailyRecord> {
    let rows: [(u32, f64, f64, f64, Mood); 14] = [
        (1, 7.0, 4.0, 1.0, Mood::Good),
        (2, 6.5, 5.0, 0.0, Mood::Good),
        (3, 5.0, 2.0, 0.0, Mood::Bad),
        (4, 6.0, 3.5, 0.5, Mood::Normal),
        (5, 8.0, 4.0, 1.5, Mood::Good),
        (6, 5.5, 6.0, 0.0, Mood::Normal),
        (7, 4.5, 1.0, 0.0, Mood::Bad),
        (8, 7.5, 3.0, 1.0, Mood::Good),
        (9, 6.0, 5.5, 0.5, Mood::Normal),
        (10, 7.0, 4.5, 2.0, Mood::Good),
        (11, 5.0, 2.5, 0.0, Mood::Normal),
        (12, 6.5, 5.0, 1.0, Mood::Good),
        (13, 7.0, 3.0, 0.0, Mood::Normal),
        (14, 8.0, 6.0, 1.5, Mood::Good),
    ];

    rows.into_iter()
        .map(|(day, sleep, study, exercise, mood)| DailyRecord {
            date: NaiveDate::from_ymd_opt(2026, 2, day).expect("valid sample date"),
            sleep_hours: sleep,
            study_hours: study,
            exercise_hours: exercise,
            mood,
        })
        .collect()
}

/// Writes records as a CSV with English headers, ready to re-import.
pub fn write_csv<W: io::Write>(writer: W, records: &[DailyRecord]) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["date", "sleep_hours", "study_hours", "exercise_hours", "mood"])?;
    for record in records {
        let mood = match &record.mood {
            Mood::Good => "Good",
            Mood::Normal => "Normal",
            Mood::Bad => "Bad",
            Mood::Other(label) => label.as_str(),
        };
        csv_writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            format!("{}", record.sleep_hours),
            format!("{}", record.study_hours),
            format!("{}", record.exercise_hours),
            mood.to_string(),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_english_headers() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n\
                     2026-01-01,7.5,4,1,Good\n\
                     2026-01-02,6,3,0,Bad\n";
        let records = parse_reader(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].sleep_hours, 7.5);
        assert_eq!(records[1].mood, Mood::Bad);
    }

    #[test]
    fn parses_korean_headers_and_labels() {
        let input = "날짜,수면시간,공부시간,운동시간,기분\n\
                     2026-01-01,7,4,1,좋음\n\
                     2026-01-02,6,3,0,보통\n\
                     2026-01-03,5,2,0,나쁨\n";
        let records = parse_reader(input.as_bytes()).unwrap();
        assert_eq!(records[0].mood, Mood::Good);
        assert_eq!(records[1].mood, Mood::Normal);
        assert_eq!(records[2].mood, Mood::Bad);
    }

    #[test]
    fn unknown_mood_label_is_kept_not_rejected() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n\
                     2026-01-01,7,4,1,Ecstatic\n";
        let records = parse_reader(input.as_bytes()).unwrap();
        assert_eq!(records[0].mood, Mood::Other("Ecstatic".to_string()));
    }

    #[test]
    fn negative_hours_are_malformed_with_line_number() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n\
                     2026-01-01,7,4,1,Good\n\
                     2026-01-02,-2,3,0,Bad\n";
        match parse_reader(input.as_bytes()) {
            Err(DataError::MalformedInput { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("sleep_hours"));
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_malformed() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n\
                     yesterday,7,4,1,Good\n";
        assert!(matches!(
            parse_reader(input.as_bytes()),
            Err(DataError::MalformedInput { line: 2, .. })
        ));
    }

    #[test]
    fn header_only_file_is_no_data() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n";
        assert!(matches!(parse_reader(input.as_bytes()), Err(DataError::NoData)));
    }

    #[test]
    fn rows_are_sorted_by_date() {
        let input = "date,sleep_hours,study_hours,exercise_hours,mood\n\
                     2026-01-03,5,2,0,Bad\n\
                     2026-01-01,7,4,1,Good\n";
        let records = parse_reader(input.as_bytes()).unwrap();
        assert!(records[0].date < records[1].date);
    }

    #[test]
    fn missing_file_is_reported_as_such() {
        let path = Path::new("/definitely/not/here.csv");
        assert!(matches!(
            load_records(Some(path)),
            Err(DataError::MissingInput(_))
        ));
    }

    #[test]
    fn sample_data_round_trips_through_csv() {
        let records = sample_records();
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &records).unwrap();
        let reparsed = parse_reader(buffer.as_slice()).unwrap();
        assert_eq!(reparsed, records);
    }
}
