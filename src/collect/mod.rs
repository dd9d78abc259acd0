//! Collector: merge the `PR` and `GHI` trees into one date-sorted record set.
//!
//! Walk order:
//! 1. periods under `PR/`, sorted; a period missing under `GHI/` is skipped
//! 2. files within a period, sorted; a name missing under `GHI/<period>/` is skipped
//! 3. each pair is parsed and its rows zipped into `DailyRecord`s
//! 4. the full sequence is stably sorted by date
//!
//! Skips are silent apart from `debug` events. Parse and alignment failures
//! abort the whole merge; nothing is written by this module.

use std::ffi::OsString;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{CollectConfig, CollectReport, Collected, DailyRecord, GHI_FAMILY_DIR, PR_FAMILY_DIR, PairingMode};
use crate::error::AppError;
use crate::io::ingest::{DateColumn, MetricFile, read_metric_file};

pub mod walk;

use walk::{EntryKind, FamilyRoots, sorted_entry_names};

/// A PR file and its same-named GHI counterpart.
#[derive(Debug, Clone)]
struct FilePair {
    period: OsString,
    pr: PathBuf,
    ghi: PathBuf,
}

/// Walk the data root and return merged, date-sorted records.
pub fn collect(config: &CollectConfig) -> Result<Collected, AppError> {
    let roots = FamilyRoots::resolve(&config.root_path, PR_FAMILY_DIR, GHI_FAMILY_DIR)?;

    let mut report = CollectReport::default();
    let pairs = enumerate_pairs(&roots, &mut report)?;

    // Parse pairs in parallel; `collect` keeps input order, and the first
    // error in walk order wins so failures are reproducible.
    let parsed: Vec<Result<Vec<DailyRecord>, AppError>> =
        pairs.par_iter().map(|pair| read_pair(pair, config)).collect();

    let mut records = Vec::new();
    for (pair, rows) in pairs.iter().zip(parsed) {
        let rows = rows?;
        debug!(period = %pair.period.to_string_lossy(), file = %pair.pr.display(), rows = rows.len(), "Paired file");
        records.extend(rows);
    }

    // Stable: duplicate dates keep walk order.
    records.sort_by_key(|r| r.date);
    report.records = records.len();

    info!(
        records = report.records,
        periods = report.periods_visited,
        periods_skipped = report.periods_skipped,
        files = report.files_paired,
        files_skipped = report.files_skipped,
        "Collection complete"
    );

    Ok(Collected { records, report })
}

fn enumerate_pairs(roots: &FamilyRoots, report: &mut CollectReport) -> Result<Vec<FilePair>, AppError> {
    let mut pairs = Vec::new();

    for period in sorted_entry_names(&roots.pr, EntryKind::Dir)? {
        let pr_dir = roots.pr.join(&period);
        let ghi_dir = roots.ghi.join(&period);
        if !ghi_dir.is_dir() {
            debug!(period = %period.to_string_lossy(), "No GHI counterpart for period; skipping");
            report.periods_skipped += 1;
            continue;
        }
        report.periods_visited += 1;

        for name in sorted_entry_names(&pr_dir, EntryKind::File)? {
            let ghi = ghi_dir.join(&name);
            if !ghi.is_file() {
                debug!(period = %period.to_string_lossy(), file = %name.to_string_lossy(), "No GHI counterpart for file; skipping");
                report.files_skipped += 1;
                continue;
            }
            report.files_paired += 1;
            pairs.push(FilePair {
                period: period.clone(),
                pr: pr_dir.join(&name),
                ghi,
            });
        }
    }

    Ok(pairs)
}

fn read_pair(pair: &FilePair, config: &CollectConfig) -> Result<Vec<DailyRecord>, AppError> {
    let ghi_dates = match config.pairing {
        PairingMode::Strict => DateColumn::Parse,
        PairingMode::Truncate => DateColumn::Ignore,
    };
    let pr = read_metric_file(&pair.pr, &config.pr_column, DateColumn::Parse)?;
    let ghi = read_metric_file(&pair.ghi, &config.ghi_column, ghi_dates)?;
    zip_rows(&pr, &ghi, config.pairing)
}

/// Combine a PR file and a GHI file into daily records.
///
/// Dates always come from the PR file. In `Strict` mode the GHI dates must
/// match row-for-row; in `Truncate` mode rows are zipped positionally.
pub fn zip_rows(pr: &MetricFile, ghi: &MetricFile, mode: PairingMode) -> Result<Vec<DailyRecord>, AppError> {
    let pr_dates = pr
        .dates
        .as_deref()
        .ok_or_else(|| AppError::parse(&pr.path, None, "Date column was not parsed."))?;

    if mode == PairingMode::Strict {
        let ghi_dates = ghi
            .dates
            .as_deref()
            .ok_or_else(|| AppError::parse(&ghi.path, None, "Date column was not parsed."))?;
        check_alignment(pr, pr_dates, ghi, ghi_dates)?;
    }

    Ok(pr_dates
        .iter()
        .zip(&pr.values)
        .zip(&ghi.values)
        .map(|((&date, &pr), &ghi)| DailyRecord { date, ghi, pr })
        .collect())
}

fn check_alignment(
    pr: &MetricFile,
    pr_dates: &[chrono::NaiveDate],
    ghi: &MetricFile,
    ghi_dates: &[chrono::NaiveDate],
) -> Result<(), AppError> {
    let rows = pr_dates.len().max(ghi_dates.len());
    for i in 0..rows {
        let pr_date = pr_dates.get(i).copied();
        let ghi_date = ghi_dates.get(i).copied();
        if pr_date != ghi_date {
            return Err(AppError::Alignment {
                pr_path: pr.path.clone(),
                ghi_path: ghi.path.clone(),
                row: i + 1,
                pr_date,
                ghi_date,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use std::path::Path;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn put(root: &Path, family: &str, period: &str, file: &str, body: &str) {
        let dir = root.join(family).join(period);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file), body).unwrap();
    }

    fn metric(path: &str, dates: Option<Vec<NaiveDate>>, values: Vec<f64>) -> MetricFile {
        MetricFile {
            path: PathBuf::from(path),
            value_column: "v".to_string(),
            dates,
            values,
        }
    }

    #[test]
    fn missing_family_root_is_structural_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("GHI")).unwrap();

        let err = collect(&CollectConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, AppError::Structural { .. }));
        assert!(err.to_string().contains("PR"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_names_are_paired() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let name = OsStr::from_bytes(b"caf\xe9.csv");
        for (family, body) in [("PR", "Date,PR\n2023-01-01,70\n"), ("GHI", "Date,GHI\n2023-01-01,3\n")] {
            let period = dir.path().join(family).join("2023-01");
            fs::create_dir_all(&period).unwrap();
            // Some filesystems reject non-UTF-8 names; nothing to check there.
            if fs::write(period.join(name), body).is_err() {
                return;
            }
        }

        let out = collect(&CollectConfig::new(dir.path())).unwrap();
        assert_eq!(out.records, vec![DailyRecord { date: d(2023, 1, 1), ghi: 3.0, pr: 70.0 }]);
        assert_eq!(out.report.files_paired, 1);
    }

    #[test]
    fn period_present_in_one_family_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        put(dir.path(), "PR", "2023-01", "a.csv", "Date,PR\n2023-01-01,70\n");
        put(dir.path(), "GHI", "2023-01", "a.csv", "Date,GHI\n2023-01-01,3\n");
        put(dir.path(), "PR", "2023-02", "a.csv", "Date,PR\n2023-02-01,71\n");

        let out = collect(&CollectConfig::new(dir.path())).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].date, d(2023, 1, 1));
        assert_eq!(out.report.periods_visited, 1);
        assert_eq!(out.report.periods_skipped, 1);
    }

    #[test]
    fn file_present_in_one_family_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        put(dir.path(), "PR", "2023-01", "a.csv", "Date,PR\n2023-01-01,70\n");
        put(dir.path(), "PR", "2023-01", "b.csv", "Date,PR\n2023-01-06,72\n");
        put(dir.path(), "GHI", "2023-01", "a.csv", "Date,GHI\n2023-01-01,3\n");
        put(dir.path(), "GHI", "2023-01", "c.csv", "Date,GHI\n2023-01-11,3\n");

        let out = collect(&CollectConfig::new(dir.path())).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.report.files_paired, 1);
        assert_eq!(out.report.files_skipped, 1);
    }

    #[test]
    fn output_is_date_sorted_and_duplicates_kept_in_walk_order() {
        let dir = tempfile::tempdir().unwrap();
        // "b.csv" sorts after "a.csv" but holds earlier dates.
        put(dir.path(), "PR", "2023-01", "a.csv", "Date,PR\n2023-01-05,1\n2023-01-06,2\n");
        put(dir.path(), "GHI", "2023-01", "a.csv", "Date,GHI\n2023-01-05,1\n2023-01-06,1\n");
        put(dir.path(), "PR", "2023-01", "b.csv", "Date,PR\n2023-01-01,3\n2023-01-05,4\n");
        put(dir.path(), "GHI", "2023-01", "b.csv", "Date,GHI\n2023-01-01,1\n2023-01-05,1\n");

        let out = collect(&CollectConfig::new(dir.path())).unwrap();
        let dates: Vec<NaiveDate> = out.records.iter().map(|r| r.date).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));

        let prs: Vec<f64> = out.records.iter().map(|r| r.pr).collect();
        assert_eq!(prs, vec![3.0, 1.0, 4.0, 2.0]);
    }

    #[test]
    fn parse_error_aborts_whole_merge() {
        let dir = tempfile::tempdir().unwrap();
        put(dir.path(), "PR", "2023-01", "a.csv", "Date,PR\n2023-01-01,70\n");
        put(dir.path(), "GHI", "2023-01", "a.csv", "Date,GHI\n2023-01-01,3\n");
        put(dir.path(), "PR", "2023-02", "a.csv", "Date,PR\nFeb first,70\n");
        put(dir.path(), "GHI", "2023-02", "a.csv", "Date,GHI\n2023-02-01,3\n");

        let err = collect(&CollectConfig::new(dir.path())).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
        assert!(err.to_string().contains("2023-02"));
    }

    #[test]
    fn collecting_twice_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        for (period, day) in [("2023-01", "2023-01-01"), ("2023-02", "2023-02-01"), ("2023-03", "2023-03-01")] {
            put(dir.path(), "PR", period, "a.csv", &format!("Date,PR\n{day},70.5\n"));
            put(dir.path(), "GHI", period, "a.csv", &format!("Date,GHI\n{day},4.5\n"));
        }

        let config = CollectConfig::new(dir.path());
        let first = collect(&config).unwrap();
        let second = collect(&config).unwrap();
        assert_eq!(first.records, second.records);
        assert_eq!(first.report, second.report);
    }

    #[test]
    fn strict_pairing_rejects_date_mismatch() {
        let pr = metric("PR/a.csv", Some(vec![d(2023, 1, 1), d(2023, 1, 2)]), vec![1.0, 2.0]);
        let ghi = metric("GHI/a.csv", Some(vec![d(2023, 1, 1), d(2023, 1, 3)]), vec![1.0, 2.0]);

        let err = zip_rows(&pr, &ghi, PairingMode::Strict).unwrap_err();
        match err {
            AppError::Alignment { row, pr_date, ghi_date, .. } => {
                assert_eq!(row, 2);
                assert_eq!(pr_date, Some(d(2023, 1, 2)));
                assert_eq!(ghi_date, Some(d(2023, 1, 3)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn strict_pairing_rejects_row_count_mismatch() {
        let pr = metric("PR/a.csv", Some(vec![d(2023, 1, 1), d(2023, 1, 2)]), vec![1.0, 2.0]);
        let ghi = metric("GHI/a.csv", Some(vec![d(2023, 1, 1)]), vec![1.0]);

        let err = zip_rows(&pr, &ghi, PairingMode::Strict).unwrap_err();
        assert!(matches!(err, AppError::Alignment { row: 2, ghi_date: None, .. }));
    }

    #[test]
    fn truncate_pairing_zips_to_shorter_file() {
        let pr = metric(
            "PR/a.csv",
            Some(vec![d(2023, 1, 1), d(2023, 1, 2), d(2023, 1, 3)]),
            vec![1.0, 2.0, 3.0],
        );
        let ghi = metric("GHI/a.csv", None, vec![10.0, 20.0]);

        let rows = zip_rows(&pr, &ghi, PairingMode::Truncate).unwrap();
        assert_eq!(
            rows,
            vec![
                DailyRecord { date: d(2023, 1, 1), ghi: 10.0, pr: 1.0 },
                DailyRecord { date: d(2023, 1, 2), ghi: 20.0, pr: 2.0 },
            ]
        );
    }

    #[test]
    fn truncate_mode_collects_misaligned_files() {
        let dir = tempfile::tempdir().unwrap();
        put(dir.path(), "PR", "2023-01", "a.csv", "Date,PR\n2023-01-01,70\n2023-01-02,71\n");
        put(dir.path(), "GHI", "2023-01", "a.csv", "Date,GHI\n2023-01-01,3\n");

        let mut config = CollectConfig::new(dir.path());
        assert!(matches!(collect(&config), Err(AppError::Alignment { .. })));

        config.pairing = PairingMode::Truncate;
        let out = collect(&config).unwrap();
        assert_eq!(out.records.len(), 1);
    }
}
