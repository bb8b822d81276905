//! Daily upload series: gap filling and summary statistics.

use chrono::{Days, NaiveDate};

use veriscan_db::DailyCount;

/// Summary statistics over a daily series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesStats {
    pub total: i64,
    pub avg_per_day: f64,
    pub max_per_day: i64,
    pub days_with_uploads: usize,
}

/// Expand sparse daily counts into a continuous series covering
/// `days_back` days ending at `end_date`, with zero for absent dates.
pub fn fill_missing_dates(
    counts: &[DailyCount],
    days_back: u64,
    end_date: NaiveDate,
) -> Vec<(NaiveDate, i64)> {
    let days_back = days_back.max(1);
    let start_date = end_date
        .checked_sub_days(Days::new(days_back - 1))
        .unwrap_or(end_date);

    let mut series = Vec::with_capacity(days_back as usize);
    let mut current = start_date;
    while current <= end_date {
        let count = counts
            .iter()
            .find(|c| c.day == current)
            .map(|c| c.count)
            .unwrap_or(0);
        series.push((current, count));
        current = match current.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    series
}

pub fn compute_stats(series: &[(NaiveDate, i64)]) -> SeriesStats {
    let total: i64 = series.iter().map(|(_, count)| count).sum();
    let max_per_day = series.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let days_with_uploads = series.iter().filter(|(_, count)| *count > 0).count();
    let avg_per_day = if series.is_empty() {
        0.0
    } else {
        total as f64 / series.len() as f64
    };

    SeriesStats {
        total,
        avg_per_day,
        max_per_day,
        days_with_uploads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_three_day_window_fills_middle_gap() {
        let counts = vec![
            DailyCount {
                day: date(2026, 8, 1),
                count: 4,
            },
            DailyCount {
                day: date(2026, 8, 3),
                count: 2,
            },
        ];

        let series = fill_missing_dates(&counts, 3, date(2026, 8, 3));

        assert_eq!(series.len(), 3);
        assert_eq!(series[0], (date(2026, 8, 1), 4));
        assert_eq!(series[1], (date(2026, 8, 2), 0));
        assert_eq!(series[2], (date(2026, 8, 3), 2));
    }

    #[test]
    fn test_empty_counts_produce_all_zero_series() {
        let series = fill_missing_dates(&[], 5, date(2026, 8, 5));
        assert_eq!(series.len(), 5);
        assert!(series.iter().all(|(_, count)| *count == 0));
    }

    #[test]
    fn test_stats() {
        let series = vec![
            (date(2026, 8, 1), 4),
            (date(2026, 8, 2), 0),
            (date(2026, 8, 3), 2),
        ];
        let stats = compute_stats(&series);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.max_per_day, 4);
        assert_eq!(stats.days_with_uploads, 2);
        assert!((stats.avg_per_day - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_on_empty_series() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.max_per_day, 0);
        assert_eq!(stats.avg_per_day, 0.0);
    }
}
