use chrono::NaiveDate;
use serde::Serialize;

/// Max, mean and median of a set of gaps between completions (in days)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapSummary {
    pub max: i64,
    pub mean: f64,
    pub median: f64,
}

impl GapSummary {
    /// `None` for an empty gap set
    pub fn from_gaps(gaps: &[i64]) -> Option<Self> {
        let max = *gaps.iter().max()?;
        let mean = gaps.iter().sum::<i64>() as f64 / gaps.len() as f64;
        let median = median(gaps)?;
        Some(GapSummary { max, mean, median })
    }
}

/// How one gap length recurs in a task's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GapCount {
    pub days: i64,
    pub count: usize,
}

/// Interval statistics for one task, as of today and as if done today.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalStatistics {
    /// Gaps between completions that already happened (excluding today's)
    pub historical: Option<GapSummary>,
    /// Gaps including a completion today
    pub projected: Option<GapSummary>,
    /// Most frequent gap lengths first
    pub histogram: Vec<GapCount>,
}

impl IntervalStatistics {
    /// Compute statistics from a chronological completion log.
    ///
    /// Returns `None` with fewer than two completions.
    pub fn compute(done_dates: &[NaiveDate], is_done_today: bool, today: NaiveDate) -> Option<Self> {
        if done_dates.len() < 2 {
            return None;
        }

        let gaps = gaps(done_dates);
        let (historical, projected) = if is_done_today {
            (gaps[..gaps.len() - 1].to_vec(), gaps.clone())
        } else {
            let mut projected = gaps.clone();
            if let Some(&last) = done_dates.last() {
                projected.push((today - last).num_days());
            }
            (gaps.clone(), projected)
        };

        Some(IntervalStatistics {
            historical: GapSummary::from_gaps(&historical),
            projected: GapSummary::from_gaps(&projected),
            histogram: histogram(&gaps),
        })
    }
}

/// Day differences between consecutive dates
pub fn gaps(dates: &[NaiveDate]) -> Vec<i64> {
    dates
        .windows(2)
        .map(|w| (w[1] - w[0]).num_days())
        .collect()
}

/// Median of an unsorted slice; mean of the middle pair for even lengths
pub fn median(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) as f64 / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Occurrence count per gap length, by descending count then ascending length
pub fn histogram(gaps: &[i64]) -> Vec<GapCount> {
    let mut counts: Vec<GapCount> = Vec::new();
    for &days in gaps {
        match counts.iter_mut().find(|c| c.days == days) {
            Some(c) => c.count += 1,
            None => counts.push(GapCount { days, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.days.cmp(&b.days)));
    counts
}

/// Greatest common divisor (Euclid); `gcd(a, 0) == |a|`
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// A fraction in lowest terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Expected completions per day for a task: `frequency * todos_per_day / total`.
/// `None` when the current list is empty.
pub fn real_frequency(frequency: u32, todos_per_day: i64, total_frequency: i64) -> Option<Fraction> {
    if total_frequency == 0 {
        return None;
    }
    let numerator = i64::from(frequency) * todos_per_day;
    let divisor = gcd(numerator, total_frequency);
    if divisor == 0 {
        return None;
    }
    Some(Fraction {
        numerator: numerator / divisor,
        denominator: total_frequency / divisor,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(list: &[&str]) -> Vec<NaiveDate> {
        list.iter().map(|d| date(d)).collect()
    }

    #[test]
    fn gcd_values() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(0, 9), 9);
        assert_eq!(gcd(-4, 6), 2);
    }

    #[test]
    fn median_even_and_odd() {
        assert_eq!(median(&[1, 2, 3, 4]), Some(2.5));
        assert_eq!(median(&[1, 2, 3]), Some(2.0));
        assert_eq!(median(&[4, 1, 3]), Some(3.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn fewer_than_two_completions_has_no_statistics() {
        let today = date("2026-05-10");
        assert!(IntervalStatistics::compute(&[], false, today).is_none());
        assert!(IntervalStatistics::compute(&dates(&["2026-05-01"]), false, today).is_none());
    }

    #[test]
    fn not_done_today_projects_a_gap_to_today() {
        let done = dates(&["2026-05-01", "2026-05-03", "2026-05-07"]);
        let stats = IntervalStatistics::compute(&done, false, date("2026-05-13")).unwrap();

        let historical = stats.historical.unwrap();
        assert_eq!(historical.max, 4);
        assert_eq!(historical.mean, 3.0);
        assert_eq!(historical.median, 3.0);

        // gaps 2, 4 plus 6 days to today
        let projected = stats.projected.unwrap();
        assert_eq!(projected.max, 6);
        assert_eq!(projected.mean, 4.0);
        assert_eq!(projected.median, 4.0);
    }

    #[test]
    fn done_today_splits_off_the_last_gap() {
        let done = dates(&["2026-05-01", "2026-05-03", "2026-05-07", "2026-05-13"]);
        let stats = IntervalStatistics::compute(&done, true, date("2026-05-13")).unwrap();

        let historical = stats.historical.unwrap();
        assert_eq!(historical.max, 4);
        assert_eq!(historical.median, 3.0);

        let projected = stats.projected.unwrap();
        assert_eq!(projected.max, 6);
        assert_eq!(projected.mean, 4.0);
    }

    #[test]
    fn two_completions_done_today_has_projection_only() {
        let done = dates(&["2026-05-01", "2026-05-04"]);
        let stats = IntervalStatistics::compute(&done, true, date("2026-05-04")).unwrap();
        assert!(stats.historical.is_none());
        assert_eq!(stats.projected.unwrap().max, 3);
    }

    #[test]
    fn same_day_completions_count_as_zero_gaps() {
        let done = dates(&["2026-05-01", "2026-05-01", "2026-05-05"]);
        assert_eq!(gaps(&done), vec![0, 4]);
    }

    #[test]
    fn histogram_orders_by_count_then_length() {
        let hist = histogram(&[3, 1, 3, 7, 1, 2]);
        assert_eq!(
            hist,
            vec![
                GapCount { days: 1, count: 2 },
                GapCount { days: 3, count: 2 },
                GapCount { days: 2, count: 1 },
                GapCount { days: 7, count: 1 },
            ]
        );
    }

    #[test]
    fn real_frequency_in_lowest_terms() {
        assert_eq!(
            real_frequency(4, 1, 16),
            Some(Fraction {
                numerator: 1,
                denominator: 4
            })
        );
        assert_eq!(real_frequency(3, 2, 6).unwrap().to_string(), "1");
        assert_eq!(real_frequency(3, 1, 16).unwrap().to_string(), "3/16");
        assert_eq!(real_frequency(3, 1, 0), None);
    }
}
