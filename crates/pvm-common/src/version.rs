//! Product version records and dotted-version ordering.
//!
//! Version names are free text entered by an administrator, so ordering
//! follows the common dotted-version rules rather than semver: separators are
//! normalised, numeric segments compare as numbers and a small set of
//! pre/post-release words (`dev`, `alpha`, `beta`, `RC`, `pl`) rank around
//! plain numbers.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder reported when a product has no versions.
pub const NO_VERSION: &str = "N/A";

/// One released version of a product as stored in product metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version_name: String,
    /// Date as submitted by the admin form, normally `YYYY-MM-DD`.
    pub release_date: String,
}

impl VersionRecord {
    pub fn new(version_name: impl Into<String>, release_date: impl Into<String>) -> Self {
        Self {
            version_name: version_name.into(),
            release_date: release_date.into(),
        }
    }

    /// Release date as a calendar date, if it parses.
    pub fn release_day(&self) -> Option<NaiveDate> {
        let raw = self.release_date.trim();
        // Accept a trailing time component ("2025-01-01 00:00:00").
        let day = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Release moment in UTC. A bare date means the start of that day.
    pub fn released_at(&self) -> Option<NaiveDateTime> {
        let raw = self.release_date.trim();
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .or_else(|| self.release_day().and_then(|day| day.and_hms_opt(0, 0, 0)))
    }

    /// Whether this version was released strictly before `cutoff`.
    pub fn released_before(&self, cutoff: DateTime<Utc>) -> bool {
        self.released_at().is_some_and(|at| at < cutoff.naive_utc())
    }
}

/// Pair submitted names and dates by position, dropping any index where
/// either side is empty. A missing date at an index counts as empty.
pub fn pair_submitted(names: &[String], dates: &[String]) -> Vec<VersionRecord> {
    names
        .iter()
        .enumerate()
        .filter_map(|(i, name)| {
            let date = dates.get(i)?;
            if name.is_empty() || date.is_empty() {
                return None;
            }
            Some(VersionRecord::new(name.clone(), date.clone()))
        })
        .collect()
}

/// Name of the highest version in `versions`, or `None` for an empty list.
///
/// Equal versions keep their stored order, so the first one listed wins.
pub fn latest_version(versions: &[VersionRecord]) -> Option<&str> {
    let mut sorted: Vec<&VersionRecord> = versions.iter().collect();
    sorted.sort_by(|a, b| compare_versions(&b.version_name, &a.version_name));
    sorted.first().map(|v| v.version_name.as_str())
}

/// Versions released before `cutoff`, in stored order.
pub fn eligible_versions(
    versions: &[VersionRecord],
    cutoff: DateTime<Utc>,
) -> Vec<&VersionRecord> {
    versions.iter().filter(|v| v.released_before(cutoff)).collect()
}

/// Compare two dotted version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let ca = canonicalize(a);
    let cb = canonicalize(b);
    let mut pa = ca.split('.').filter(|s| !s.is_empty());
    let mut pb = cb.split('.').filter(|s| !s.is_empty());

    loop {
        match (pa.next(), pb.next()) {
            (Some(x), Some(y)) => {
                let ord = compare_segments(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), None) => return trailing_order(x),
            (None, Some(y)) => return trailing_order(y).reverse(),
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Ordering of the longer version relative to the shorter one, decided by the
/// first extra segment: more numbers mean newer, a pre-release word means older.
fn trailing_order(extra: &str) -> Ordering {
    if is_numeric(extra) {
        Ordering::Greater
    } else {
        special_rank(extra).cmp(&NUMBER_RANK)
    }
}

fn compare_segments(x: &str, y: &str) -> Ordering {
    match (is_numeric(x), is_numeric(y)) {
        (true, true) => compare_numeric(x, y),
        (false, false) => special_rank(x).cmp(&special_rank(y)),
        (true, false) => NUMBER_RANK.cmp(&special_rank(y)),
        (false, true) => special_rank(x).cmp(&NUMBER_RANK),
    }
}

/// Numeric compare without overflow on absurdly long segments.
fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

const NUMBER_RANK: i8 = 4;

/// Rank of a non-numeric segment; words are matched by prefix.
fn special_rank(segment: &str) -> i8 {
    const FORMS: [(&str, i8); 9] = [
        ("dev", 0),
        ("alpha", 1),
        ("a", 1),
        ("beta", 2),
        ("b", 2),
        ("RC", 3),
        ("rc", 3),
        ("pl", 5),
        ("p", 5),
    ];

    FORMS
        .iter()
        .find(|(name, _)| segment.starts_with(name))
        .map(|(_, rank)| *rank)
        .unwrap_or(-6)
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Normalise separators to `.` and split digit runs from letter runs,
/// e.g. `1.0-rc1` -> `1.0.rc.1`.
fn canonicalize(version: &str) -> String {
    let mut out = String::with_capacity(version.len() * 2);
    let mut prev: Option<char> = None;

    for c in version.chars() {
        if c.is_ascii_alphanumeric() {
            let boundary = prev.is_some_and(|p| {
                (c.is_ascii_digit() && !p.is_ascii_digit() && p != '.')
                    || (!c.is_ascii_digit() && p.is_ascii_digit())
            });
            if boundary {
                push_separator(&mut out);
            }
            out.push(c);
        } else {
            // '.', '-', '_', '+' and anything else separate segments
            push_separator(&mut out);
        }
        prev = Some(c);
    }

    out
}

fn push_separator(out: &mut String) {
    if !out.is_empty() && !out.ends_with('.') {
        out.push('.');
    }
}
