// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Creation-time window and output-mode selection
//!
//! A [`Filter`] is built once from the raw flag values and never changes afterwards.
//! Construction rejects every conflicting flag combination, so a `Filter` that exists
//! is always consistent.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("cannot use both --before and --after")]
    BeforeAndAfter,
    #[error("--start and --end must be used together")]
    UnpairedWindow,
    #[error("--before/--after cannot be used with --start/--end")]
    BoundsAndWindow,
    #[error("--resource-data and --output are mutually exclusive")]
    DataAndOutput,
    #[error("invalid --{option} timestamp '{value}': {reason}")]
    InvalidTimestamp {
        option: &'static str,
        value: String,
        reason: String,
    },
}

/// Raw flag values a [`Filter`] is built from
#[derive(Debug, Clone, Default)]
pub struct FilterArgs<'a> {
    pub before: &'a str,
    pub after: &'a str,
    pub start: &'a str,
    pub end: &'a str,
    pub output_dir: &'a str,
    pub inline_data: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    before: Option<DateTime<Utc>>,
    after: Option<DateTime<Utc>>,
    /// Inclusive `(start, end)` window; both ends are always set together
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    output_dir: String,
    inline_data: bool,
}

impl Filter {
    /// Validate the flag combination and parse every non-empty timestamp
    pub fn build(args: &FilterArgs<'_>) -> Result<Self, FilterError> {
        let has_before = !args.before.is_empty();
        let has_after = !args.after.is_empty();
        let has_start = !args.start.is_empty();
        let has_end = !args.end.is_empty();

        if has_before && has_after {
            return Err(FilterError::BeforeAndAfter);
        }
        if has_start != has_end {
            return Err(FilterError::UnpairedWindow);
        }
        if (has_before || has_after) && has_start {
            return Err(FilterError::BoundsAndWindow);
        }

        let before = parse_optional("before", args.before)?;
        let after = parse_optional("after", args.after)?;
        let window = match (
            parse_optional("start", args.start)?,
            parse_optional("end", args.end)?,
        ) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };

        if args.inline_data && !args.output_dir.is_empty() {
            return Err(FilterError::DataAndOutput);
        }

        Ok(Self {
            before,
            after,
            window,
            output_dir: args.output_dir.to_string(),
            inline_data: args.inline_data,
        })
    }

    /// Check whether an object created at `created` passes every configured bound
    ///
    /// `before` and `after` are exclusive, the `start..=end` window is inclusive, and an
    /// unset bound never rejects.
    pub fn matches(&self, created: DateTime<Utc>) -> bool {
        if let Some(before) = self.before
            && created >= before
        {
            return false;
        }
        if let Some(after) = self.after
            && created <= after
        {
            return false;
        }
        if let Some((start, end)) = self.window
            && (created < start || created > end)
        {
            return false;
        }
        true
    }

    /// Directory for the YAML tree, empty when no tree is written
    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }

    pub fn inline_data(&self) -> bool {
        self.inline_data
    }

    #[cfg(test)]
    pub fn before(&self) -> Option<DateTime<Utc>> {
        self.before
    }

    #[cfg(test)]
    pub fn after(&self) -> Option<DateTime<Utc>> {
        self.after
    }

    #[cfg(test)]
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.window
    }
}

fn parse_optional(
    option: &'static str,
    value: &str,
) -> Result<Option<DateTime<Utc>>, FilterError> {
    if value.is_empty() {
        return Ok(None);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|t| Some(t.with_timezone(&Utc)))
        .map_err(|e| FilterError::InvalidTimestamp {
            option,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn build(before: &str, after: &str, start: &str, end: &str) -> Result<Filter, FilterError> {
        Filter::build(&FilterArgs {
            before,
            after,
            start,
            end,
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_filter_passes_everything() {
        let filter = build("", "", "", "").unwrap();
        assert!(filter.matches(ts("1970-01-01T00:00:00Z")));
        assert!(filter.matches(ts("2999-12-31T23:59:59Z")));
        assert!(filter.output_dir().is_empty());
        assert!(!filter.inline_data());
    }

    #[test]
    fn test_before_and_after_conflict() {
        let err = build("2025-01-01T00:00:00Z", "2024-01-01T00:00:00Z", "", "").unwrap_err();
        assert_eq!(err, FilterError::BeforeAndAfter);
    }

    #[test]
    fn test_start_without_end() {
        assert_eq!(
            build("", "", "2025-01-01T00:00:00Z", "").unwrap_err(),
            FilterError::UnpairedWindow
        );
        assert_eq!(
            build("", "", "", "2025-01-01T00:00:00Z").unwrap_err(),
            FilterError::UnpairedWindow
        );
    }

    #[test]
    fn test_bounds_with_window_conflict() {
        let err = build(
            "2025-01-01T00:00:00Z",
            "",
            "2025-01-01T00:00:00Z",
            "2025-01-02T00:00:00Z",
        )
        .unwrap_err();
        assert_eq!(err, FilterError::BoundsAndWindow);

        let err = build(
            "",
            "2025-01-01T00:00:00Z",
            "2025-01-01T00:00:00Z",
            "2025-01-02T00:00:00Z",
        )
        .unwrap_err();
        assert_eq!(err, FilterError::BoundsAndWindow);
    }

    #[test]
    fn test_data_and_output_conflict() {
        let err = Filter::build(&FilterArgs {
            output_dir: "out",
            inline_data: true,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, FilterError::DataAndOutput);
    }

    #[test]
    fn test_invalid_timestamp_names_option() {
        let err = build("", "yesterday", "", "").unwrap_err();
        match &err {
            FilterError::InvalidTimestamp { option, value, .. } => {
                assert_eq!(*option, "after");
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("--after"));

        let err = build("", "", "2025-01-01T00:00:00Z", "2025-13-01T00:00:00Z").unwrap_err();
        assert!(matches!(err, FilterError::InvalidTimestamp { option: "end", .. }));
    }

    #[test]
    fn test_before_is_exclusive() {
        let filter = build("2025-01-01T00:00:00Z", "", "", "").unwrap();
        assert!(filter.matches(ts("2024-12-31T23:59:59Z")));
        assert!(!filter.matches(ts("2025-01-01T00:00:00Z")));
        assert!(!filter.matches(ts("2025-01-01T00:00:01Z")));
    }

    #[test]
    fn test_after_is_exclusive() {
        let filter = build("", "2025-01-01T00:00:00Z", "", "").unwrap();
        assert!(!filter.matches(ts("2024-12-31T23:59:59Z")));
        assert!(!filter.matches(ts("2025-01-01T00:00:00Z")));
        assert!(filter.matches(ts("2025-01-01T00:00:01Z")));
    }

    #[test]
    fn test_window_is_inclusive() {
        let filter = build("", "", "2025-01-01T00:00:00Z", "2025-01-02T00:00:00Z").unwrap();
        assert!(filter.matches(ts("2025-01-01T00:00:00Z")));
        assert!(filter.matches(ts("2025-01-01T12:00:00Z")));
        assert!(filter.matches(ts("2025-01-02T00:00:00Z")));
        assert!(!filter.matches(ts("2024-12-31T23:59:59Z")));
        assert!(!filter.matches(ts("2025-01-02T00:00:01Z")));
    }

    #[test]
    fn test_offsets_are_normalized_to_utc() {
        let filter = build("2025-01-01T02:00:00+02:00", "", "", "").unwrap();
        assert_eq!(filter.before(), Some(ts("2025-01-01T00:00:00Z")));
        assert!(!filter.matches(ts("2025-01-01T00:00:00Z")));
    }

    #[test]
    fn test_built_filter_never_violates_invariants() {
        let values = ["", "2025-01-01T00:00:00Z", "garbage"];
        for before in values {
            for after in values {
                for start in values {
                    for end in values {
                        if let Ok(filter) = build(before, after, start, end) {
                            assert!(!(filter.before().is_some() && filter.after().is_some()));
                            assert!(
                                filter.window().is_none()
                                    || (filter.before().is_none() && filter.after().is_none())
                            );
                        }
                    }
                }
            }
        }
    }
}
