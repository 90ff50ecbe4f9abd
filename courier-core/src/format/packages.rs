//! Package lists: repeated `<id> <weight> <destination> <arrival> <deadline>`
//! records with no count prefix.

use std::borrow::Cow;

use log::{debug, warn};
use thiserror::Error;

use crate::package::{Package, PackageSet};

const RECORD_FIELDS: usize = 5;

/// Why package parsing stopped before the end of the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackageFormatIssue {
    /// The last record had fewer than five fields.
    #[error("record {record} is incomplete ({tokens} of 5 fields)")]
    Incomplete {
        /// 1-based record number.
        record: usize,
        /// Fields present.
        tokens: usize,
    },
    /// A numeric field did not parse.
    #[error("record {record} has invalid {field} {token:?}")]
    InvalidField {
        /// 1-based record number.
        record: usize,
        /// Field that failed to parse.
        field: &'static str,
        /// Offending token.
        token: String,
    },
}

/// Packages read from text plus anything left unread.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageLoad {
    /// Complete records in read order.
    pub packages: PackageSet,
    /// Tokens discarded once parsing stopped.
    pub discarded_tokens: usize,
    /// Why parsing stopped early, if it did.
    pub issue: Option<PackageFormatIssue>,
}

/// Parse package records until the input runs out.
///
/// Parsing never fails outright: a partial trailing record, or a record
/// with an unparsable number, ends consumption and everything from that
/// record onwards is discarded and reported.
///
/// # Examples
///
/// ```
/// use courier_core::format::parse_packages;
///
/// let load = parse_packages("P1 5 B 0 3\nP2 2.5 C 1 9\nP3 1");
/// assert_eq!(load.packages.len(), 2);
/// assert_eq!(load.discarded_tokens, 2);
/// assert!(load.issue.is_some());
/// ```
pub fn parse_packages(input: &str) -> PackageLoad {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let mut load = PackageLoad::default();

    for (offset, record) in tokens.chunks(RECORD_FIELDS).enumerate() {
        match parse_record(record, offset + 1) {
            Ok(package) => {
                debug!("Package {}: {} -> {}", offset + 1, package.id, package.destination);
                load.packages.push(package);
            }
            Err(issue) => {
                load.discarded_tokens = tokens.len() - offset * RECORD_FIELDS;
                warn!(
                    "Stopped reading packages: {issue}; discarded {} trailing tokens",
                    load.discarded_tokens
                );
                load.issue = Some(issue);
                break;
            }
        }
    }
    load
}

/// Decode raw package bytes, replacing invalid UTF-8, and parse them.
///
/// A replaced sequence only affects the token it sits in; the record is
/// kept if its numeric fields still parse.
pub fn parse_package_bytes(input: &[u8]) -> PackageLoad {
    let text = String::from_utf8_lossy(input);
    if matches!(text, Cow::Owned(_)) {
        warn!("Package input contained invalid UTF-8; bad bytes were replaced");
    }
    parse_packages(&text)
}

fn parse_record(record: &[&str], number: usize) -> Result<Package, PackageFormatIssue> {
    let &[id, weight, destination, arrival, deadline] = record else {
        return Err(PackageFormatIssue::Incomplete {
            record: number,
            tokens: record.len(),
        });
    };
    let invalid = |field: &'static str, token: &str| PackageFormatIssue::InvalidField {
        record: number,
        field,
        token: token.to_owned(),
    };
    let mass = weight
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
        .ok_or_else(|| invalid("weight", weight))?;
    Ok(Package {
        id: id.to_owned(),
        weight: mass,
        destination: destination.to_owned(),
        arrival_time: arrival.parse().map_err(|_| invalid("arrival time", arrival))?,
        deadline: deadline.parse().map_err(|_| invalid("deadline", deadline))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn reads_records_in_order() {
        let load = parse_packages("P1 5 B 0 3\nP2 2.5 C 4 20\nP1 1 B 1 2\n");
        let packages = load.packages.as_slice();
        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0], Package::new("P1", 5.0, "B", 0, 3));
        assert_eq!(packages[1], Package::new("P2", 2.5, "C", 4, 20));
        assert_eq!(packages[2].id, "P1");
        assert_eq!(load.discarded_tokens, 0);
        assert!(load.issue.is_none());
    }

    #[rstest]
    #[case::whitespace_only("  \n\t\n")]
    #[case::empty("")]
    fn empty_input_is_valid(#[case] input: &str) {
        let load = parse_packages(input);
        assert!(load.packages.is_empty());
        assert!(load.issue.is_none());
    }

    #[rstest]
    fn partial_trailing_record_is_discarded() {
        let load = parse_packages("P1 5 B 0 3 P2 4 C");
        assert_eq!(load.packages.len(), 1);
        assert_eq!(load.discarded_tokens, 3);
        assert_eq!(
            load.issue,
            Some(PackageFormatIssue::Incomplete {
                record: 2,
                tokens: 3
            })
        );
    }

    #[rstest]
    #[case::weight("P2 heavy C 0 1", "weight")]
    #[case::nan_weight("P2 NaN C 0 1", "weight")]
    #[case::negative_weight("P2 -5 C 0 1", "weight")]
    #[case::zero_weight("P2 0 C 0 1", "weight")]
    #[case::arrival("P2 1 C soon 1", "arrival time")]
    #[case::deadline("P2 1 C 0 1.5", "deadline")]
    fn malformed_record_stops_consumption(#[case] bad: &str, #[case] field: &str) {
        let input = format!("P1 5 B 0 3\n{bad}\nP3 1 D 0 9\n");
        let load = parse_packages(&input);
        assert_eq!(load.packages.len(), 1);
        assert_eq!(load.discarded_tokens, 10);
        match load.issue {
            Some(PackageFormatIssue::InvalidField {
                record,
                field: actual,
                ..
            }) => {
                assert_eq!(record, 2);
                assert_eq!(actual, field);
            }
            other => panic!("expected InvalidField, found {other:?}"),
        }
    }

    #[rstest]
    fn invalid_utf8_is_replaced_not_fatal() {
        let load = parse_package_bytes(b"P1 5 B\xe9 0 3\nP2 4 B 0 9\n");
        assert_eq!(load.packages.len(), 2);
        assert_eq!(load.packages.as_slice()[0].destination, "B\u{FFFD}");
        assert!(load.issue.is_none());

        let load = parse_package_bytes(b"P1 5\xff B 0 3\n");
        assert!(load.packages.is_empty());
        assert!(matches!(
            load.issue,
            Some(PackageFormatIssue::InvalidField { field: "weight", .. })
        ));
    }

    #[rstest]
    fn negative_times_are_accepted() {
        let load = parse_packages("P1 5 B -4 -1");
        assert_eq!(load.packages.as_slice()[0].arrival_time, -4);
        assert_eq!(load.packages.as_slice()[0].deadline, -1);
    }
}
