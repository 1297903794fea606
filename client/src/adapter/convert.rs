//! Version-independent pieces of the wire conversions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use infrastructure::hostlist;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

pub fn join_csv(items: &[String]) -> String {
    items.join(",")
}

/// A malformed expression is kept as one opaque name rather than dropped.
pub fn expand_hosts(expr: &str) -> Vec<String> {
    match hostlist::expand(expr) {
        Ok(hosts) => hosts,
        Err(e) => {
            tracing::warn!(cause = %e, "Keeping unparsable hostlist as is");
            vec![expr.to_owned()]
        }
    }
}

pub fn compress_hosts(hosts: &[String]) -> String {
    hostlist::compress(hosts)
}

pub fn env_to_wire(env: &BTreeMap<String, String>) -> Vec<String> {
    env.iter().map(|(k, v)| format!("{k}={v}")).collect()
}

/// Slurm writes `0` for "never".
pub fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

pub fn unix(t: DateTime<Utc>) -> i64 {
    t.timestamp()
}

/// Splits a Slurm state array into its base state and the flags after it.
pub fn base_and_flags(states: Vec<String>) -> (String, Vec<String>) {
    let mut states = states.into_iter();
    let base = states.next().unwrap_or_default();
    (base, states.collect())
}

pub fn with_flags(base: impl ToString, flags: &[String]) -> Vec<String> {
    std::iter::once(base.to_string()).chain(flags.iter().cloned()).collect()
}

pub fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

pub fn non_empty_vec(v: &[String]) -> Option<Vec<String>> {
    (!v.is_empty()).then(|| v.to_vec())
}

/// `cpu=128` or, for named TRES, `gres/gpu=8`.
pub fn tres(kind: &str, name: &str, count: i64) -> String {
    if name.is_empty() {
        format!("{kind}={count}")
    } else {
        format!("{kind}/{name}={count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tres_strings() {
        assert_eq!(tres("cpu", "", 128), "cpu=128");
        assert_eq!(tres("gres", "gpu", 8), "gres/gpu=8");
    }

    #[test]
    fn csv_round_trip() {
        let items = vec!["alice".to_owned(), "bob".to_owned()];
        assert_eq!(split_csv(&join_csv(&items)), items);
        assert!(split_csv("").is_empty());
        assert_eq!(split_csv("a, ,b"), ["a", "b"]);
    }

    #[test]
    fn bad_hostlist_is_kept() {
        assert_eq!(expand_hosts("n[1-2"), ["n[1-2"]);
        assert_eq!(expand_hosts("n[1-2]"), ["n1", "n2"]);
    }

    #[test]
    fn zero_is_never() {
        assert_eq!(timestamp(0), None);
        assert_eq!(timestamp(1_700_000_000).map(unix), Some(1_700_000_000));
    }

    #[test]
    fn env_pairs() {
        let env = BTreeMap::from([
            ("PATH".to_owned(), "/bin".to_owned()),
            ("A".to_owned(), "x=y".to_owned()),
        ]);
        assert_eq!(env_to_wire(&env), ["A=x=y", "PATH=/bin"]);
    }

    #[test]
    fn state_arrays() {
        let (base, flags) = base_and_flags(vec!["IDLE".to_owned(), "DRAIN".to_owned()]);
        assert_eq!(base, "IDLE");
        assert_eq!(with_flags(base, &flags), ["IDLE", "DRAIN"]);
        assert_eq!(base_and_flags(Vec::new()), (String::new(), Vec::new()));
    }
}
