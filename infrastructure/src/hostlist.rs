//! Slurm hostlist expressions: `node[01-03,07],login1`.
//!
//! [`compress`] keeps the input order and only merges neighbours, so
//! `expand(&compress(hosts))` gives `hosts` back unchanged.

use std::fmt::Write;

/// Upper bound on the number of names a single expression may expand to.
pub const MAX_HOSTS: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostlistError {
    #[error("unbalanced brackets in {0:?}")]
    Unbalanced(String),
    #[error("invalid range {0:?}")]
    InvalidRange(String),
    #[error("{0:?} expands to more than {MAX_HOSTS} hosts")]
    TooLarge(String),
}

pub fn expand(expr: &str) -> Result<Vec<String>, HostlistError> {
    let mut hosts = Vec::new();
    for item in split_top_level(expr)? {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        hosts.extend(expand_item(item)?);
        if hosts.len() > MAX_HOSTS {
            return Err(HostlistError::TooLarge(expr.to_owned()));
        }
    }
    Ok(hosts)
}

pub fn compress<S: AsRef<str>>(hosts: &[S]) -> String {
    let mut out = String::new();
    let mut group: Option<Group<'_>> = None;

    for host in hosts {
        let host = host.as_ref();
        match (numbered(host), group.as_mut()) {
            (Some((prefix, digits, n)), Some(g)) if g.prefix == prefix => g.push(digits, n),
            (numbered_host, _) => {
                if let Some(g) = group.take() {
                    g.write(&mut out);
                }
                match numbered_host {
                    Some((prefix, digits, n)) => group = Some(Group::new(prefix, digits, n)),
                    None => push_item(&mut out, host),
                }
            }
        }
    }
    if let Some(g) = group {
        g.write(&mut out);
    }
    out
}

fn split_top_level(expr: &str) -> Result<Vec<&str>, HostlistError> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| HostlistError::Unbalanced(expr.to_owned()))?
            }
            ',' if depth == 0 => {
                items.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(HostlistError::Unbalanced(expr.to_owned()));
    }
    items.push(&expr[start..]);
    Ok(items)
}

fn expand_item(item: &str) -> Result<Vec<String>, HostlistError> {
    let Some(open) = item.find('[') else {
        if item.contains(']') {
            return Err(HostlistError::Unbalanced(item.to_owned()));
        }
        return Ok(vec![item.to_owned()]);
    };
    let close = item[open..]
        .find(']')
        .map(|i| open + i)
        .ok_or_else(|| HostlistError::Unbalanced(item.to_owned()))?;

    let prefix = &item[..open];
    let suffixes = match &item[close + 1..] {
        "" => vec![String::new()],
        rest => expand_item(rest)?,
    };

    let mut hosts = Vec::new();
    for range in item[open + 1..close].split(',') {
        let (lo, hi) = range.split_once('-').unwrap_or((range, range));
        let invalid = || HostlistError::InvalidRange(range.to_owned());
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if !digits(lo) || !digits(hi) {
            return Err(invalid());
        }
        let start: u64 = lo.parse().map_err(|_| invalid())?;
        let end: u64 = hi.parse().map_err(|_| invalid())?;
        if end < start {
            return Err(invalid());
        }
        let too_large = || HostlistError::TooLarge(item.to_owned());
        let count = end
            .checked_sub(start)
            .and_then(|d| d.checked_add(1))
            .ok_or_else(too_large)?
            .saturating_mul(suffixes.len() as u64);
        if count > MAX_HOSTS as u64 || hosts.len() as u64 + count > MAX_HOSTS as u64 {
            return Err(too_large());
        }
        let width = lo.len();
        for n in start..=end {
            for suffix in &suffixes {
                hosts.push(format!("{prefix}{n:0width$}{suffix}"));
            }
        }
    }
    Ok(hosts)
}

/// Splits `node007` into `("node", "007", 7)`.
fn numbered(host: &str) -> Option<(&str, &str, u64)> {
    if host.contains([',', '[', ']']) {
        return None;
    }
    let split = host.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    let digits = &host[split..];
    if digits.is_empty() {
        return None;
    }
    let n = digits.parse().ok()?;
    Some((&host[..split], digits, n))
}

struct Group<'a> {
    prefix: &'a str,
    runs: Vec<Run<'a>>,
}

struct Run<'a> {
    first: &'a str,
    start: u64,
    end: u64,
}

impl<'a> Group<'a> {
    fn new(prefix: &'a str, digits: &'a str, n: u64) -> Self {
        Self {
            prefix,
            runs: vec![Run {
                first: digits,
                start: n,
                end: n,
            }],
        }
    }

    fn push(&mut self, digits: &'a str, n: u64) {
        if let Some(run) = self.runs.last_mut() {
            // Only extend when expansion would print exactly these digits again.
            let width = run.first.len();
            if run.end.checked_add(1) == Some(n) && format!("{n:0width$}") == digits {
                run.end = n;
                return;
            }
        }
        self.runs.push(Run {
            first: digits,
            start: n,
            end: n,
        });
    }

    fn write(&self, out: &mut String) {
        if !out.is_empty() {
            out.push(',');
        }
        out.push_str(self.prefix);
        if let [run] = self.runs.as_slice() {
            if run.start == run.end {
                out.push_str(run.first);
                return;
            }
        }
        out.push('[');
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(run.first);
            if run.end != run.start {
                let _ = write!(out, "-{:0width$}", run.end, width = run.first.len());
            }
        }
        out.push(']');
    }
}

fn push_item(out: &mut String, host: &str) {
    if !out.is_empty() {
        out.push(',');
    }
    out.push_str(host);
}
