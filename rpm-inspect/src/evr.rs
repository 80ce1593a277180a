//! Epoch, version, and release comparison
//!
//! Versions are compared the way RPM compares them: strings are split into
//! runs of digits and runs of letters, separators are dropped, and a tilde
//! sorts before anything (even the end of the string).

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~'
}

fn trim_separators(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|&c| !is_separator(c)).unwrap_or(s.len());
    &s[start..]
}

/// Split off the longest prefix of digits (if `digits`) or letters
fn split_run(s: &[u8], digits: bool) -> (&[u8], &[u8]) {
    let end = s
        .iter()
        .position(|c| {
            if digits {
                !c.is_ascii_digit()
            } else {
                !c.is_ascii_alphabetic()
            }
        })
        .unwrap_or(s.len());
    s.split_at(end)
}

fn compare_numeric(mut a: &[u8], mut b: &[u8]) -> Ordering {
    while let [b'0', rest @ ..] = a {
        a = rest
    }
    while let [b'0', rest @ ..] = b {
        b = rest
    }
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two version (or release) strings.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (mut one, mut two) = (a.as_bytes(), b.as_bytes());
    loop {
        one = trim_separators(one);
        two = trim_separators(two);
        match (one.first(), two.first()) {
            (Some(b'~'), Some(b'~')) => {
                one = &one[1..];
                two = &two[1..];
                continue;
            }
            (Some(b'~'), _) => return Ordering::Less,
            (_, Some(b'~')) => return Ordering::Greater,
            (None, _) | (_, None) => break,
            _ => {}
        }
        let digits = one[0].is_ascii_digit();
        let (run1, rest1) = split_run(one, digits);
        let (run2, rest2) = split_run(two, digits);
        // `run1` is never empty, so an empty `run2` means the classes differ
        if run2.is_empty() {
            return if digits {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }
        let ordering = if digits {
            compare_numeric(run1, run2)
        } else {
            run1.cmp(run2)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
        one = rest1;
        two = rest2;
    }
    match (one.is_empty(), two.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, _) => Ordering::Greater,
    }
}

/// Epoch, version, and release of a package
#[derive(Clone, Debug, Default)]
pub struct Evr {
    /// The epoch.  A missing epoch is not the same as `"0"`.
    pub epoch: Option<String>,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new<E, V, R>(epoch: Option<E>, version: V, release: R) -> Self
    where
        E: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Self {
            epoch: epoch.map(Into::into),
            version: version.into(),
            release: release.into(),
        }
    }
}

/// Compare two EVRs.
///
/// A missing epoch is less than any present epoch, including `"0"`; two
/// missing epochs are equal.
pub fn compare_evr(a: &Evr, b: &Evr) -> Ordering {
    let epoch = match (&a.epoch, &b.epoch) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => rpmvercmp(a, b),
    };
    epoch
        .then_with(|| rpmvercmp(&a.version, &b.version))
        .then_with(|| rpmvercmp(&a.release, &b.release))
}

impl PartialEq for Evr {
    fn eq(&self, other: &Self) -> bool {
        compare_evr(self, other) == Ordering::Equal
    }
}

impl Eq for Evr {}

impl PartialOrd for Evr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Evr {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_evr(self, other)
    }
}

impl FromStr for Evr {
    type Err = Infallible;

    /// Parse `[epoch:]version[-release]`.  An empty epoch is no epoch.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (epoch, rest) = match s.find(':') {
            Some(i) => (Some(&s[..i]).filter(|e| !e.is_empty()), &s[i + 1..]),
            None => (None, s),
        };
        let (version, release) = match rest.rfind('-') {
            Some(i) => (&rest[..i], &rest[i + 1..]),
            None => (rest, ""),
        };
        Ok(Self::new(epoch, version, release))
    }
}

impl fmt::Display for Evr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = &self.epoch {
            write!(f, "{}:", epoch)?;
        }
        f.write_str(&self.version)?;
        if !self.release.is_empty() {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}

/// A package name with its EVR
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedEvr {
    pub name: String,
    pub evr: Evr,
}

impl NamedEvr {
    pub fn new<N: Into<String>>(name: N, evr: Evr) -> Self {
        Self {
            name: name.into(),
            evr,
        }
    }

    /// Compare the EVRs of two builds of the same package.  Fails with
    /// [`Error::MismatchedName`] if the names differ.
    pub fn try_compare(&self, other: &Self) -> Result<Ordering> {
        if self.name != other.name {
            return Err(Error::MismatchedName {
                left: self.name.clone(),
                right: other.name.clone(),
            });
        }
        Ok(compare_evr(&self.evr, &other.evr))
    }
}

/// Order packages by name, then by EVR.  Used to sort lists that mix
/// different packages.
pub fn label_compare(a: &NamedEvr, b: &NamedEvr) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| compare_evr(&a.evr, &b.evr))
}
