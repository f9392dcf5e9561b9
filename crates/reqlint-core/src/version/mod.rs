//! Version model for manifest declarations.
//!
//! Versions follow the shape used by Python package manifests: optional
//! epoch, dotted release segments, optional pre/post/dev release markers
//! and an optional local label. Ordering pads shorter releases with
//! zeros, so `2.9` and `2.9.0` compare equal.

mod specifier;

pub use specifier::{Operator, Specifier, SpecifierError, SpecifierSet};

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreTag {
    Alpha,
    Beta,
    Rc,
}

impl PreTag {
    fn as_str(self) -> &'static str {
        match self {
            PreTag::Alpha => "a",
            PreTag::Beta => "b",
            PreTag::Rc => "rc",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u32,
    pub release: Vec<u64>,
    pub pre: Option<(PreTag, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("empty version")]
    Empty,
    #[error("invalid version '{0}'")]
    Invalid(String),
    #[error("numeric component out of range in '{0}'")]
    Overflow(String),
}

struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }

    fn eat_digits(&mut self) -> Option<&'a str> {
        let end = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(digits)
    }

    fn eat(&mut self, token: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(token) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn eat_any(&mut self, tokens: &[&str]) -> Option<usize> {
        for (i, t) in tokens.iter().enumerate() {
            if self.eat(t) {
                return Some(i);
            }
        }
        None
    }

    // Separators between segments are interchangeable in the wild.
    fn eat_sep(&mut self) {
        self.eat_any(&[".", "-", "_"]);
    }
}

fn parse_num(digits: &str, original: &str) -> Result<u64, VersionError> {
    digits
        .parse::<u64>()
        .map_err(|_| VersionError::Overflow(original.to_string()))
}

impl Version {
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(VersionError::Empty);
        }
        let lowered = trimmed.to_ascii_lowercase();
        let body = lowered.strip_prefix('v').unwrap_or(&lowered);
        let mut sc = Scanner::new(body);

        // Epoch: digits followed by '!'.
        let mut epoch = 0u32;
        if let Some(bang) = sc.rest.find('!') {
            let (head, tail) = sc.rest.split_at(bang);
            if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::Invalid(trimmed.to_string()));
            }
            epoch = head
                .parse::<u32>()
                .map_err(|_| VersionError::Overflow(trimmed.to_string()))?;
            sc.rest = &tail[1..];
        }

        // Release: dotted digit runs.
        let mut release = Vec::new();
        loop {
            let Some(digits) = sc.eat_digits() else {
                if release.is_empty() {
                    return Err(VersionError::Invalid(trimmed.to_string()));
                }
                break;
            };
            release.push(parse_num(digits, trimmed)?);
            if !(sc.rest.starts_with('.')
                && sc.rest[1..].starts_with(|c: char| c.is_ascii_digit()))
            {
                break;
            }
            sc.eat(".");
        }

        // Pre-release, with the spelling aliases seen in real manifests.
        let mut pre = None;
        {
            let mut probe = Scanner::new(sc.rest);
            probe.eat_sep();
            const TAGS: [&str; 8] =
                ["alpha", "beta", "preview", "pre", "rc", "a", "b", "c"];
            if let Some(idx) = probe.eat_any(&TAGS) {
                let tag = match TAGS[idx] {
                    "a" | "alpha" => PreTag::Alpha,
                    "b" | "beta" => PreTag::Beta,
                    _ => PreTag::Rc,
                };
                probe.eat_sep();
                let n = match probe.eat_digits() {
                    Some(d) => parse_num(d, trimmed)?,
                    None => 0,
                };
                pre = Some((tag, n));
                sc.rest = probe.rest;
            }
        }

        // Post-release: `.postN`, `.revN`, `.rN`, or the bare `-N` form.
        let mut post = None;
        {
            let mut probe = Scanner::new(sc.rest);
            let had_sep = {
                let before = probe.rest.len();
                probe.eat_sep();
                before != probe.rest.len()
            };
            if probe.eat_any(&["post", "rev", "r"]).is_some() {
                probe.eat_sep();
                let n = match probe.eat_digits() {
                    Some(d) => parse_num(d, trimmed)?,
                    None => 0,
                };
                post = Some(n);
                sc.rest = probe.rest;
            } else if had_sep {
                // `1.0-1` is an implicit post-release only for `-`.
                if let Some(stripped) = sc.rest.strip_prefix('-') {
                    let mut p2 = Scanner::new(stripped);
                    if let Some(d) = p2.eat_digits() {
                        post = Some(parse_num(d, trimmed)?);
                        sc.rest = p2.rest;
                    }
                }
            }
        }

        // Dev-release.
        let mut dev = None;
        {
            let mut probe = Scanner::new(sc.rest);
            probe.eat_sep();
            if probe.eat("dev") {
                probe.eat_sep();
                let n = match probe.eat_digits() {
                    Some(d) => parse_num(d, trimmed)?,
                    None => 0,
                };
                dev = Some(n);
                sc.rest = probe.rest;
            }
        }

        // Local label.
        let mut local = None;
        if let Some(stripped) = sc.rest.strip_prefix('+') {
            if stripped.is_empty()
                || !stripped
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b'_')
            {
                return Err(VersionError::Invalid(trimmed.to_string()));
            }
            local = Some(stripped.to_string());
            sc.rest = "";
        }

        if !sc.rest.is_empty() {
            return Err(VersionError::Invalid(trimmed.to_string()));
        }

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Release segment at `idx`, treating missing trailing segments as 0.
    pub fn release_at(&self, idx: usize) -> u64 {
        self.release.get(idx).copied().unwrap_or(0)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    // Sort key for everything after the release segments. Dev-only
    // versions sort below any pre-release of the same release.
    fn phase_key(&self) -> ((u8, u8, u64), (u8, u64), (u8, u64)) {
        let pre_key = match (&self.pre, &self.post, &self.dev) {
            (None, None, Some(_)) => (0, 0, 0),
            (Some((tag, n)), _, _) => (1, *tag as u8, *n),
            (None, _, _) => (2, 0, 0),
        };
        let post_key = match self.post {
            None => (0, 0),
            Some(n) => (1, n),
        };
        let dev_key = match self.dev {
            Some(n) => (0, n),
            None => (1, 0),
        };
        (pre_key, post_key, dev_key)
    }
}

fn cmp_release(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        match x.cmp(&y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| cmp_release(&self.release, &other.release))
            .then_with(|| self.phase_key().cmp(&other.phase_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release = self
            .release
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{release}")?;
        if let Some((tag, n)) = &self.pre {
            write!(f, "{}{}", tag.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}
