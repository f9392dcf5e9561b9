use std::fmt;

use serde::Serialize;

use super::{Version, VersionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    Compatible,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Compatible => "~=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpecifierError {
    #[error("empty version clause")]
    EmptyClause,
    #[error("missing comparison operator in '{0}'")]
    MissingOperator(String),
    #[error("unsupported operator in '{0}'")]
    UnsupportedOperator(String),
    #[error("invalid version in '{clause}': {source}")]
    InvalidVersion {
        clause: String,
        source: VersionError,
    },
    #[error("wildcard version requires == or != in '{0}'")]
    WildcardOperator(String),
    #[error("'~=' requires at least two release segments in '{0}'")]
    CompatibleSingleSegment(String),
}

/// A single version clause, e.g. `>=2.9` or `==2.*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    pub op: Operator,
    pub version: Version,
    pub wildcard: bool,
}

impl Specifier {
    pub fn parse(clause: &str) -> Result<Self, SpecifierError> {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err(SpecifierError::EmptyClause);
        }
        if clause.starts_with("===") {
            return Err(SpecifierError::UnsupportedOperator(clause.to_string()));
        }
        let (op, rest) = if let Some(rest) = clause.strip_prefix("==") {
            (Operator::Eq, rest)
        } else if let Some(rest) = clause.strip_prefix("!=") {
            (Operator::Ne, rest)
        } else if let Some(rest) = clause.strip_prefix(">=") {
            (Operator::Ge, rest)
        } else if let Some(rest) = clause.strip_prefix("<=") {
            (Operator::Le, rest)
        } else if let Some(rest) = clause.strip_prefix("~=") {
            (Operator::Compatible, rest)
        } else if let Some(rest) = clause.strip_prefix('>') {
            (Operator::Gt, rest)
        } else if let Some(rest) = clause.strip_prefix('<') {
            (Operator::Lt, rest)
        } else {
            return Err(SpecifierError::MissingOperator(clause.to_string()));
        };

        let mut text = rest.trim();
        let mut wildcard = false;
        if let Some(stripped) = text.strip_suffix(".*") {
            if !matches!(op, Operator::Eq | Operator::Ne) {
                return Err(SpecifierError::WildcardOperator(clause.to_string()));
            }
            wildcard = true;
            text = stripped;
        }

        let version =
            Version::parse(text).map_err(|source| SpecifierError::InvalidVersion {
                clause: clause.to_string(),
                source,
            })?;

        if op == Operator::Compatible && version.release.len() < 2 {
            return Err(SpecifierError::CompatibleSingleSegment(clause.to_string()));
        }

        Ok(Specifier {
            op,
            version,
            wildcard,
        })
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        match self.op {
            Operator::Eq => {
                if self.wildcard {
                    prefix_matches(&self.version, &self.version.release, candidate)
                } else {
                    candidate == &self.version
                }
            }
            Operator::Ne => {
                if self.wildcard {
                    !prefix_matches(&self.version, &self.version.release, candidate)
                } else {
                    candidate != &self.version
                }
            }
            Operator::Ge => candidate >= &self.version,
            Operator::Le => candidate <= &self.version,
            Operator::Gt => candidate > &self.version,
            Operator::Lt => candidate < &self.version,
            Operator::Compatible => {
                let prefix = &self.version.release[..self.version.release.len() - 1];
                candidate >= &self.version && prefix_matches(&self.version, prefix, candidate)
            }
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "{}{}.*", self.op.as_str(), self.version)
        } else {
            write!(f, "{}{}", self.op.as_str(), self.version)
        }
    }
}

impl Serialize for Specifier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn prefix_matches(anchor: &Version, prefix: &[u64], candidate: &Version) -> bool {
    if candidate.epoch != anchor.epoch {
        return false;
    }
    prefix
        .iter()
        .enumerate()
        .all(|(i, seg)| candidate.release_at(i) == *seg)
}

/// A comma-separated conjunction of clauses, e.g. `>=2.9,<2.10`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecifierSet {
    clauses: Vec<Specifier>,
}

impl SpecifierSet {
    pub fn parse(input: &str) -> Result<Self, SpecifierError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::default());
        }
        let clauses = input
            .split(',')
            .map(Specifier::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.clauses.iter()
    }

    pub fn contains(&self, candidate: &Version) -> bool {
        self.clauses.iter().all(|c| c.matches(candidate))
    }

    /// True when no version can satisfy every clause in this set.
    ///
    /// Conservative: interval analysis over derived bounds plus exact
    /// pins. A `false` answer does not prove satisfiability against any
    /// real package index.
    pub fn is_provably_empty(&self) -> bool {
        provably_empty(self.clauses.iter())
    }

    /// True when this set and `other` admit no common version.
    pub fn conflicts_with(&self, other: &SpecifierSet) -> bool {
        provably_empty(self.clauses.iter().chain(other.clauses.iter()))
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for clause in &self.clauses {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{clause}")?;
            first = false;
        }
        Ok(())
    }
}

impl Serialize for SpecifierSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::str::FromStr for SpecifierSet {
    type Err = SpecifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpecifierSet::parse(s)
    }
}

#[derive(Clone)]
struct Bound {
    version: Version,
    inclusive: bool,
}

fn bump_prefix(anchor: &Version, prefix: &[u64]) -> Version {
    let mut release = prefix.to_vec();
    if let Some(last) = release.last_mut() {
        *last += 1;
    }
    Version {
        epoch: anchor.epoch,
        release,
        pre: None,
        post: None,
        dev: None,
        local: None,
    }
}

fn floor_of_prefix(anchor: &Version, prefix: &[u64]) -> Version {
    Version {
        epoch: anchor.epoch,
        release: prefix.to_vec(),
        pre: None,
        post: None,
        dev: Some(0),
        local: None,
    }
}

// Keep the higher lower bound; on ties an exclusive bound is tighter.
fn tighten_lower(current: &mut Option<Bound>, candidate: Bound) {
    match current {
        None => *current = Some(candidate),
        Some(b) => {
            if candidate.version > b.version
                || (candidate.version == b.version && !candidate.inclusive)
            {
                *b = candidate;
            }
        }
    }
}

fn tighten_upper(current: &mut Option<Bound>, candidate: Bound) {
    match current {
        None => *current = Some(candidate),
        Some(b) => {
            if candidate.version < b.version
                || (candidate.version == b.version && !candidate.inclusive)
            {
                *b = candidate;
            }
        }
    }
}

fn provably_empty<'a>(clauses: impl Iterator<Item = &'a Specifier>) -> bool {
    let mut lower: Option<Bound> = None;
    let mut upper: Option<Bound> = None;
    let mut pin: Option<&'a Version> = None;
    let mut pin_conflict = false;
    let mut exclusions: Vec<&'a Specifier> = Vec::new();

    for spec in clauses {
        match spec.op {
            Operator::Eq if spec.wildcard => {
                tighten_lower(
                    &mut lower,
                    Bound {
                        version: floor_of_prefix(&spec.version, &spec.version.release),
                        inclusive: true,
                    },
                );
                tighten_upper(
                    &mut upper,
                    Bound {
                        version: bump_prefix(&spec.version, &spec.version.release),
                        inclusive: false,
                    },
                );
            }
            Operator::Eq => match pin {
                Some(existing) if *existing != spec.version => pin_conflict = true,
                _ => pin = Some(&spec.version),
            },
            Operator::Ne => exclusions.push(spec),
            Operator::Ge => tighten_lower(
                &mut lower,
                Bound {
                    version: spec.version.clone(),
                    inclusive: true,
                },
            ),
            Operator::Gt => tighten_lower(
                &mut lower,
                Bound {
                    version: spec.version.clone(),
                    inclusive: false,
                },
            ),
            Operator::Le => tighten_upper(
                &mut upper,
                Bound {
                    version: spec.version.clone(),
                    inclusive: true,
                },
            ),
            Operator::Lt => tighten_upper(
                &mut upper,
                Bound {
                    version: spec.version.clone(),
                    inclusive: false,
                },
            ),
            Operator::Compatible => {
                let prefix = &spec.version.release[..spec.version.release.len() - 1];
                tighten_lower(
                    &mut lower,
                    Bound {
                        version: spec.version.clone(),
                        inclusive: true,
                    },
                );
                tighten_upper(
                    &mut upper,
                    Bound {
                        version: bump_prefix(&spec.version, prefix),
                        inclusive: false,
                    },
                );
            }
        }
    }

    if pin_conflict {
        return true;
    }

    let excluded = |v: &Version| {
        exclusions.iter().any(|spec| {
            if spec.wildcard {
                prefix_matches(&spec.version, &spec.version.release, v)
            } else {
                spec.version == *v
            }
        })
    };

    if let Some(pin) = pin {
        if excluded(pin) {
            return true;
        }
        if let Some(b) = &lower {
            if *pin < b.version || (*pin == b.version && !b.inclusive) {
                return true;
            }
        }
        if let Some(b) = &upper {
            if *pin > b.version || (*pin == b.version && !b.inclusive) {
                return true;
            }
        }
        return false;
    }

    if let (Some(lo), Some(hi)) = (&lower, &upper) {
        if lo.version > hi.version {
            return true;
        }
        if lo.version == hi.version {
            if !(lo.inclusive && hi.inclusive) {
                return true;
            }
            return excluded(&lo.version);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> SpecifierSet {
        SpecifierSet::parse(s).unwrap()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn range_from_manifest_line() {
        // pydantic>=2.9,<2.10
        let s = set(">=2.9,<2.10");
        assert!(s.contains(&v("2.9")));
        assert!(s.contains(&v("2.9.2")));
        assert!(!s.contains(&v("2.10")));
        assert!(!s.contains(&v("2.8.9")));
    }

    #[test]
    fn lower_bound_only() {
        // uvicorn[standard]>=0.24.0
        let s = set(">=0.24.0");
        assert!(s.contains(&v("0.24.0")));
        assert!(s.contains(&v("1.0")));
        assert!(!s.contains(&v("0.23.9")));
    }

    #[test]
    fn exact_and_exclusion() {
        let s = set("==1.4.2");
        assert!(s.contains(&v("1.4.2")));
        assert!(s.contains(&v("1.4.2.0")));
        assert!(!s.contains(&v("1.4.3")));

        let ne = set("!=1.4.2");
        assert!(!ne.contains(&v("1.4.2")));
        assert!(ne.contains(&v("1.4.3")));
    }

    #[test]
    fn wildcard_matching() {
        let s = set("==2.*");
        assert!(s.contains(&v("2.0")));
        assert!(s.contains(&v("2.99.1")));
        assert!(!s.contains(&v("3.0")));

        let ne = set("!=2.1.*");
        assert!(ne.contains(&v("2.2")));
        assert!(!ne.contains(&v("2.1.5")));
    }

    #[test]
    fn compatible_release() {
        let s = set("~=1.4.5");
        assert!(s.contains(&v("1.4.5")));
        assert!(s.contains(&v("1.4.9")));
        assert!(!s.contains(&v("1.5.0")));
        assert!(!s.contains(&v("1.4.4")));

        let wide = set("~=2.2");
        assert!(wide.contains(&v("2.9")));
        assert!(!wide.contains(&v("3.0")));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Specifier::parse("2.9"),
            Err(SpecifierError::MissingOperator(_))
        ));
        assert!(matches!(
            Specifier::parse(">=2.*"),
            Err(SpecifierError::WildcardOperator(_))
        ));
        assert!(matches!(
            Specifier::parse("~=2"),
            Err(SpecifierError::CompatibleSingleSegment(_))
        ));
        assert!(matches!(
            Specifier::parse("===2.0"),
            Err(SpecifierError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            Specifier::parse("==abc"),
            Err(SpecifierError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn empty_interval_is_detected() {
        assert!(set(">=2.10,<2.9").is_provably_empty());
        assert!(set(">2,<2").is_provably_empty());
        assert!(set(">=2,<2").is_provably_empty());
        assert!(set("==2.9,==3.0").is_provably_empty());
        assert!(set("==2.9,!=2.9").is_provably_empty());
        assert!(set("==2.9,<2.0").is_provably_empty());
        assert!(set(">=1,<=1,!=1").is_provably_empty());
        assert!(set("~=1.4,>=2.0").is_provably_empty());
    }

    #[test]
    fn satisfiable_sets_are_not_flagged() {
        assert!(!set(">=2.9,<2.10").is_provably_empty());
        assert!(!set("").is_provably_empty());
        assert!(!set("==2.9").is_provably_empty());
        assert!(!set("==2.*,<2").is_provably_empty());
        assert!(!set(">=1,<=1").is_provably_empty());
    }

    #[test]
    fn cross_set_conflicts() {
        assert!(set("==2.9").conflicts_with(&set("==3.0")));
        assert!(set(">=2.0").conflicts_with(&set("<1.0")));
        assert!(!set(">=2.0").conflicts_with(&set("<3.0")));
        assert!(!set(">=2.9,<2.10").conflicts_with(&set(">=2.9")));
    }

    #[test]
    fn display_round_trips() {
        for s in [">=2.9,<2.10", "==2.*", "~=1.4.5", "!=1.0,>0.5"] {
            assert_eq!(set(s).to_string(), s);
        }
    }
}
