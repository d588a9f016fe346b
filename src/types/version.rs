use nom::{branch::alt, bytes::complete::tag, combinator::value, IResult};
use std::cmp::Ordering;
use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum VersionOp {
    Ge,
    Le,
    Eq,
    Gt,
    Lt,
}

impl VersionOp {
    pub fn accepts(&self, ord: Ordering) -> bool {
        match self {
            VersionOp::Ge => ord != Ordering::Less,
            VersionOp::Le => ord != Ordering::Greater,
            VersionOp::Eq => ord == Ordering::Equal,
            VersionOp::Gt => ord == Ordering::Greater,
            VersionOp::Lt => ord == Ordering::Less,
        }
    }
}

impl fmt::Display for VersionOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            VersionOp::Ge => ">=",
            VersionOp::Le => "<=",
            VersionOp::Eq => "==",
            VersionOp::Gt => ">",
            VersionOp::Lt => "<",
        })
    }
}

/// How two version strings are ordered
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum CompareMode {
    /// Plain string comparison, so "9" sorts after "10"
    #[default]
    Lexicographic,
    /// dpkg ordering: epoch, upstream version, then revision
    Dpkg,
}

impl CompareMode {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            CompareMode::Lexicographic => a.cmp(b),
            CompareMode::Dpkg => dpkg_cmp(a, b),
        }
    }
}

/// A version filter such as `>=1.0`
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct VersionSpec {
    pub op: VersionOp,
    pub target: String,
}

impl VersionSpec {
    /// Without a known operator the whole input is an exact-match target
    pub fn parse(s: &str) -> Self {
        match parse_version_op(s) {
            Ok((target, op)) => VersionSpec {
                op,
                target: target.trim().to_owned(),
            },
            Err(_) => VersionSpec {
                op: VersionOp::Eq,
                target: s.to_owned(),
            },
        }
    }

    pub fn matches(&self, version: &str, mode: CompareMode) -> bool {
        self.op.accepts(mode.compare(version, &self.target))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.op, self.target)
    }
}

// Two-character operators must be tried first
fn parse_version_op(i: &str) -> IResult<&str, VersionOp> {
    alt((
        value(VersionOp::Ge, tag(">=")),
        value(VersionOp::Le, tag("<=")),
        value(VersionOp::Eq, tag("==")),
        value(VersionOp::Gt, tag(">")),
        value(VersionOp::Lt, tag("<")),
    ))(i)
}

/// Split into (epoch, upstream, revision)
fn split_version(s: &str) -> (u64, &str, &str) {
    let (epoch, rest) = match s.split_once(':') {
        Some((epoch, rest)) if !epoch.is_empty() && epoch.bytes().all(|c| c.is_ascii_digit()) => {
            (epoch.parse().unwrap_or(u64::MAX), rest)
        }
        _ => (0, s),
    };
    match rest.rsplit_once('-') {
        Some((upstream, revision)) => (epoch, upstream, revision),
        None => (epoch, rest, ""),
    }
}

fn char_order(c: Option<u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => c as i32,
        Some(c) => c as i32 + 256,
    }
}

/// dpkg's verrevcmp: alternate non-digit and digit runs
fn verrevcmp(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0, 0);
    let is_digit = |s: &[u8], k: usize| s.get(k).map_or(false, u8::is_ascii_digit);

    while i < a.len() || j < b.len() {
        while (i < a.len() && !is_digit(a, i)) || (j < b.len() && !is_digit(b, j)) {
            let ac = char_order(a.get(i).copied());
            let bc = char_order(b.get(j).copied());
            if ac != bc {
                return ac.cmp(&bc);
            }
            i += 1;
            j += 1;
        }

        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(a, i) && is_digit(b, j) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }
        if is_digit(a, i) {
            return Ordering::Greater;
        }
        if is_digit(b, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

/// Compare two Debian version strings the way dpkg does
pub fn dpkg_cmp(a: &str, b: &str) -> Ordering {
    let (a_epoch, a_upstream, a_revision) = split_version(a);
    let (b_epoch, b_upstream, b_revision) = split_version(b);
    a_epoch
        .cmp(&b_epoch)
        .then_with(|| verrevcmp(a_upstream, b_upstream))
        .then_with(|| verrevcmp(a_revision, b_revision))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering::*;

    #[test]
    fn test_parse_spec() {
        let t = vec![
            (">=1.0", VersionOp::Ge, "1.0"),
            ("<=2", VersionOp::Le, "2"),
            ("==3.1", VersionOp::Eq, "3.1"),
            (">5", VersionOp::Gt, "5"),
            ("<5", VersionOp::Lt, "5"),
            (">= 1.0 ", VersionOp::Ge, "1.0"),
            ("1.0", VersionOp::Eq, "1.0"),
            // Unknown operators fall back to exact matching on the whole input
            ("=1.0", VersionOp::Eq, "=1.0"),
            ("~1.0", VersionOp::Eq, "~1.0"),
        ];

        for (input, op, target) in t {
            let spec = VersionSpec::parse(input);
            assert_eq!(spec.op, op, "operator of {}", input);
            assert_eq!(spec.target, target, "target of {}", input);
        }
    }

    #[test]
    fn test_two_char_operators_first() {
        let spec = VersionSpec::parse(">=1.0");
        assert_ne!(spec.target, "=1.0");
        assert!(spec.matches("1.0", CompareMode::Lexicographic));
        assert!(!spec.matches("0.9", CompareMode::Lexicographic));
    }

    #[test]
    fn test_lexicographic_boundary() {
        let spec = VersionSpec::parse(">5");
        assert!(spec.matches("9", CompareMode::Lexicographic));
        assert!(!spec.matches("10", CompareMode::Lexicographic));
        assert!(spec.matches("10", CompareMode::Dpkg));
    }

    #[test]
    fn test_dpkg_cmp() {
        let source = vec![
            ("1.1.1", Less, "1.1.2"),
            ("1b", Greater, "1a"),
            ("1", Less, "1.1"),
            ("1.0", Less, "1.1"),
            ("1.2", Less, "1.11"),
            ("1.0-1", Less, "1.0-12"),
            ("1:1.0-0", Equal, "1:1.0"),
            ("1.0", Equal, "1.0"),
            ("1:1.0", Greater, "2.0"),
            ("1.0-1", Less, "1.0-2"),
            ("1.0~rc1", Less, "1.0"),
            ("1.0~rc1", Less, "1.0~rc2"),
            ("1.0~~", Less, "1.0~"),
            ("1.0", Less, "1.0+b1"),
            ("1.0a", Greater, "1.0"),
            ("1:500", Less, "1:5000"),
            ("100:500", Greater, "11:5000"),
            ("7.88.1-10", Greater, "7.88.1-9"),
            ("10", Greater, "9"),
            ("1.0-1ubuntu1", Greater, "1.0-1"),
        ];

        for (a, ord, b) in source {
            assert_eq!(dpkg_cmp(a, b), ord, "comparing {} vs {}", a, b);
            assert_eq!(dpkg_cmp(b, a), ord.reverse(), "comparing {} vs {}", b, a);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(VersionSpec::parse(">= 2.0").to_string(), ">=2.0");
    }
}
