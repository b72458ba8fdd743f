use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Not a version: {0}")]
pub struct InvalidVersion(pub String);

/// Pre-release phase, ordered alpha < beta < release candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha(u64),
    Beta(u64),
    Candidate(u64),
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreRelease::Alpha(n) => write!(f, "a{}", n),
            PreRelease::Beta(n) => write!(f, "b{}", n),
            PreRelease::Candidate(n) => write!(f, "rc{}", n),
        }
    }
}

/// Asset index version parsed from a file stem such as `1.10`, `1.7.10`,
/// `17` or `1.20-rc1`.
///
/// Release segments compare numerically and trailing zeros are ignored, so
/// `1.10 > 1.9` and `1.0 == 1.0.0`. A pre-release sorts before the final
/// release with the same segments.
#[derive(Debug, Clone)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<PreRelease>,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^v?(?P<release>\d+(?:\.\d+)*)(?:[-_.]?(?P<tag>alpha|a|beta|b|rc|c|preview|pre)[-_.]?(?P<num>\d+)?)?$",
        )
        .unwrap_or_else(|e| panic!("invalid version pattern: {}", e))
    })
}

impl Version {
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some()
    }

    fn significant_release(&self) -> &[u64] {
        let end = self
            .release
            .iter()
            .rposition(|&segment| segment != 0)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let caps = version_pattern()
            .captures(text)
            .ok_or_else(|| InvalidVersion(s.to_string()))?;

        let release = caps["release"]
            .split('.')
            .map(|segment| segment.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InvalidVersion(s.to_string()))?;

        let pre = match caps.name("tag") {
            Some(tag) => {
                let number = match caps.name("num") {
                    Some(num) => num
                        .as_str()
                        .parse::<u64>()
                        .map_err(|_| InvalidVersion(s.to_string()))?,
                    None => 0,
                };
                Some(match tag.as_str().to_lowercase().as_str() {
                    "a" | "alpha" => PreRelease::Alpha(number),
                    "b" | "beta" => PreRelease::Beta(number),
                    _ => PreRelease::Candidate(number),
                })
            }
            None => None,
        };

        Ok(Self { release, pre })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.significant_release()
            .cmp(other.significant_release())
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
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
        let release: Vec<String> = self.release.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some(pre) = self.pre {
            write!(f, "{}", pre)?;
        }
        Ok(())
    }
}
