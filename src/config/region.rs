//! Regions served by the SES classic query API.

use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// A region in which the SES classic endpoint is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SesRegion {
    /// `us-east-1`, the primary region.
    #[default]
    UsEast1,
    /// `eu-west-1`.
    EuWest1,
}

impl SesRegion {
    /// Every supported region.
    pub const ALL: [SesRegion; 2] = [SesRegion::EuWest1, SesRegion::UsEast1];

    /// The region used when none is supplied.
    pub const PRIMARY: SesRegion = SesRegion::UsEast1;

    /// The region identifier, e.g. `us-east-1`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SesRegion::UsEast1 => "us-east-1",
            SesRegion::EuWest1 => "eu-west-1",
        }
    }

    /// Resolve an optional, caller-supplied region.
    ///
    /// `None` and the empty string fall back to [`SesRegion::PRIMARY`]. Any
    /// other value must name a supported region, compared case-insensitively.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ses_archiver::config::SesRegion;
    ///
    /// assert_eq!(SesRegion::resolve(None).unwrap(), SesRegion::UsEast1);
    /// assert_eq!(SesRegion::resolve(Some("EU-West-1")).unwrap(), SesRegion::EuWest1);
    /// assert!(SesRegion::resolve(Some("ap-south-1")).is_err());
    /// ```
    pub fn resolve(region: Option<&str>) -> Result<Self, ConfigError> {
        match region {
            None => Ok(Self::PRIMARY),
            Some(r) if r.is_empty() => Ok(Self::PRIMARY),
            Some(r) => r.parse(),
        }
    }
}

impl FromStr for SesRegion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == lowered)
            .ok_or_else(|| ConfigError::InvalidRegion {
                region: s.to_string(),
            })
    }
}

impl fmt::Display for SesRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("us-east-1", SesRegion::UsEast1)]
    #[case("US-EAST-1", SesRegion::UsEast1)]
    #[case("eu-west-1", SesRegion::EuWest1)]
    #[case("Eu-West-1", SesRegion::EuWest1)]
    fn test_supported_regions_parse(#[case] input: &str, #[case] expected: SesRegion) {
        assert_eq!(input.parse::<SesRegion>().unwrap(), expected);
    }

    #[rstest]
    #[case("us-west-2")]
    #[case("ap-southeast-2")]
    #[case("useast1")]
    #[case(" us-east-1")]
    fn test_unsupported_regions_rejected(#[case] input: &str) {
        match SesRegion::resolve(Some(input)) {
            Err(ConfigError::InvalidRegion { region }) => assert_eq!(region, input),
            other => panic!("Expected InvalidRegion, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_region_defaults_to_primary() {
        assert_eq!(SesRegion::resolve(None).unwrap(), SesRegion::UsEast1);
        assert_eq!(SesRegion::resolve(Some("")).unwrap(), SesRegion::UsEast1);
        assert_eq!(SesRegion::default(), SesRegion::PRIMARY);
    }

    #[test]
    fn test_display() {
        assert_eq!(SesRegion::EuWest1.to_string(), "eu-west-1");
    }
}
