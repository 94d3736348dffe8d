//! SP-API marketplaces with their identifiers and regional endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported Amazon marketplaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    #[default]
    Us,
    Ca,
    Mx,
    Br,
    Uk,
    De,
    Fr,
    Es,
    It,
    Nl,
    Se,
    Pl,
    In,
    Jp,
    Au,
}

impl Marketplace {
    /// Returns the SP-API marketplace identifier.
    pub fn marketplace_id(&self) -> &'static str {
        match self {
            Marketplace::Us => "ATVPDKIKX0DER",
            Marketplace::Ca => "A2EUQ1WTGCTBG2",
            Marketplace::Mx => "A1AM78C64UM0Y8",
            Marketplace::Br => "A2Q3Y263D00KWC",
            Marketplace::Uk => "A1F83G8C2ARO7P",
            Marketplace::De => "A1PA6795UKMFR9",
            Marketplace::Fr => "A13V1IB3VIYZZH",
            Marketplace::Es => "A1RKKUPIHCS9HS",
            Marketplace::It => "APJ6JRA9NG5V4",
            Marketplace::Nl => "A1805IZSGTT6HS",
            Marketplace::Se => "A2NODRKZP88ZB9",
            Marketplace::Pl => "A1C3SOZRARQ6R3",
            Marketplace::In => "A21TJRUUN4KGV",
            Marketplace::Jp => "A1VC38T7YXB528",
            Marketplace::Au => "A39IBJ37TRP1C6",
        }
    }

    /// Returns the SP-API region code this marketplace is served from.
    pub fn region(&self) -> &'static str {
        match self {
            Marketplace::Us | Marketplace::Ca | Marketplace::Mx | Marketplace::Br => "na",
            Marketplace::Uk
            | Marketplace::De
            | Marketplace::Fr
            | Marketplace::Es
            | Marketplace::It
            | Marketplace::Nl
            | Marketplace::Se
            | Marketplace::Pl
            | Marketplace::In => "eu",
            Marketplace::Jp | Marketplace::Au => "fe",
        }
    }

    /// Returns the SP-API endpoint for this marketplace's region.
    pub fn endpoint(&self) -> String {
        format!("https://sellingpartnerapi-{}.amazon.com", self.region())
    }

    /// Returns all supported marketplaces.
    pub fn all() -> &'static [Marketplace] {
        &[
            Marketplace::Us,
            Marketplace::Ca,
            Marketplace::Mx,
            Marketplace::Br,
            Marketplace::Uk,
            Marketplace::De,
            Marketplace::Fr,
            Marketplace::Es,
            Marketplace::It,
            Marketplace::Nl,
            Marketplace::Se,
            Marketplace::Pl,
            Marketplace::In,
            Marketplace::Jp,
            Marketplace::Au,
        ]
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Marketplace::Us => "us",
            Marketplace::Ca => "ca",
            Marketplace::Mx => "mx",
            Marketplace::Br => "br",
            Marketplace::Uk => "uk",
            Marketplace::De => "de",
            Marketplace::Fr => "fr",
            Marketplace::Es => "es",
            Marketplace::It => "it",
            Marketplace::Nl => "nl",
            Marketplace::Se => "se",
            Marketplace::Pl => "pl",
            Marketplace::In => "in",
            Marketplace::Jp => "jp",
            Marketplace::Au => "au",
        };
        write!(f, "{}", code)
    }
}

impl FromStr for Marketplace {
    type Err = MarketplaceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" | "usa" | "united states" => Ok(Marketplace::Us),
            "ca" | "canada" => Ok(Marketplace::Ca),
            "mx" | "mexico" => Ok(Marketplace::Mx),
            "br" | "brazil" => Ok(Marketplace::Br),
            "uk" | "gb" | "united kingdom" => Ok(Marketplace::Uk),
            "de" | "germany" => Ok(Marketplace::De),
            "fr" | "france" => Ok(Marketplace::Fr),
            "es" | "spain" => Ok(Marketplace::Es),
            "it" | "italy" => Ok(Marketplace::It),
            "nl" | "netherlands" => Ok(Marketplace::Nl),
            "se" | "sweden" => Ok(Marketplace::Se),
            "pl" | "poland" => Ok(Marketplace::Pl),
            "in" | "india" => Ok(Marketplace::In),
            "jp" | "japan" => Ok(Marketplace::Jp),
            "au" | "australia" => Ok(Marketplace::Au),
            _ => Err(MarketplaceParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown marketplace '{0}'. Valid marketplaces: us, ca, mx, br, uk, de, fr, es, it, nl, se, pl, in, jp, au")]
pub struct MarketplaceParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marketplace_parsing() {
        assert_eq!(Marketplace::from_str("us").unwrap(), Marketplace::Us);
        assert_eq!(Marketplace::from_str("usa").unwrap(), Marketplace::Us);
        assert_eq!(Marketplace::from_str("united states").unwrap(), Marketplace::Us);
        assert_eq!(Marketplace::from_str("ca").unwrap(), Marketplace::Ca);
        assert_eq!(Marketplace::from_str("uk").unwrap(), Marketplace::Uk);
        assert_eq!(Marketplace::from_str("gb").unwrap(), Marketplace::Uk);
        assert_eq!(Marketplace::from_str("germany").unwrap(), Marketplace::De);
        assert_eq!(Marketplace::from_str("jp").unwrap(), Marketplace::Jp);
        assert_eq!(Marketplace::from_str("australia").unwrap(), Marketplace::Au);

        // Case insensitive
        assert_eq!(Marketplace::from_str("US").unwrap(), Marketplace::Us);
        assert_eq!(Marketplace::from_str("FRANCE").unwrap(), Marketplace::Fr);

        // Invalid
        assert!(Marketplace::from_str("invalid").is_err());
        assert!(Marketplace::from_str("").is_err());
    }

    #[test]
    fn test_marketplace_ids() {
        assert_eq!(Marketplace::Us.marketplace_id(), "ATVPDKIKX0DER");
        assert_eq!(Marketplace::Ca.marketplace_id(), "A2EUQ1WTGCTBG2");
        assert_eq!(Marketplace::Uk.marketplace_id(), "A1F83G8C2ARO7P");
        assert_eq!(Marketplace::De.marketplace_id(), "A1PA6795UKMFR9");
        assert_eq!(Marketplace::Jp.marketplace_id(), "A1VC38T7YXB528");
    }

    #[test]
    fn test_marketplace_regions() {
        assert_eq!(Marketplace::Us.region(), "na");
        assert_eq!(Marketplace::Ca.region(), "na");
        assert_eq!(Marketplace::Mx.region(), "na");
        assert_eq!(Marketplace::Br.region(), "na");
        assert_eq!(Marketplace::Uk.region(), "eu");
        assert_eq!(Marketplace::De.region(), "eu");
        assert_eq!(Marketplace::In.region(), "eu");
        assert_eq!(Marketplace::Jp.region(), "fe");
        assert_eq!(Marketplace::Au.region(), "fe");
    }

    #[test]
    fn test_marketplace_endpoints() {
        assert_eq!(Marketplace::Us.endpoint(), "https://sellingpartnerapi-na.amazon.com");
        assert_eq!(Marketplace::De.endpoint(), "https://sellingpartnerapi-eu.amazon.com");
        assert_eq!(Marketplace::Jp.endpoint(), "https://sellingpartnerapi-fe.amazon.com");
    }

    #[test]
    fn test_marketplace_all() {
        let all = Marketplace::all();
        assert_eq!(all.len(), 15);
        assert!(all.contains(&Marketplace::Us));
        assert!(all.contains(&Marketplace::Au));
    }

    #[test]
    fn test_marketplace_display() {
        assert_eq!(Marketplace::Us.to_string(), "us");
        assert_eq!(Marketplace::Uk.to_string(), "uk");
        assert_eq!(Marketplace::Au.to_string(), "au");
    }

    #[test]
    fn test_marketplace_default() {
        assert_eq!(Marketplace::default(), Marketplace::Us);
    }

    #[test]
    fn test_marketplace_parse_error_display() {
        let err = Marketplace::from_str("xyz").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("Valid marketplaces"));
    }

    #[test]
    fn test_marketplace_serde() {
        let marketplace = Marketplace::Us;
        let json = serde_json::to_string(&marketplace).unwrap();
        assert_eq!(json, "\"us\"");

        let parsed: Marketplace = serde_json::from_str("\"uk\"").unwrap();
        assert_eq!(parsed, Marketplace::Uk);
    }
}
