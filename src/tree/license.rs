use serde::Deserialize;
use std::fmt;

/// License attached to every document of a channel
///
/// Configured by its display name, e.g. `license = "CC BY-NC-SA"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum License {
    #[serde(rename = "CC BY")]
    CcBy,
    #[serde(rename = "CC BY-SA")]
    CcBySa,
    #[serde(rename = "CC BY-ND")]
    CcByNd,
    #[serde(rename = "CC BY-NC")]
    CcByNc,
    #[serde(rename = "CC BY-NC-SA")]
    CcByNcSa,
    #[serde(rename = "CC BY-NC-ND")]
    CcByNcNd,
    #[serde(rename = "All Rights Reserved")]
    AllRightsReserved,
    #[serde(rename = "Public Domain")]
    PublicDomain,
    #[serde(rename = "Special Permissions")]
    SpecialPermissions,
}

impl License {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CcBy => "CC BY",
            Self::CcBySa => "CC BY-SA",
            Self::CcByNd => "CC BY-ND",
            Self::CcByNc => "CC BY-NC",
            Self::CcByNcSa => "CC BY-NC-SA",
            Self::CcByNcNd => "CC BY-NC-ND",
            Self::AllRightsReserved => "All Rights Reserved",
            Self::PublicDomain => "Public Domain",
            Self::SpecialPermissions => "Special Permissions",
        }
    }

    /// Returns true if documents under this license need a copyright holder
    pub fn requires_copyright_holder(&self) -> bool {
        !matches!(self, Self::PublicDomain)
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
