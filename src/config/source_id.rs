use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Broad category of an external source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceKind {
    CodeHosting,
    PackageRegistry,
    Aggregator,
    MobileOpenSource,
}

/// Every source the tool knows about, in catalog order.
///
/// Iterating with [`strum::IntoEnumIterator`] yields the sources in the order they are declared here,
/// which is also the order used by the default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SourceId {
    Github,
    Gitlab,
    Bitbucket,
    Codeberg,
    Sourceforge,
    Npm,
    Pypi,
    Packagist,
    Rubygems,
    CratesIo,
    MavenCentral,
    Nuget,
    LibrariesIo,
    OpenHub,
    FDroid,
}

impl SourceId {
    /// Human-readable name, used as the platform label on records and in partial errors
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Github => "GitHub",
            Self::Gitlab => "GitLab",
            Self::Bitbucket => "Bitbucket",
            Self::Codeberg => "Codeberg",
            Self::Sourceforge => "SourceForge",
            Self::Npm => "NPM",
            Self::Pypi => "PyPI",
            Self::Packagist => "Packagist",
            Self::Rubygems => "RubyGems",
            Self::CratesIo => "Crates.io",
            Self::MavenCentral => "Maven Central",
            Self::Nuget => "NuGet",
            Self::LibrariesIo => "Libraries.io",
            Self::OpenHub => "Open Hub",
            Self::FDroid => "F-Droid",
        }
    }

    #[must_use]
    pub const fn kind(self) -> SourceKind {
        match self {
            Self::Github | Self::Gitlab | Self::Bitbucket | Self::Codeberg | Self::Sourceforge => SourceKind::CodeHosting,
            Self::Npm | Self::Pypi | Self::Packagist | Self::Rubygems | Self::CratesIo | Self::MavenCentral | Self::Nuget => {
                SourceKind::PackageRegistry
            }
            Self::LibrariesIo | Self::OpenHub => SourceKind::Aggregator,
            Self::FDroid => SourceKind::MobileOpenSource,
        }
    }

    /// Default search endpoint for the source
    #[must_use]
    pub const fn api_url(self) -> &'static str {
        match self {
            Self::Github => "https://api.github.com/search/repositories",
            Self::Gitlab => "https://gitlab.com/api/v4/projects",
            Self::Bitbucket => "https://api.bitbucket.org/2.0/repositories",
            Self::Codeberg => "https://codeberg.org/api/v1/repos/search",
            Self::Sourceforge => "https://sourceforge.net/directory/",
            Self::Npm => "https://registry.npmjs.org/-/v1/search",
            Self::Pypi => "https://pypi.org/search/",
            Self::Packagist => "https://packagist.org/search.json",
            Self::Rubygems => "https://rubygems.org/api/v1/search.json",
            Self::CratesIo => "https://crates.io/api/v1/crates",
            Self::MavenCentral => "https://search.maven.org/solrsearch/select",
            Self::Nuget => "https://api.nuget.org/v3/query",
            Self::LibrariesIo => "https://libraries.io/api",
            Self::OpenHub => "https://www.openhub.net",
            Self::FDroid => "https://f-droid.org/repo/index.xml",
        }
    }

    /// Whether a working adapter exists for this source
    #[must_use]
    pub const fn is_implemented(self) -> bool {
        !matches!(
            self,
            Self::Bitbucket | Self::Sourceforge | Self::Pypi | Self::Rubygems | Self::LibrariesIo | Self::OpenHub | Self::FDroid
        )
    }
}
