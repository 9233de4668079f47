use super::model::Platform;
use crate::Result;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use url::Url;

/// A repository on one of the hosting platforms with analytics support
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    platform: Platform,
    url: Url,
    owner: Box<str>,
    repo: Box<str>,
}

impl RepoRef {
    /// Parse a repository web URL.
    ///
    /// `platform` overrides the platform implied by the host, which allows self-hosted instances.
    /// GitLab paths may contain nested groups; everything before the last segment is the owner.
    pub fn parse(url: &str, platform: Option<Platform>) -> Result<Self> {
        let url = Url::parse(url).into_app_err_with(|| format!("invalid repository URL '{url}'"))?;
        let platform = platform.unwrap_or_else(|| Platform::from_host(url.host_str().unwrap_or_default()));

        if platform == Platform::Other {
            bail!("no analytics support for repositories hosted at {url}");
        }

        let mut segments: Vec<_> = url
            .path_segments()
            .map(|s| s.take_while(|seg| *seg != "-").filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        if platform != Platform::Gitlab {
            segments.truncate(2);
        }

        let Some((repo, owner)) = segments.split_last() else {
            bail!("invalid repository URL format: {url}");
        };

        if owner.is_empty() {
            bail!("invalid repository URL: missing owner or repository name: {url}");
        }

        Ok(Self {
            platform,
            owner: Box::from(owner.join("/")),
            repo: Box::from(repo.trim_end_matches(".git")),
            url,
        })
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// `owner/repo`
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_url() {
        let repo = RepoRef::parse("https://github.com/tokio-rs/tokio.git", None).unwrap();
        assert_eq!(repo.platform(), Platform::Github);
        assert_eq!(repo.owner(), "tokio-rs");
        assert_eq!(repo.repo(), "tokio");

        let repo = RepoRef::parse("https://github.com/rust-lang/rust/tree/master/src", None).unwrap();
        assert_eq!(repo.full_name(), "rust-lang/rust");
    }

    #[test]
    fn test_gitlab_nested_groups() {
        let repo = RepoRef::parse("https://gitlab.com/gitlab-org/security/gitlab/-/issues", None).unwrap();
        assert_eq!(repo.platform(), Platform::Gitlab);
        assert_eq!(repo.owner(), "gitlab-org/security");
        assert_eq!(repo.repo(), "gitlab");
    }

    #[test]
    fn test_platform_override() {
        let repo = RepoRef::parse("https://git.example.org/team/tool", Some(Platform::Codeberg)).unwrap();
        assert_eq!(repo.platform(), Platform::Codeberg);
        assert_eq!(repo.full_name(), "team/tool");
    }

    #[test]
    fn test_rejects_bad_urls() {
        assert!(RepoRef::parse("not a url", None).is_err());
        assert!(RepoRef::parse("https://github.com/only-owner", None).is_err());
        assert!(RepoRef::parse("https://example.com/a/b", None).is_err());
    }
}
