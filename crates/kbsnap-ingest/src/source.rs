use crate::error::{IngestError, Result};

/// A parsed GitHub repository locator.
///
/// Accepted forms:
///   - `https://github.com/{owner}/{repo}`
///   - `https://github.com/{owner}/{repo}/tree/{ref}`
///   - `https://github.com/{owner}/{repo}/tree/{ref}/{subpath…}`
///
/// A ref embedded in the URL takes precedence over the branch configured on
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSource {
    pub owner: String,
    pub repo: String,
    /// Ref pinned in the URL, if any.
    pub reference: Option<String>,
    /// Subtree to ingest; empty means the whole repository.
    pub subpath: String,
}

impl RepoSource {
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        let rest = rest.strip_prefix("www.").unwrap_or(rest);
        let rest = rest
            .strip_prefix("github.com/")
            .ok_or_else(|| IngestError::InvalidSource(format!("not a github.com URL: {url}")))?;

        let mut segments = rest.trim_matches('/').split('/');
        let owner = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IngestError::InvalidSource(format!("missing owner: {url}")))?;
        let repo = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IngestError::InvalidSource(format!("missing repository: {url}")))?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);

        let mut reference = None;
        let mut subpath = String::new();
        if let Some(kind) = segments.next() {
            if kind != "tree" {
                return Err(IngestError::InvalidSource(format!(
                    "unsupported path segment '{kind}' in {url} (only /tree/<ref> is supported)"
                )));
            }
            let r = segments.next().filter(|s| !s.is_empty()).ok_or_else(|| {
                IngestError::InvalidSource(format!("/tree/ without a ref: {url}"))
            })?;
            reference = Some(r.to_string());
            subpath = segments.collect::<Vec<_>>().join("/");
        }

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            reference,
            subpath,
        })
    }

    /// Human-readable label used in the digest header.
    pub fn label(&self) -> String {
        if self.subpath.is_empty() {
            format!("{}/{}", self.owner, self.repo)
        } else {
            format!("{}/{}/{}", self.owner, self.repo, self.subpath)
        }
    }

    /// True when `path` (repo-relative) falls inside the configured subtree.
    pub fn contains(&self, path: &str) -> bool {
        if self.subpath.is_empty() {
            return true;
        }
        path == self.subpath || path.starts_with(&format!("{}/", self.subpath))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_repo_url() {
        let s = RepoSource::parse("https://github.com/recharts/recharts").unwrap();
        assert_eq!(s.owner, "recharts");
        assert_eq!(s.repo, "recharts");
        assert_eq!(s.reference, None);
        assert_eq!(s.subpath, "");
    }

    #[test]
    fn tree_url_with_subpath() {
        let s =
            RepoSource::parse("https://github.com/recharts/recharts/tree/3.x/storybook").unwrap();
        assert_eq!(s.reference.as_deref(), Some("3.x"));
        assert_eq!(s.subpath, "storybook");
        assert_eq!(s.label(), "recharts/recharts/storybook");
    }

    #[test]
    fn tree_url_with_nested_subpath() {
        let s = RepoSource::parse("https://github.com/o/r/tree/main/docs/api").unwrap();
        assert_eq!(s.reference.as_deref(), Some("main"));
        assert_eq!(s.subpath, "docs/api");
    }

    #[test]
    fn git_suffix_and_trailing_slash() {
        let s = RepoSource::parse("https://github.com/o/r.git").unwrap();
        assert_eq!(s.repo, "r");
        let s = RepoSource::parse("https://github.com/o/r/").unwrap();
        assert_eq!(s.repo, "r");
    }

    #[test]
    fn rejects_non_github() {
        assert!(RepoSource::parse("https://gitlab.com/o/r").is_err());
    }

    #[test]
    fn rejects_blob_urls() {
        assert!(RepoSource::parse("https://github.com/o/r/blob/main/README.md").is_err());
    }

    #[test]
    fn contains_respects_subtree_boundary() {
        let s = RepoSource::parse("https://github.com/o/r/tree/main/storybook").unwrap();
        assert!(s.contains("storybook/index.stories.tsx"));
        assert!(!s.contains("storybook-extras/other.ts"));
        assert!(!s.contains("src/index.ts"));
    }

    #[test]
    fn contains_everything_without_subpath() {
        let s = RepoSource::parse("https://github.com/o/r").unwrap();
        assert!(s.contains("anything/at/all.rs"));
    }
}
