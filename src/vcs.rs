// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Version-control metadata used to default the application identity.
//!
//! The application name and project URL come from the single URL of the
//! `origin` remote; the application version comes from the most recent tag.
//! [`VcsMetadata`] abstracts the repository so resolution can be tested without
//! a checkout; [`GitCli`] is the production implementation.

use crate::constants::{PROJECT_URL_SCHEME, VCS_REMOTE_NAME};
use crate::errors::VcsError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use url::Url;

/// Read-only view of a repository's remotes and tags.
pub trait VcsMetadata: Send + Sync {
    /// Every URL configured for `remote`, in configuration order.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError`] if the repository cannot be queried.
    fn remote_urls(&self, remote: &str) -> Result<Vec<String>, VcsError>;

    /// The most recent tag reachable from the current commit.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::NoTag`] if the repository has no tags.
    fn latest_tag(&self) -> Result<String, VcsError>;
}

/// Identity of the project as seen from its remote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoInfo {
    /// Last path segment of the remote (e.g. "cartservice")
    pub app_name: String,
    /// Canonical `https://host/org/repo` URL
    pub project_url: Url,
}

/// Reads the application name and project URL from the `origin` remote.
///
/// # Errors
///
/// - [`VcsError::NoRemoteUrl`] if `origin` has no URL
/// - [`VcsError::MultipleRemoteUrls`] if it has more than one
/// - [`VcsError::InvalidRemoteUrl`] if the URL has no repository path
pub fn repo_info(vcs: &dyn VcsMetadata) -> Result<RepoInfo, VcsError> {
    let urls = vcs.remote_urls(VCS_REMOTE_NAME)?;
    let remote_url = match urls.as_slice() {
        [] => {
            return Err(VcsError::NoRemoteUrl {
                remote: VCS_REMOTE_NAME.to_string(),
            })
        }
        [url] => url,
        _ => {
            return Err(VcsError::MultipleRemoteUrls {
                remote: VCS_REMOTE_NAME.to_string(),
                count: urls.len(),
            })
        }
    };

    let base_path = remote_base_path(remote_url)?;
    let app_name = base_path
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let project_url = Url::parse(&format!("{PROJECT_URL_SCHEME}://{base_path}")).map_err(|_| {
        VcsError::InvalidRemoteUrl {
            url: remote_url.clone(),
        }
    })?;

    debug!(app_name = %app_name, project_url = %project_url, "Resolved repository identity");
    Ok(RepoInfo {
        app_name,
        project_url,
    })
}

/// Reads the application version from the most recent tag.
///
/// A leading `v` is stripped before parsing (`v2.3.1` is `2.3.1`).
///
/// # Errors
///
/// Returns [`VcsError::MalformedTag`] if the tag is not a semantic version.
pub fn app_version(vcs: &dyn VcsMetadata) -> Result<semver::Version, VcsError> {
    let tag = vcs.latest_tag()?;
    parse_tag(&tag)
}

/// Parses a release tag into a semantic version.
///
/// # Errors
///
/// Returns [`VcsError::MalformedTag`] if the tag is not a semantic version.
pub fn parse_tag(tag: &str) -> Result<semver::Version, VcsError> {
    let trimmed = tag.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    semver::Version::parse(bare).map_err(|source| VcsError::MalformedTag {
        tag: tag.to_string(),
        source,
    })
}

/// Reduces a remote URL to `host/org/repo`.
///
/// Accepts `https://`, `ssh://` and `git://` URLs, scp-like `git@host:org/repo`
/// and bare `host/org/repo`, with or without a `.git` suffix.
///
/// # Errors
///
/// Returns [`VcsError::InvalidRemoteUrl`] if no host and path can be extracted.
pub fn remote_base_path(remote_url: &str) -> Result<String, VcsError> {
    let invalid = || VcsError::InvalidRemoteUrl {
        url: remote_url.to_string(),
    };
    let trimmed = remote_url.trim();

    let (host, path) = if trimmed.contains("://") {
        let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?.to_string();
        (host, parsed.path().to_string())
    } else if let Some((user_host, path)) = scp_like(trimmed) {
        let host = user_host.rsplit('@').next().unwrap_or(user_host).to_string();
        (host, path.to_string())
    } else {
        let (host, path) = trimmed.split_once('/').ok_or_else(invalid)?;
        (host.to_string(), path.to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if host.is_empty() || path.is_empty() {
        return Err(invalid());
    }

    let base_path = format!("{host}/{path}").to_lowercase();
    if base_path.split('/').count() < 2 {
        return Err(invalid());
    }
    Ok(base_path)
}

// `user@host:path`, as long as the part before ':' has no '/'
fn scp_like(url: &str) -> Option<(&str, &str)> {
    let (head, tail) = url.split_once(':')?;
    if head.contains('/') || tail.starts_with("//") {
        return None;
    }
    Some((head, tail))
}

/// [`VcsMetadata`] backed by the `git` command line in a working directory.
#[derive(Clone, Debug)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    #[must_use]
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    #[must_use]
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn run(&self, args: &[&str]) -> Result<Result<String, String>, VcsError> {
        let command = format!("git {}", args.join(" "));
        debug!(command = %command, repo = %self.repo_dir.display(), "Running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .map_err(|e| VcsError::Command {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if output.status.success() {
            Ok(Ok(String::from_utf8_lossy(&output.stdout).into_owned()))
        } else {
            Ok(Err(String::from_utf8_lossy(&output.stderr).trim().to_string()))
        }
    }
}

impl VcsMetadata for GitCli {
    fn remote_urls(&self, remote: &str) -> Result<Vec<String>, VcsError> {
        match self.run(&["remote", "get-url", "--all", remote])? {
            Ok(stdout) => Ok(stdout
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect()),
            Err(stderr) if stderr.contains("No such remote") => Ok(Vec::new()),
            Err(stderr) => Err(VcsError::Command {
                command: format!("git remote get-url --all {remote}"),
                reason: stderr,
            }),
        }
    }

    fn latest_tag(&self) -> Result<String, VcsError> {
        match self.run(&["describe", "--tags", "--abbrev=0"])? {
            Ok(stdout) => {
                let tag = stdout.trim().to_string();
                if tag.is_empty() {
                    Err(VcsError::NoTag)
                } else {
                    Ok(tag)
                }
            }
            Err(stderr) if stderr.contains("No names found") || stderr.contains("No tags") => {
                Err(VcsError::NoTag)
            }
            Err(stderr) => Err(VcsError::Command {
                command: "git describe --tags --abbrev=0".to_string(),
                reason: stderr,
            }),
        }
    }
}

/// [`VcsMetadata`] with a fixed set of remote URLs and an optional tag.
///
/// Useful when rendering outside a checkout, and as a test double.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticVcs {
    urls: Vec<String>,
    tag: Option<String>,
}

impl StaticVcs {
    #[must_use]
    pub fn new(urls: &[&str], tag: Option<&str>) -> Self {
        Self {
            urls: urls.iter().map(|u| (*u).to_string()).collect(),
            tag: tag.map(String::from),
        }
    }
}

impl VcsMetadata for StaticVcs {
    fn remote_urls(&self, _remote: &str) -> Result<Vec<String>, VcsError> {
        Ok(self.urls.clone())
    }

    fn latest_tag(&self) -> Result<String, VcsError> {
        self.tag.clone().ok_or(VcsError::NoTag)
    }
}
