// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `vcs`

#[cfg(test)]
mod tests {
    use crate::errors::VcsError;
    use crate::vcs::{
        app_version, parse_tag, remote_base_path, repo_info, GitCli, StaticVcs,
    };

    // ========================================================================
    // Remote URL parsing
    // ========================================================================

    #[test]
    fn test_remote_base_path_https() {
        assert_eq!(
            remote_base_path("https://github.com/org/cartservice.git").unwrap(),
            "github.com/org/cartservice"
        );
    }

    #[test]
    fn test_remote_base_path_ssh_url() {
        assert_eq!(
            remote_base_path("ssh://git@github.com/org/cartservice.git").unwrap(),
            "github.com/org/cartservice"
        );
    }

    #[test]
    fn test_remote_base_path_scp_like() {
        assert_eq!(
            remote_base_path("git@github.com:org/cartservice.git").unwrap(),
            "github.com/org/cartservice"
        );
    }

    #[test]
    fn test_remote_base_path_bare() {
        assert_eq!(
            remote_base_path("github.com/org/cartservice").unwrap(),
            "github.com/org/cartservice"
        );
    }

    #[test]
    fn test_remote_base_path_lowercases() {
        assert_eq!(
            remote_base_path("https://GitHub.com/Org/CartService").unwrap(),
            "github.com/org/cartservice"
        );
    }

    #[test]
    fn test_remote_base_path_rejects_missing_path() {
        let err = remote_base_path("github.com").unwrap_err();
        assert!(matches!(err, VcsError::InvalidRemoteUrl { .. }));
        assert_eq!(
            err.to_string(),
            "repository remote URL is invalid: 'github.com'"
        );

        assert!(remote_base_path("https://github.com/").is_err());
        assert!(remote_base_path("").is_err());
    }

    // ========================================================================
    // Repository identity
    // ========================================================================

    #[test]
    fn test_repo_info_single_remote() {
        let vcs = StaticVcs::new(&["https://github.com/org/cartservice.git"], None);
        let info = repo_info(&vcs).unwrap();
        assert_eq!(info.app_name, "cartservice");
        assert_eq!(
            info.project_url.as_str(),
            "https://github.com/org/cartservice"
        );
    }

    #[test]
    fn test_repo_info_no_remote_url() {
        let vcs = StaticVcs::new(&[], None);
        let err = repo_info(&vcs).unwrap_err();
        assert!(matches!(err, VcsError::NoRemoteUrl { .. }));
        assert_eq!(
            err.to_string(),
            "remote URL not found for remote 'origin'"
        );
    }

    #[test]
    fn test_repo_info_multiple_remote_urls() {
        let vcs = StaticVcs::new(
            &[
                "https://github.com/org/cartservice.git",
                "https://gitlab.com/org/cartservice.git",
            ],
            None,
        );
        let err = repo_info(&vcs).unwrap_err();
        assert!(matches!(
            err,
            VcsError::MultipleRemoteUrls { count: 2, .. }
        ));
        assert_eq!(
            err.to_string(),
            "found more than 1 remote URL for remote 'origin' (2 URLs)"
        );
    }

    // ========================================================================
    // Version tags
    // ========================================================================

    #[test]
    fn test_parse_tag_strips_v_prefix() {
        assert_eq!(parse_tag("v2.3.1").unwrap(), semver::Version::new(2, 3, 1));
        assert_eq!(parse_tag("2.3.1").unwrap(), semver::Version::new(2, 3, 1));
    }

    #[test]
    fn test_parse_tag_keeps_prerelease() {
        let version = parse_tag("v1.0.0-rc.1").unwrap();
        assert_eq!(version.major, 1);
        assert_eq!(version.pre.as_str(), "rc.1");
    }

    #[test]
    fn test_parse_tag_malformed() {
        let err = parse_tag("release-2024").unwrap_err();
        assert!(matches!(err, VcsError::MalformedTag { ref tag, .. } if tag == "release-2024"));
    }

    #[test]
    fn test_app_version_without_tags() {
        let vcs = StaticVcs::new(&["github.com/org/app"], None);
        assert!(matches!(app_version(&vcs), Err(VcsError::NoTag)));
    }

    #[test]
    fn test_app_version_from_tag() {
        let vcs = StaticVcs::new(&["github.com/org/app"], Some("v0.4.2"));
        assert_eq!(app_version(&vcs).unwrap(), semver::Version::new(0, 4, 2));
    }

    // ========================================================================
    // git CLI (requires a git binary)
    // ========================================================================

    fn git(dir: &std::path::Path, args: &[&str]) {
        let status = std::process::Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .status()
            .expect("git must be installed");
        assert!(status.success(), "git {args:?} failed");
    }

    #[test]
    #[ignore = "requires a git binary"]
    fn test_git_cli_reads_remote_and_tag() {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);
        git(dir.path(), &["config", "user.email", "ci@example.com"]);
        git(dir.path(), &["config", "user.name", "ci"]);
        git(
            dir.path(),
            &["remote", "add", "origin", "git@github.com:org/cartservice.git"],
        );
        git(dir.path(), &["commit", "-q", "--allow-empty", "-m", "init"]);
        git(dir.path(), &["tag", "v2.3.1"]);

        let cli = GitCli::new(dir.path());
        let info = repo_info(&cli).unwrap();
        assert_eq!(info.app_name, "cartservice");
        assert_eq!(app_version(&cli).unwrap(), semver::Version::new(2, 3, 1));
    }

    #[test]
    #[ignore = "requires a git binary"]
    fn test_git_cli_without_origin() {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init", "-q"]);

        let cli = GitCli::new(dir.path());
        assert!(matches!(
            repo_info(&cli),
            Err(VcsError::NoRemoteUrl { .. })
        ));
    }
}
