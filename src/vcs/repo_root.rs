//! Mapping import paths to repositories
//!
//! Only hosting sites with a well-known layout are recognised, plus import
//! paths that name their VCS explicitly with a `.git`, `.hg` or `.bzr`
//! qualifier. Nothing is looked up over the network.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::VcsKind;
use crate::error::{HackError, Result};

/// Where the source for an import path lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRoot {
    pub vcs: VcsKind,

    /// URL to clone from
    pub repo: String,

    /// Import path corresponding to the top of the repository
    pub root: String,
}

impl RepoRoot {
    /// Path of `import_path` relative to the repository root, `""` at the root
    pub fn subpath<'a>(&self, import_path: &'a str) -> &'a str {
        import_path
            .strip_prefix(self.root.as_str())
            .map_or("", |rest| rest.trim_start_matches('/'))
    }
}

struct HostRule {
    prefix: &'static str,
    pattern: &'static str,
    resolve: fn(&Captures<'_>) -> Option<RepoRoot>,
}

const ELEM: &str = r"[A-Za-z0-9_.\-]+";

fn https(vcs: VcsKind, caps: &Captures<'_>) -> Option<RepoRoot> {
    let root = caps.name("root")?.as_str();
    Some(RepoRoot {
        vcs,
        repo: format!("https://{root}"),
        root: root.to_string(),
    })
}

fn git_https(caps: &Captures<'_>) -> Option<RepoRoot> {
    https(VcsKind::Git, caps)
}

fn bzr_https(caps: &Captures<'_>) -> Option<RepoRoot> {
    https(VcsKind::Bazaar, caps)
}

fn golang_x(caps: &Captures<'_>) -> Option<RepoRoot> {
    let root = caps.name("root")?.as_str();
    let name = caps.name("name")?.as_str();
    Some(RepoRoot {
        vcs: VcsKind::Git,
        repo: format!("https://go.googlesource.com/{name}"),
        root: root.to_string(),
    })
}

fn gopkg_in(caps: &Captures<'_>) -> Option<RepoRoot> {
    let root = caps.name("root")?.as_str();
    let pkg = caps.name("pkg")?.as_str();
    let user = caps.name("user").map_or_else(|| format!("go-{pkg}"), |u| u.as_str().to_string());
    Some(RepoRoot {
        vcs: VcsKind::Git,
        repo: format!("https://github.com/{user}/{pkg}"),
        root: root.to_string(),
    })
}

fn qualified(caps: &Captures<'_>) -> Option<RepoRoot> {
    https(VcsKind::from_name(caps.name("vcs")?.as_str())?, caps)
}

fn host_rules() -> Vec<HostRule> {
    vec![
        HostRule {
            prefix: "github.com/",
            pattern: r"^(?P<root>github\.com/ELEM/ELEM)(/ELEM)*$",
            resolve: git_https,
        },
        HostRule {
            prefix: "bitbucket.org/",
            pattern: r"^(?P<root>bitbucket\.org/ELEM/ELEM)(/ELEM)*$",
            resolve: git_https,
        },
        HostRule {
            prefix: "hub.jazz.net/git/",
            pattern: r"^(?P<root>hub\.jazz\.net/git/[a-z0-9]+/ELEM)(/ELEM)*$",
            resolve: git_https,
        },
        HostRule {
            prefix: "git.apache.org/",
            pattern: r"^(?P<root>git\.apache\.org/[a-z0-9_.\-]+\.git)(/ELEM)*$",
            resolve: git_https,
        },
        HostRule {
            prefix: "git.openstack.org/",
            pattern: r"^(?P<root>git\.openstack\.org/ELEM/ELEM)(\.git)?(/ELEM)*$",
            resolve: git_https,
        },
        HostRule {
            prefix: "launchpad.net/",
            pattern: r"^(?P<root>launchpad\.net/((ELEM)(/ELEM)?|~ELEM/(\+junk|ELEM)/ELEM))(/ELEM)*$",
            resolve: bzr_https,
        },
        HostRule {
            prefix: "golang.org/x/",
            pattern: r"^(?P<root>golang\.org/x/(?P<name>[A-Za-z0-9_\-]+))(/ELEM)*$",
            resolve: golang_x,
        },
        HostRule {
            prefix: "gopkg.in/",
            pattern: r"^(?P<root>gopkg\.in/(?:(?P<user>[a-zA-Z0-9][-a-zA-Z0-9]*)/)?(?P<pkg>[a-zA-Z][-.a-zA-Z0-9]*)\.(?:v0|v[1-9][0-9]*)(?:\.0|\.[1-9][0-9]*){0,2}(?:-unstable)?)(?:\.git)?(/[a-zA-Z0-9][-.a-zA-Z0-9]*)*$",
            resolve: gopkg_in,
        },
        HostRule {
            prefix: "",
            pattern: r"^(?P<root>([a-z0-9.\-]+\.)+[a-z0-9.\-]+(:[0-9]+)?(/~?ELEM)+?\.(?P<vcs>bzr|git|hg))(/~?ELEM)*$",
            resolve: qualified,
        },
    ]
}

#[allow(clippy::unwrap_used)]
static RULES: LazyLock<Vec<(HostRule, Regex)>> = LazyLock::new(|| {
    host_rules()
        .into_iter()
        .map(|rule| {
            let re = Regex::new(&rule.pattern.replace("ELEM", ELEM)).unwrap();
            (rule, re)
        })
        .collect()
});

/// Work out the repository holding the package at `import_path`
pub fn resolve(import_path: &str) -> Result<RepoRoot> {
    let unknown = |reason: &str| HackError::UnknownRepositoryRoot {
        path: import_path.to_string(),
        reason: reason.to_string(),
    };

    for (rule, re) in RULES.iter() {
        if !import_path.starts_with(rule.prefix) {
            continue;
        }
        let Some(caps) = re.captures(import_path) else {
            if rule.prefix.is_empty() {
                continue;
            }
            return Err(unknown("invalid path for hosting site"));
        };
        return (rule.resolve)(&caps).ok_or_else(|| unknown("unsupported version control system"));
    }
    Err(unknown("no known hosting site or VCS qualifier"))
}
