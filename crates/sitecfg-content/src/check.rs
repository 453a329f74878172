//! Cross-reference of configuration links against the content tree.

use std::fmt;
use std::path::Path;

use sitecfg_config::{SiteConfig, is_external};

use crate::ContentError;
use crate::tree::{ContentTree, clean_link};

/// What is wrong with a reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemKind {
    /// Link does not resolve to a content page.
    DanglingLink,
    /// Head asset is missing from the public directory.
    MissingAsset,
}

/// One unresolved reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    /// Field path in the configuration (e.g. `sidebar[1].children[0]`).
    pub field: String,
    /// Link or asset path as written.
    pub target: String,
    /// Kind of failure.
    pub kind: ProblemKind,
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            ProblemKind::DanglingLink => "no page for",
            ProblemKind::MissingAsset => "missing asset",
        };
        write!(f, "[{}] {what} {}", self.field, self.target)
    }
}

/// Outcome of [`check`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentReport {
    problems: Vec<Problem>,
    checked: usize,
}

impl ContentReport {
    /// Unresolved references in configuration order.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Number of site-relative references examined.
    #[must_use]
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// Whether every reference resolved.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }

    /// Convert into `Err(ContentError::Dangling)` when anything is unresolved.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Dangling` carrying the report if any problem exists.
    pub fn into_result(self) -> Result<usize, ContentError> {
        if self.is_clean() {
            Ok(self.checked)
        } else {
            Err(ContentError::Dangling(self))
        }
    }

    fn push(&mut self, field: String, target: &str, kind: ProblemKind) {
        self.problems.push(Problem {
            field,
            target: target.to_owned(),
            kind,
        });
    }
}

impl fmt::Display for ContentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.problems.len();
        let noun = if count == 1 { "reference" } else { "references" };
        write!(f, "{count} unresolved {noun}")?;
        for problem in &self.problems {
            write!(f, "\n  {problem}")?;
        }
        Ok(())
    }
}

/// Check every site-relative link and head asset in `site`.
///
/// Nav links may also point at a file in `public_dir` (a PDF, say); sidebar
/// entries must be content pages. External URLs are skipped.
#[must_use]
pub fn check(site: &SiteConfig, tree: &ContentTree, public_dir: &Path) -> ContentReport {
    let mut report = ContentReport::default();

    site.walk_nav(|item, field| {
        if is_external(&item.link) {
            return;
        }
        report.checked += 1;
        if tree.resolve(&item.link).is_none() && !public_file_exists(public_dir, &item.link) {
            report.push(format!("{field}.link"), &item.link, ProblemKind::DanglingLink);
        }
    });

    for (i, group) in site.sidebar.iter().enumerate() {
        let links = group
            .path
            .iter()
            .map(|path| (format!("sidebar[{i}].path"), path))
            .chain(
                group
                    .children
                    .iter()
                    .enumerate()
                    .map(|(j, child)| (format!("sidebar[{i}].children[{j}]"), child)),
            );
        for (field, link) in links {
            if is_external(link) {
                continue;
            }
            report.checked += 1;
            if tree.resolve(link).is_none() {
                report.push(field, link, ProblemKind::DanglingLink);
            }
        }
    }

    for (i, tag) in site.head.iter().enumerate() {
        let Some((attr, asset)) = tag.local_asset() else {
            continue;
        };
        report.checked += 1;
        if !public_file_exists(public_dir, asset) {
            report.push(format!("head[{i}].{attr}"), asset, ProblemKind::MissingAsset);
        }
    }

    tracing::debug!(
        checked = report.checked,
        problems = report.problems.len(),
        "Cross-referenced configuration"
    );
    report
}

fn public_file_exists(public_dir: &Path, link: &str) -> bool {
    let path = clean_link(link);
    let relative = path.trim_start_matches('/');
    if relative.is_empty() || relative.split('/').any(|part| part == "..") {
        return false;
    }
    public_dir.join(relative).is_file()
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use sitecfg_config::{HeadTag, NavItem, SidebarGroup};

    use super::*;
    use crate::ContentPage;

    fn page(route: &str) -> ContentPage {
        ContentPage {
            route: route.to_owned(),
            source: PathBuf::from(route.trim_start_matches('/')).join("README.md"),
            title: route.to_owned(),
        }
    }

    fn tree(routes: &[&str]) -> ContentTree {
        ContentTree::from_pages(
            PathBuf::from("/docs"),
            routes.iter().map(|r| page(r)).collect(),
        )
    }

    fn group(title: &str, path: Option<&str>, children: &[&str]) -> SidebarGroup {
        SidebarGroup {
            path: path.map(str::to_owned),
            children: children.iter().map(|c| (*c).to_owned()).collect(),
            ..SidebarGroup::new(title)
        }
    }

    #[test]
    fn test_all_links_resolve() {
        let mut site = SiteConfig::new("Blog");
        site.nav = vec![
            NavItem::link("主页", "/"),
            NavItem::link("Github", "https://github.com/vuejs/vuepress"),
        ];
        site.sidebar = vec![group("node", Some("/node/"), &["/node/koa2/"])];
        let tree = tree(&["/", "/node/", "/node/koa2/"]);

        let report = check(&site, &tree, Path::new("/nonexistent"));

        assert!(report.is_clean());
        assert_eq!(report.checked(), 3);
        assert_eq!(report.into_result().unwrap(), 3);
    }

    #[test]
    fn test_dangling_links_reported_with_field_paths() {
        let mut site = SiteConfig::new("Blog");
        site.nav = vec![NavItem {
            items: Some(vec![NavItem::link("Vue", "/vue/")]),
            ..NavItem::link("前端", "/web/")
        }];
        site.sidebar = vec![
            group("目录", Some("/"), &[]),
            group("前端", None, &["/react/", "/vue/"]),
        ];
        let tree = tree(&["/", "/react/"]);

        let report = check(&site, &tree, Path::new("/nonexistent"));

        let fields: Vec<_> = report
            .problems()
            .iter()
            .map(|p| (p.field.as_str(), p.target.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("nav[0].link", "/web/"),
                ("nav[0].items[0].link", "/vue/"),
                ("sidebar[1].children[1]", "/vue/"),
            ]
        );
        assert!(report
            .problems()
            .iter()
            .all(|p| p.kind == ProblemKind::DanglingLink));
    }

    #[test]
    fn test_head_assets_checked_in_public_dir() {
        let public = tempfile::tempdir().unwrap();
        fs::create_dir_all(public.path().join("img")).unwrap();
        fs::write(public.path().join("img/logo.ico"), b"ico").unwrap();

        let mut site = SiteConfig::new("Blog");
        site.head = vec![
            HeadTag::new("link", [("rel", "icon"), ("href", "/img/logo.ico")]),
            HeadTag::new("link", [("rel", "manifest"), ("href", "/manifest.json")]),
            HeadTag::new("script", [("src", "https://cdn.example.com/a.js")]),
        ];

        let report = check(&site, &tree(&[]), public.path());

        assert_eq!(
            report.problems(),
            &[Problem {
                field: "head[1].href".to_owned(),
                target: "/manifest.json".to_owned(),
                kind: ProblemKind::MissingAsset,
            }]
        );
        assert_eq!(report.checked(), 2);
    }

    #[test]
    fn test_nav_link_to_public_file() {
        let public = tempfile::tempdir().unwrap();
        fs::write(public.path().join("resume.pdf"), b"pdf").unwrap();

        let mut site = SiteConfig::new("Blog");
        site.nav = vec![NavItem::link("简历", "/resume.pdf")];
        site.sidebar = vec![group("files", None, &["/resume.pdf"])];

        let report = check(&site, &tree(&[]), public.path());

        // Sidebar entries must be pages
        assert_eq!(report.problems().len(), 1);
        assert_eq!(report.problems()[0].field, "sidebar[0].children[0]");
    }

    #[test]
    fn test_public_lookup_rejects_parent_segments() {
        let public = tempfile::tempdir().unwrap();
        assert!(!public_file_exists(public.path(), "/../etc/passwd"));
        assert!(!public_file_exists(public.path(), "/"));
    }

    #[test]
    fn test_report_display() {
        let mut report = ContentReport::default();
        report.push("sidebar[2].children[0]".to_owned(), "/vue/", ProblemKind::DanglingLink);
        report.push("head[0].href".to_owned(), "/img/logo.ico", ProblemKind::MissingAsset);

        assert_eq!(
            report.to_string(),
            "2 unresolved references\n  [sidebar[2].children[0]] no page for /vue/\n  [head[0].href] missing asset /img/logo.ico"
        );
    }

    #[test]
    fn test_into_result_dangling() {
        let mut report = ContentReport::default();
        report.push("nav[0].link".to_owned(), "/web/", ProblemKind::DanglingLink);

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, ContentError::Dangling(_)));
        assert!(err.to_string().contains("/web/"));
    }
}
