//! Content discovery and route resolution.
//!
//! Routes follow the host generator's conventions:
//!
//! | source file            | route              |
//! |------------------------|--------------------|
//! | `README.md`            | `/`                |
//! | `node/koa2/README.md`  | `/node/koa2/`      |
//! | `node/index.md`        | `/node/`           |
//! | `about/me.md`          | `/about/me.html`   |
//!
//! Hidden entries (`.vuepress/`, `.git/`) and `node_modules/` are skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::ContentError;
use crate::title::extract_title;

/// A markdown page reachable on the site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentPage {
    /// Site route (`/node/koa2/`, `/about/me.html`).
    pub route: String,
    /// Source file relative to the content root.
    pub source: PathBuf,
    /// Front-matter title, first heading, or file name.
    pub title: String,
}

/// Markdown pages under a content root, indexed by route.
#[derive(Debug)]
pub struct ContentTree {
    source_dir: PathBuf,
    pages: Vec<ContentPage>,
    routes: HashMap<String, usize>,
}

impl ContentTree {
    /// Walk `source_dir` and index every markdown page.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::MissingSourceDir` if the directory does not
    /// exist and `ContentError::Io` if a directory or file cannot be read.
    pub fn scan(source_dir: &Path) -> Result<Self, ContentError> {
        if !source_dir.is_dir() {
            return Err(ContentError::MissingSourceDir(source_dir.to_path_buf()));
        }

        let mut tree = Self {
            source_dir: source_dir.to_path_buf(),
            pages: Vec::new(),
            routes: HashMap::new(),
        };
        tree.scan_directory(source_dir, "")?;
        tracing::debug!(
            source_dir = %source_dir.display(),
            pages = tree.pages.len(),
            "Scanned content tree"
        );
        Ok(tree)
    }

    /// Build a tree from already-known pages.
    #[must_use]
    pub fn from_pages(source_dir: PathBuf, pages: Vec<ContentPage>) -> Self {
        let routes = pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.route.clone(), i))
            .collect();
        Self {
            source_dir,
            pages,
            routes,
        }
    }

    /// Content root this tree was scanned from.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// All pages in scan order.
    #[must_use]
    pub fn pages(&self) -> &[ContentPage] {
        &self.pages
    }

    /// Page at an exact route.
    #[must_use]
    pub fn get(&self, route: &str) -> Option<&ContentPage> {
        self.routes.get(route).map(|&i| &self.pages[i])
    }

    /// Resolve a site-relative link to a page.
    ///
    /// Fragments and query strings are ignored and percent-escapes decoded.
    /// `/a/b`, `/a/b.html` and `/a/b.md` all reach `a/b.md`; `/a/b/` and
    /// `/a/b` reach `a/b/README.md`.
    #[must_use]
    pub fn resolve(&self, link: &str) -> Option<&ContentPage> {
        route_candidates(link)
            .iter()
            .find_map(|candidate| self.get(candidate))
    }

    fn scan_directory(&mut self, dir: &Path, url_prefix: &str) -> Result<(), ContentError> {
        let entries = fs::read_dir(dir).map_err(|source| ContentError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut listing = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ContentError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|source| ContentError::Io {
                path: path.clone(),
                source,
            })?;
            listing.push((
                entry.file_name().to_string_lossy().into_owned(),
                path,
                file_type.is_dir(),
            ));
        }
        // Sort for a stable page order across platforms
        listing.sort_by(|a, b| a.0.cmp(&b.0));

        // (is_readme, path) of the directory index page
        let mut index: Option<(bool, PathBuf)> = None;

        for (name, path, is_dir) in listing {
            if name.starts_with('.') || name == "node_modules" {
                continue;
            }

            if is_dir {
                let child_prefix = format!("{url_prefix}/{name}");
                self.scan_directory(&path, &child_prefix)?;
                continue;
            }

            let Some(stem) = name.strip_suffix(".md") else {
                continue;
            };
            let is_readme = stem.eq_ignore_ascii_case("readme");
            if is_readme || stem.eq_ignore_ascii_case("index") {
                if let Some((existing_readme, existing)) = &index {
                    // README takes precedence over index
                    let keep_existing = *existing_readme;
                    let ignored = if keep_existing { &path } else { existing };
                    tracing::warn!(
                        ignored = %ignored.display(),
                        "Directory has both README.md and index.md"
                    );
                    if keep_existing {
                        continue;
                    }
                }
                index = Some((is_readme, path));
            } else {
                let route = format!("{url_prefix}/{stem}.html");
                self.add_page(route, &path, stem)?;
            }
        }

        if let Some((_, path)) = index {
            let fallback = dir
                .file_name()
                .filter(|_| !url_prefix.is_empty())
                .map_or_else(|| "Home".to_owned(), |n| n.to_string_lossy().into_owned());
            self.add_page(format!("{url_prefix}/"), &path, &fallback)?;
        }

        Ok(())
    }

    fn add_page(&mut self, route: String, path: &Path, fallback: &str) -> Result<(), ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let title = extract_title(&content).unwrap_or_else(|| fallback.to_owned());
        let source = path
            .strip_prefix(&self.source_dir)
            .unwrap_or(path)
            .to_path_buf();

        self.routes.insert(route.clone(), self.pages.len());
        self.pages.push(ContentPage {
            route,
            source,
            title,
        });
        Ok(())
    }
}

/// Strip fragment and query, then percent-decode.
pub(crate) fn clean_link(link: &str) -> String {
    let end = link.find(['#', '?']).unwrap_or(link.len());
    let path = &link[..end];
    percent_decode_str(path)
        .decode_utf8()
        .map_or_else(|_| path.to_owned(), std::borrow::Cow::into_owned)
}

/// Routes a link may refer to, most specific first.
fn route_candidates(link: &str) -> Vec<String> {
    let path = clean_link(link);
    if path.is_empty() {
        return Vec::new();
    }
    if path.ends_with('/') {
        return vec![path];
    }

    let base = path
        .strip_suffix(".html")
        .or_else(|| path.strip_suffix(".md"))
        .unwrap_or(&path);

    // `/a/README.md` points at the directory index
    if let Some((dir, file)) = base.rsplit_once('/')
        && (file.eq_ignore_ascii_case("readme") || file.eq_ignore_ascii_case("index"))
    {
        return vec![format!("{dir}/")];
    }

    vec![format!("{base}.html"), format!("{base}/")]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn blog() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "README.md", "---\nhome: true\n---\n");
        write(root, "node/README.md", "# node\n");
        write(root, "node/koa2/README.md", "# Koa2 源码解析\n");
        write(root, "designPattern/subscribe/README.md", "---\ntitle: 发布订阅\n---\n");
        write(root, "about/me.md", "# 关于我\n");
        write(root, "about/notes.txt", "not markdown");
        write(root, ".vuepress/config.md", "# hidden\n");
        write(root, "node_modules/pkg/README.md", "# dependency\n");
        dir
    }

    #[test]
    fn test_scan_records_source_dir() {
        let dir = blog();
        let tree = ContentTree::scan(dir.path()).unwrap();
        assert_eq!(tree.source_dir(), dir.path());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_unreadable_directory_is_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = blog();
        let locked = dir.path().join("node");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still read the directory
        let readable = fs::read_dir(&locked).is_ok();

        let result = ContentTree::scan(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if !readable {
            let err = result.unwrap_err();
            assert!(matches!(err, ContentError::Io { ref path, .. } if path == &locked));
        }
    }

    #[test]
    fn test_scan_missing_source_dir() {
        let err = ContentTree::scan(Path::new("/nonexistent/docs")).unwrap_err();
        assert!(matches!(err, ContentError::MissingSourceDir(_)));
    }

    #[test]
    fn test_scan_routes() {
        let dir = blog();
        let tree = ContentTree::scan(dir.path()).unwrap();

        let mut routes: Vec<_> = tree.pages().iter().map(|p| p.route.as_str()).collect();
        routes.sort_unstable();
        assert_eq!(
            routes,
            vec![
                "/",
                "/about/me.html",
                "/designPattern/subscribe/",
                "/node/",
                "/node/koa2/",
            ]
        );
    }

    #[test]
    fn test_scan_titles() {
        let dir = blog();
        let tree = ContentTree::scan(dir.path()).unwrap();

        assert_eq!(tree.get("/").unwrap().title, "Home");
        assert_eq!(tree.get("/node/koa2/").unwrap().title, "Koa2 源码解析");
        assert_eq!(tree.get("/designPattern/subscribe/").unwrap().title, "发布订阅");
        assert_eq!(tree.get("/about/me.html").unwrap().title, "关于我");
        assert_eq!(
            tree.get("/node/koa2/").unwrap().source,
            PathBuf::from("node/koa2/README.md")
        );
    }

    #[test]
    fn test_scan_title_falls_back_to_names() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "vue/README.md", "no heading here\n");
        write(dir.path(), "vue/hooks.md", "## sub only\n");

        let tree = ContentTree::scan(dir.path()).unwrap();

        assert_eq!(tree.get("/vue/").unwrap().title, "vue");
        assert_eq!(tree.get("/vue/hooks.html").unwrap().title, "hooks");
    }

    #[test]
    fn test_readme_wins_over_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "css/index.md", "# index\n");
        write(dir.path(), "css/README.md", "# readme\n");

        let tree = ContentTree::scan(dir.path()).unwrap();

        assert_eq!(tree.get("/css/").unwrap().title, "readme");
        assert_eq!(tree.pages().len(), 1);
    }

    #[test]
    fn test_resolve_link_forms() {
        let dir = blog();
        let tree = ContentTree::scan(dir.path()).unwrap();

        let resolved = |link: &str| tree.resolve(link).map(|p| p.route.as_str());

        assert_eq!(resolved("/"), Some("/"));
        assert_eq!(resolved("/node/koa2/"), Some("/node/koa2/"));
        assert_eq!(resolved("/node/koa2"), Some("/node/koa2/"));
        assert_eq!(resolved("/node/koa2/README.md"), Some("/node/koa2/"));
        assert_eq!(resolved("/about/me"), Some("/about/me.html"));
        assert_eq!(resolved("/about/me.html"), Some("/about/me.html"));
        assert_eq!(resolved("/about/me.md#intro"), Some("/about/me.html"));
        assert_eq!(resolved("/node/?from=nav"), Some("/node/"));
        assert_eq!(resolved("/about/me/"), None);
        assert_eq!(resolved("/vue/"), None);
        assert_eq!(resolved(""), None);
    }

    #[test]
    fn test_resolve_percent_encoded() {
        let tree = ContentTree::from_pages(
            PathBuf::from("/docs"),
            vec![ContentPage {
                route: "/前端/".to_owned(),
                source: PathBuf::from("前端/README.md"),
                title: "前端".to_owned(),
            }],
        );

        assert!(tree.resolve("/%E5%89%8D%E7%AB%AF/").is_some());
        assert!(tree.resolve("/前端/").is_some());
    }

    #[test]
    fn test_clean_link() {
        assert_eq!(clean_link("/a/b.html#top"), "/a/b.html");
        assert_eq!(clean_link("/a/?x=1#y"), "/a/");
        assert_eq!(clean_link("/a%20b/"), "/a b/");
    }
}
