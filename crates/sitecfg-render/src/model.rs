//! Navigation view models.
//!
//! Built from a validated [`SiteConfig`] for one page (the current route) and
//! consumed by the HTML renderer or serialized to JSON as-is.

use serde::Serialize;
use sitecfg_config::{NavItem, SidebarGroup, SiteConfig, is_external};
use sitecfg_content::ContentTree;

/// Source of page titles for sidebar links.
pub trait TitleLookup {
    /// Title of the page a link points at, if known.
    fn title_for(&self, link: &str) -> Option<String>;
}

impl TitleLookup for ContentTree {
    fn title_for(&self, link: &str) -> Option<String> {
        self.resolve(link).map(|page| page.title.clone())
    }
}

/// Titles derived from the link itself, for rendering without a content tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathTitles;

impl TitleLookup for PathTitles {
    fn title_for(&self, link: &str) -> Option<String> {
        Some(title_from_path(link))
    }
}

/// Last path segment of a link, without `.html`/`.md`.
///
/// `/designPattern/subscribe/` becomes `subscribe`; `/` becomes `/`.
#[must_use]
pub fn title_from_path(link: &str) -> String {
    let path = normalize_route(link);
    let segment = path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let segment = segment.strip_suffix(".html").unwrap_or(segment);
    if segment.is_empty() {
        link.to_owned()
    } else {
        segment.to_owned()
    }
}

/// Strip fragment and query, and map `.md` links to their `.html` route.
fn normalize_route(link: &str) -> String {
    let end = link.find(['#', '?']).unwrap_or(link.len());
    let path = &link[..end];
    match path.strip_suffix(".md") {
        Some(base) => format!("{base}.html"),
        None => path.to_owned(),
    }
}

fn is_current(link: &str, current: &str) -> bool {
    !is_external(link) && normalize_route(link) == normalize_route(current)
}

/// Top navigation bar for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavBar {
    /// Site title shown at the left of the bar.
    pub title: String,
    /// Entries left to right.
    pub items: Vec<NavLink>,
}

/// Navbar entry; dropdowns carry their children in `items`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    pub text: String,
    pub link: String,
    /// Opens outside the site.
    pub external: bool,
    /// Points at the current page, or contains an entry that does.
    pub active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavLink>,
}

impl NavBar {
    /// Build the navbar with `current` marked active.
    #[must_use]
    pub fn build(config: &SiteConfig, current: &str) -> Self {
        Self {
            title: config.title.clone(),
            items: config
                .nav
                .iter()
                .map(|item| NavLink::build(item, current))
                .collect(),
        }
    }
}

impl NavLink {
    fn build(item: &NavItem, current: &str) -> Self {
        let items: Vec<Self> = item
            .items
            .iter()
            .flatten()
            .map(|child| Self::build(child, current))
            .collect();
        let active = is_current(&item.link, current) || items.iter().any(|child| child.active);
        Self {
            text: item.text.clone(),
            link: item.link.clone(),
            external: is_external(&item.link),
            active,
            items,
        }
    }
}

/// Sidebar for one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    /// Groups top to bottom.
    pub sections: Vec<SidebarSection>,
}

/// Rendered sidebar group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarSection {
    pub title: String,
    /// Page the heading links to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub collapsable: bool,
    /// Initially folded: collapsable and not containing the current page.
    pub collapsed: bool,
    /// Heading depth extracted under each link.
    pub depth: u8,
    /// Contains the current page.
    pub active: bool,
    /// Child links in configured order.
    pub links: Vec<SidebarLink>,
}

/// Link inside a sidebar group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarLink {
    pub title: String,
    pub link: String,
    pub external: bool,
    pub active: bool,
}

impl Sidebar {
    /// Build the sidebar with titles from `titles` and `current` expanded.
    #[must_use]
    pub fn build(config: &SiteConfig, titles: &impl TitleLookup, current: &str) -> Self {
        Self {
            sections: config
                .sidebar
                .iter()
                .map(|group| SidebarSection::build(config, group, titles, current))
                .collect(),
        }
    }

    /// Section containing the current page, if any.
    #[must_use]
    pub fn active_section(&self) -> Option<&SidebarSection> {
        self.sections.iter().find(|section| section.active)
    }
}

impl SidebarSection {
    fn build(
        config: &SiteConfig,
        group: &SidebarGroup,
        titles: &impl TitleLookup,
        current: &str,
    ) -> Self {
        let links: Vec<SidebarLink> = group
            .children
            .iter()
            .map(|child| SidebarLink {
                title: titles
                    .title_for(child)
                    .unwrap_or_else(|| title_from_path(child)),
                link: child.clone(),
                external: is_external(child),
                active: is_current(child, current),
            })
            .collect();

        let active = group
            .path
            .as_deref()
            .is_some_and(|path| is_current(path, current))
            || links.iter().any(|link| link.active);

        Self {
            title: group.title.clone(),
            path: group.path.clone(),
            collapsable: group.collapsable,
            collapsed: group.collapsable && !active,
            depth: config.depth_of(group),
            active,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use sitecfg_content::ContentPage;

    use super::*;

    fn blog() -> SiteConfig {
        let mut config = SiteConfig::new("个人主页");
        config.nav = vec![
            NavItem::link("主页", "/"),
            NavItem {
                items: Some(vec![
                    NavItem::link("React", "/react/"),
                    NavItem::link("Vue", "/vue/"),
                ]),
                ..NavItem::link("前端", "/web/")
            },
            NavItem::link("Github", "https://github.com/vuejs/vuepress"),
        ];
        config.sidebar = vec![
            SidebarGroup {
                path: Some("/".to_owned()),
                ..SidebarGroup::new("目录")
            },
            SidebarGroup {
                sidebar_depth: Some(2),
                children: vec!["/react/".to_owned(), "/vue/".to_owned()],
                ..SidebarGroup::new("前端")
            },
            SidebarGroup {
                collapsable: false,
                children: vec!["/node/koa2/".to_owned()],
                ..SidebarGroup::new("node")
            },
        ];
        config
    }

    #[test]
    fn test_navbar_order_and_flags() {
        let navbar = NavBar::build(&blog(), "/vue/");

        let texts: Vec<_> = navbar.items.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(texts, vec!["主页", "前端", "Github"]);
        assert!(!navbar.items[0].active);
        assert!(navbar.items[1].active);
        assert!(navbar.items[1].items[1].active);
        assert!(!navbar.items[1].items[0].active);
        assert!(navbar.items[2].external);
    }

    #[test]
    fn test_navbar_single_external_link() {
        let mut config = SiteConfig::new("Blog");
        config.nav = vec![NavItem::link("Github", "https://github.com/x")];

        let navbar = NavBar::build(&config, "/");

        assert_eq!(
            navbar.items,
            vec![NavLink {
                text: "Github".to_owned(),
                link: "https://github.com/x".to_owned(),
                external: true,
                active: false,
                items: vec![],
            }]
        );
    }

    #[test]
    fn test_sidebar_collapse_follows_current_page() {
        let sidebar = Sidebar::build(&blog(), &PathTitles, "/vue/");

        let state: Vec<_> = sidebar
            .sections
            .iter()
            .map(|s| (s.title.as_str(), s.collapsable, s.collapsed, s.depth))
            .collect();
        assert_eq!(
            state,
            vec![
                ("目录", true, true, 1),
                ("前端", true, false, 2),
                ("node", false, false, 1),
            ]
        );
        assert_eq!(sidebar.active_section().map(|s| s.title.as_str()), Some("前端"));
    }

    #[test]
    fn test_sidebar_group_path_marks_active() {
        let sidebar = Sidebar::build(&blog(), &PathTitles, "/");
        assert!(sidebar.sections[0].active);
        assert!(!sidebar.sections[0].collapsed);
    }

    #[test]
    fn test_sidebar_titles_from_content_tree() {
        let tree = ContentTree::from_pages(
            PathBuf::from("/docs"),
            vec![ContentPage {
                route: "/node/koa2/".to_owned(),
                source: PathBuf::from("node/koa2/README.md"),
                title: "Koa2 源码解析".to_owned(),
            }],
        );

        let sidebar = Sidebar::build(&blog(), &tree, "/");

        assert_eq!(sidebar.sections[2].links[0].title, "Koa2 源码解析");
        // Unknown pages fall back to the path segment
        assert_eq!(sidebar.sections[1].links[0].title, "react");
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path("/designPattern/subscribe/"), "subscribe");
        assert_eq!(title_from_path("/about/me.html#top"), "me");
        assert_eq!(title_from_path("/about/me.md"), "me");
        assert_eq!(title_from_path("/"), "/");
    }

    #[test]
    fn test_is_current_normalizes_links() {
        assert!(is_current("/about/me.md", "/about/me.html"));
        assert!(is_current("/node/#intro", "/node/"));
        assert!(!is_current("https://example.com/", "https://example.com/"));
    }

    #[test]
    fn test_json_is_camel_case() {
        let sidebar = Sidebar::build(&blog(), &PathTitles, "/");
        let json = serde_json::to_value(&sidebar).unwrap();

        assert_eq!(json["sections"][0]["title"], "目录");
        assert_eq!(json["sections"][0]["path"], "/");
        assert_eq!(json["sections"][1]["depth"], 2);
        assert!(json["sections"][1].get("path").is_none());
        assert_eq!(json["sections"][2]["collapsable"], false);
    }
}
