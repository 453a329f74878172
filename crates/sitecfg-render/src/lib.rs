//! Reference rendering of the site navigation.
//!
//! Turns a validated [`SiteConfig`] into per-page view models ([`NavBar`],
//! [`Sidebar`]) and renders them as HTML fragments. The view models
//! serialize with serde for JSON output.

mod html;
mod model;

use serde::Serialize;
use sitecfg_config::SiteConfig;

pub use html::{PageData, render_head, render_layout, render_navbar, render_sidebar};
pub use model::{
    NavBar, NavLink, PathTitles, Sidebar, SidebarLink, SidebarSection, TitleLookup,
    title_from_path,
};

/// Everything the theme needs to lay out one page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNavigation {
    /// Route being rendered.
    pub route: String,
    /// Page title, or the site title when the page is unknown.
    pub title: String,
    pub navbar: NavBar,
    pub sidebar: Sidebar,
    /// Footer label for the last-updated stamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl PageNavigation {
    /// Build navigation for `route` with titles from `titles`.
    #[must_use]
    pub fn build(config: &SiteConfig, titles: &impl TitleLookup, route: &str) -> Self {
        let title = if route == "/" {
            None
        } else {
            titles.title_for(route)
        };
        Self {
            route: route.to_owned(),
            title: title.unwrap_or_else(|| config.title.clone()),
            navbar: NavBar::build(config, route),
            sidebar: Sidebar::build(config, titles, route),
            last_updated: config.last_updated.label().map(str::to_owned),
        }
    }

    /// Render the full preview page.
    #[must_use]
    pub fn to_html(&self, config: &SiteConfig) -> String {
        render_layout(
            config,
            &PageData {
                title: &self.title,
                route: &self.route,
                navbar: &self.navbar,
                sidebar: &self.sidebar,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sitecfg_config::{LastUpdated, NavItem, SidebarGroup};

    use super::*;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::new("个人主页");
        config.last_updated = LastUpdated::Toggle(true);
        config.nav = vec![NavItem::link("node", "/node/")];
        config.sidebar = vec![SidebarGroup {
            children: vec!["/node/koa2/".to_owned()],
            ..SidebarGroup::new("node")
        }];
        config
    }

    #[test]
    fn test_page_navigation_json() {
        let page = PageNavigation::build(&config(), &PathTitles, "/node/koa2/");
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["route"], "/node/koa2/");
        assert_eq!(json["title"], "koa2");
        assert_eq!(json["lastUpdated"], "Last Updated");
        assert_eq!(json["navbar"]["items"][0]["text"], "node");
        assert_eq!(json["sidebar"]["sections"][0]["collapsed"], false);
        assert_eq!(json["sidebar"]["sections"][0]["links"][0]["active"], true);
    }

    #[test]
    fn test_page_navigation_home_uses_site_title() {
        let page = PageNavigation::build(&config(), &PathTitles, "/");

        assert_eq!(page.title, "个人主页");
        assert!(page.sidebar.sections[0].collapsed);
    }

    #[test]
    fn test_page_navigation_html() {
        let config = config();
        let page = PageNavigation::build(&config, &PathTitles, "/node/koa2/");

        let html = page.to_html(&config);

        assert!(html.contains("<title>koa2 | 个人主页</title>"));
        assert!(html.contains("Last Updated"));
    }
}
