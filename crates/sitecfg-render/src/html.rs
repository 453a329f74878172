//! HTML rendering of the navigation view models.
//!
//! Produces the navbar, sidebar and `<head>` fragments the host generator
//! would emit, plus a bare page shell around them for previewing.

use std::fmt::Write;

use sitecfg_config::{HeadTag, SiteConfig};

use crate::model::{NavBar, NavLink, Sidebar, SidebarSection};

/// Elements written without a closing tag.
const VOID_ELEMENTS: [&str; 3] = ["base", "link", "meta"];

/// Attributes added to links that leave the site.
const EXTERNAL_ATTRS: &str = " target=\"_blank\" rel=\"noopener noreferrer\"";

/// All data needed to render a preview page.
pub struct PageData<'a> {
    /// Page title; the site title is appended.
    pub title: &'a str,
    /// Route of the page being rendered.
    pub route: &'a str,
    pub navbar: &'a NavBar,
    pub sidebar: &'a Sidebar,
}

/// Render a complete preview page for one route.
#[must_use]
pub fn render_layout(config: &SiteConfig, page: &PageData<'_>) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    if page.title.is_empty() || page.title == config.title {
        let _ = writeln!(html, "<title>{}</title>", escape(&config.title));
    } else {
        let _ = writeln!(
            html,
            "<title>{} | {}</title>",
            escape(page.title),
            escape(&config.title)
        );
    }
    html.push_str(&render_head(config));
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<div class=\"theme-container\" data-route=\"{}\">",
        escape(page.route)
    );
    html.push_str(&render_navbar(page.navbar));
    html.push_str(&render_sidebar(page.sidebar));

    html.push_str("<main class=\"page\">\n");
    if let Some(section) = page.sidebar.active_section() {
        let _ = writeln!(
            html,
            "<p class=\"page-section\">{}</p>",
            escape(&section.title)
        );
    }
    let _ = writeln!(html, "<h1>{}</h1>", escape(page.title));
    if let Some(label) = config.last_updated.label() {
        let _ = writeln!(
            html,
            "<footer class=\"page-edit\"><span class=\"last-updated\">{}</span></footer>",
            escape(label)
        );
    }
    html.push_str("</main>\n</div>\n</body>\n</html>\n");
    html
}

/// Render the `<meta name="description">` and configured head tags.
#[must_use]
pub fn render_head(config: &SiteConfig) -> String {
    let mut html = String::new();
    if !config.description.is_empty() {
        let _ = writeln!(
            html,
            "<meta name=\"description\" content=\"{}\">",
            escape(&config.description)
        );
    }
    for tag in &config.head {
        render_head_tag(&mut html, tag);
    }
    html
}

fn render_head_tag(html: &mut String, tag: &HeadTag) {
    let _ = write!(html, "<{}", tag.tag);
    for (name, value) in &tag.attrs {
        let _ = write!(html, " {}=\"{}\"", escape(name), escape(value));
    }
    if VOID_ELEMENTS.contains(&tag.tag.as_str()) {
        html.push_str(">\n");
    } else {
        let _ = writeln!(html, "></{}>", tag.tag);
    }
}

/// Render the top navigation bar.
#[must_use]
pub fn render_navbar(navbar: &NavBar) -> String {
    let mut html = String::new();
    html.push_str("<header class=\"navbar\">\n");
    let _ = writeln!(
        html,
        "<a href=\"/\" class=\"home-link\"><span class=\"site-name\">{}</span></a>",
        escape(&navbar.title)
    );
    html.push_str("<nav class=\"nav-links\">\n");
    for item in &navbar.items {
        html.push_str("<div class=\"nav-item\">\n");
        if item.items.is_empty() {
            render_nav_link(&mut html, item);
        } else {
            render_dropdown(&mut html, item);
        }
        html.push_str("</div>\n");
    }
    html.push_str("</nav>\n</header>\n");
    html
}

/// Render a dropdown and its children recursively.
fn render_dropdown(html: &mut String, item: &NavLink) {
    let open = if item.active { " open" } else { "" };
    let _ = writeln!(html, "<div class=\"dropdown-wrapper{open}\">");
    let _ = writeln!(
        html,
        "<span class=\"dropdown-title\">{}</span>",
        escape(&item.text)
    );
    html.push_str("<ul class=\"nav-dropdown\">\n");
    for child in &item.items {
        html.push_str("<li class=\"dropdown-item\">\n");
        if child.items.is_empty() {
            render_nav_link(html, child);
        } else {
            render_dropdown(html, child);
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ul>\n</div>\n");
}

fn render_nav_link(html: &mut String, item: &NavLink) {
    let class = if item.active {
        "nav-link router-link-active"
    } else {
        "nav-link"
    };
    let target = if item.external { EXTERNAL_ATTRS } else { "" };
    let _ = writeln!(
        html,
        "<a href=\"{}\" class=\"{class}\"{target}>{}</a>",
        escape(&item.link),
        escape(&item.text),
    );
}

/// Render the sidebar groups.
#[must_use]
pub fn render_sidebar(sidebar: &Sidebar) -> String {
    let mut html = String::new();
    html.push_str("<aside class=\"sidebar\">\n<ul class=\"sidebar-links\">\n");
    for section in &sidebar.sections {
        render_section(&mut html, section);
    }
    html.push_str("</ul>\n</aside>\n");
    html
}

fn render_section(html: &mut String, section: &SidebarSection) {
    let mut classes = String::from("sidebar-group");
    if section.collapsable {
        classes.push_str(" collapsable");
    }
    if section.collapsed {
        classes.push_str(" collapsed");
    }
    if section.active {
        classes.push_str(" active");
    }
    let _ = writeln!(
        html,
        "<li><section class=\"{classes}\" data-depth=\"{}\">",
        section.depth
    );

    match &section.path {
        Some(path) => {
            let _ = writeln!(
                html,
                "<a href=\"{}\" class=\"sidebar-heading\">{}</a>",
                escape(path),
                escape(&section.title)
            );
        }
        None => {
            let _ = writeln!(
                html,
                "<p class=\"sidebar-heading\">{}</p>",
                escape(&section.title)
            );
        }
    }

    if !section.links.is_empty() {
        let hidden = if section.collapsed { " hidden" } else { "" };
        let _ = writeln!(html, "<ul class=\"sidebar-group-items\"{hidden}>");
        for link in &section.links {
            let class = if link.active {
                "sidebar-link active"
            } else {
                "sidebar-link"
            };
            let target = if link.external { EXTERNAL_ATTRS } else { "" };
            let _ = writeln!(
                html,
                "<li><a href=\"{}\" class=\"{class}\"{target}>{}</a></li>",
                escape(&link.link),
                escape(&link.title),
            );
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section></li>\n");
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
