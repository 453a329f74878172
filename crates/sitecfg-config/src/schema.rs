//! Site configuration schema.
//!
//! Field names on disk are camelCase, matching the host generator. Every
//! struct rejects unknown fields so that stale snapshots of the file fail at
//! load time instead of being half-understood.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Schema version understood by this crate.
pub const SCHEMA_VERSION: u32 = 1;

/// Default heading depth shown under each sidebar link.
pub const DEFAULT_SIDEBAR_DEPTH: u8 = 1;

/// Label used when `lastUpdated = true`.
pub const DEFAULT_LAST_UPDATED_LABEL: &str = "Last Updated";

/// Complete site configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SiteConfig {
    /// Explicit schema marker. `None` means the latest shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    /// Site title, shown in the navbar and `<title>`.
    pub title: String,
    /// Site description for `<meta name="description">`.
    #[serde(default)]
    pub description: String,
    /// Site-wide default for [`SidebarGroup::sidebar_depth`].
    #[serde(default = "default_sidebar_depth")]
    pub sidebar_depth: u8,
    /// Footer stamp for the page's last git update.
    #[serde(default)]
    pub last_updated: LastUpdated,
    /// Extra tags injected into `<head>`, in order.
    #[serde(default)]
    pub head: Vec<HeadTag>,
    /// Top navigation bar, left to right.
    #[serde(default)]
    pub nav: Vec<NavItem>,
    /// Sidebar groups, top to bottom.
    #[serde(default)]
    pub sidebar: Vec<SidebarGroup>,
}

fn default_sidebar_depth() -> u8 {
    DEFAULT_SIDEBAR_DEPTH
}

fn default_collapsable() -> bool {
    true
}

impl SiteConfig {
    /// Create an empty configuration with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            schema_version: None,
            title: title.into(),
            description: String::new(),
            sidebar_depth: DEFAULT_SIDEBAR_DEPTH,
            last_updated: LastUpdated::default(),
            head: Vec::new(),
            nav: Vec::new(),
            sidebar: Vec::new(),
        }
    }

    /// Visit every nav item depth-first in display order.
    ///
    /// The callback receives the item and its field path (e.g. `nav[2].items[0]`).
    pub fn walk_nav<'a>(&'a self, mut f: impl FnMut(&'a NavItem, &str)) {
        fn walk<'a>(items: &'a [NavItem], prefix: &str, f: &mut impl FnMut(&'a NavItem, &str)) {
            for (i, item) in items.iter().enumerate() {
                let field = format!("{prefix}[{i}]");
                f(item, &field);
                if let Some(children) = &item.items {
                    walk(children, &format!("{field}.items"), f);
                }
            }
        }
        walk(&self.nav, "nav", &mut f);
    }

    /// Effective heading depth of a group, falling back to the site default.
    #[must_use]
    pub fn depth_of(&self, group: &SidebarGroup) -> u8 {
        group.sidebar_depth.unwrap_or(self.sidebar_depth)
    }
}

/// Top navigation entry. Entries with `items` render as dropdowns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavItem {
    /// Display label.
    pub text: String,
    /// Absolute site path or external URL.
    pub link: String,
    /// Dropdown children, in display order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavItem>>,
}

impl NavItem {
    /// Create a plain link entry.
    #[must_use]
    pub fn link(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
            items: None,
        }
    }
}

/// Titled cluster of content links in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SidebarGroup {
    /// Group heading.
    pub title: String,
    /// Page the heading itself links to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Whether readers can fold the group.
    #[serde(default = "default_collapsable")]
    pub collapsable: bool,
    /// Heading depth override for this group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_depth: Option<u8>,
    /// Content paths, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
}

impl SidebarGroup {
    /// Create a collapsable group with no path and no children.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            path: None,
            collapsable: true,
            sidebar_depth: None,
            children: Vec::new(),
        }
    }

    /// Whether the group links anywhere at all.
    #[must_use]
    pub fn is_navigable(&self) -> bool {
        self.path.is_some() || !self.children.is_empty()
    }
}

/// Tag injected into `<head>`.
///
/// Reads both `["link", { rel = "icon" }]` and `{ tag = "link", attrs = { rel = "icon" } }`;
/// always writes the second form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HeadTagRepr")]
pub struct HeadTag {
    /// Element name (`link`, `meta`, `script`).
    pub tag: String,
    /// Attributes, ordered by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
}

impl HeadTag {
    /// Create a tag from attribute pairs.
    #[must_use]
    pub fn new<'a>(tag: impl Into<String>, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            tag: tag.into(),
            attrs: attrs
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        }
    }

    /// Site-relative asset referenced by `href` or `src`, if any.
    #[must_use]
    pub fn local_asset(&self) -> Option<(&str, &str)> {
        ["href", "src"].into_iter().find_map(|name| {
            self.attrs
                .get(name)
                .filter(|value| value.starts_with('/') && !value.starts_with("//"))
                .map(|value| (name, value.as_str()))
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged, expecting = "a [tag, { attrs }] pair or a table with `tag` and `attrs`")]
enum HeadTagRepr {
    Tuple(String, BTreeMap<String, String>),
    Table(HeadTagTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct HeadTagTable {
    tag: String,
    #[serde(default)]
    attrs: BTreeMap<String, String>,
}

impl From<HeadTagRepr> for HeadTag {
    fn from(repr: HeadTagRepr) -> Self {
        match repr {
            HeadTagRepr::Tuple(tag, attrs) | HeadTagRepr::Table(HeadTagTable { tag, attrs }) => {
                Self { tag, attrs }
            }
        }
    }
}

/// `lastUpdated` setting: a toggle or a custom label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, expecting = "true, false or a label string")]
pub enum LastUpdated {
    /// `true` uses the default label, `false` disables the stamp.
    Toggle(bool),
    /// Enabled with a custom label.
    Label(String),
}

impl Default for LastUpdated {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

impl LastUpdated {
    /// Label to render, or `None` when disabled.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Toggle(true) => Some(DEFAULT_LAST_UPDATED_LABEL),
            Self::Toggle(false) => None,
            Self::Label(label) => Some(label),
        }
    }
}
