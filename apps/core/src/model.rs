use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i64);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub String);

impl BookmarkId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the real thing behind a selectable row.
///
/// Tabs and bookmark nodes live in separate id spaces, so a tab `5` never
/// equals a bookmark `"5"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EntityId {
    Tab(TabId),
    Bookmark(BookmarkId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: TabId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "group_ref")]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub last_accessed: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
}

impl Tab {
    pub fn new(id: i64, title: &str, url: &str) -> Self {
        Self {
            id: TabId(id),
            title: title.to_string(),
            url: url.to_string(),
            group_id: None,
            index: 0,
            last_accessed: 0.0,
            fav_icon_url: None,
        }
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }

    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(GroupId(group_id));
        self
    }

    pub fn with_last_accessed(mut self, last_accessed: f64) -> Self {
        self.last_accessed = last_accessed;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
}

impl TabGroup {
    pub fn new(id: i64, title: &str) -> Self {
        Self {
            id: GroupId(id),
            title: title.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: BookmarkId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

pub enum BookmarkKind<'a> {
    Leaf { url: &'a str },
    Folder { children: &'a [BookmarkNode] },
    Empty,
}

impl BookmarkNode {
    pub fn leaf(id: &str, title: &str, url: &str) -> Self {
        Self {
            id: BookmarkId::new(id),
            title: title.to_string(),
            url: Some(url.to_string()),
            children: None,
        }
    }

    pub fn folder(id: &str, title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            id: BookmarkId::new(id),
            title: title.to_string(),
            url: None,
            children: Some(children),
        }
    }

    /// A non-empty url wins over children; a node with neither is skipped by
    /// every walker.
    pub fn kind(&self) -> BookmarkKind<'_> {
        match (&self.url, &self.children) {
            (Some(url), _) if !url.is_empty() => BookmarkKind::Leaf { url },
            (_, Some(children)) => BookmarkKind::Folder { children },
            _ => BookmarkKind::Empty,
        }
    }

    pub fn has_visible_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

pub fn bookmark_path(parent_path: &str, title: &str) -> String {
    if parent_path.is_empty() {
        title.to_string()
    } else {
        format!("{parent_path} > {title}")
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Browsers report "no group" as -1.
fn group_ref<'de, D>(deserializer: D) -> Result<Option<GroupId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.filter(|id| *id >= 0).map(GroupId))
}
