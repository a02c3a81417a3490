//! Context-menu registry with WebExtension-style URL match patterns.

use regex::Regex;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MenuError {
    #[error("Menu entry with id {0:?} already exists")]
    DuplicateId(String),

    #[error("Invalid match pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Element kinds a menu entry can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum ContextKind {
    All,
    Page,
    Link,
    Image,
    Video,
    Audio,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    pub title: String,
    pub contexts: Vec<ContextKind>,
    pub document_url_patterns: Vec<String>,
    pub target_url_patterns: Vec<String>,
}

/// Click event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuClick {
    pub menu_item_id: String,
    pub src_url: Option<String>,
}

/// Page the click originated from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
}

/// What the user right-clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub page_url: String,
    pub context: ContextKind,
    pub src_url: Option<String>,
}

pub trait ContextMenuHost {
    fn create(&mut self, entry: MenuEntry) -> Result<(), MenuError>;

    fn remove_all(&mut self);
}

const WILDCARD_SCHEMES: [&str; 4] = ["http", "https", "ws", "wss"];
const ALL_URLS_SCHEMES: [&str; 6] = ["http", "https", "ws", "wss", "ftp", "file"];

#[derive(Debug, Clone)]
enum SchemeMatch {
    Wildcard,
    Exact(String),
}

#[derive(Debug, Clone)]
enum HostMatch {
    Any,
    Exact(String),
    WithSubdomains(String),
}

#[derive(Debug, Clone)]
enum PatternKind {
    AllUrls,
    Parts {
        scheme: SchemeMatch,
        host: HostMatch,
        path: Regex,
    },
}

/// A parsed `scheme://host/path` pattern, or `<all_urls>`.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    kind: PatternKind,
}

impl MatchPattern {
    pub fn parse(pattern: &str) -> Result<Self, MenuError> {
        let invalid = |reason: &str| MenuError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        if pattern == "<all_urls>" {
            return Ok(Self {
                kind: PatternKind::AllUrls,
            });
        }

        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme separator"))?;

        let scheme = match scheme {
            "*" => SchemeMatch::Wildcard,
            s if ALL_URLS_SCHEMES.contains(&s) => SchemeMatch::Exact(s.to_string()),
            _ => return Err(invalid("unsupported scheme")),
        };

        let slash = rest.find('/').ok_or_else(|| invalid("missing path"))?;
        let (host, path) = rest.split_at(slash);

        let host = match host {
            "*" => HostMatch::Any,
            "" if matches!(&scheme, SchemeMatch::Exact(s) if s == "file") => HostMatch::Any,
            "" => return Err(invalid("empty host")),
            h => {
                if let Some(domain) = h.strip_prefix("*.") {
                    if domain.is_empty() || domain.contains('*') {
                        return Err(invalid("wildcard must be followed by a domain"));
                    }
                    HostMatch::WithSubdomains(domain.to_ascii_lowercase())
                } else if h.contains('*') {
                    return Err(invalid("wildcard only allowed as leading host label"));
                } else {
                    HostMatch::Exact(h.to_ascii_lowercase())
                }
            }
        };

        let path = glob_to_regex(path).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            kind: PatternKind::Parts { scheme, host, path },
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };

        match &self.kind {
            PatternKind::AllUrls => ALL_URLS_SCHEMES.contains(&url.scheme()),
            PatternKind::Parts { scheme, host, path } => {
                let scheme_ok = match scheme {
                    SchemeMatch::Wildcard => WILDCARD_SCHEMES.contains(&url.scheme()),
                    SchemeMatch::Exact(s) => url.scheme() == s,
                };
                if !scheme_ok {
                    return false;
                }

                let url_host = url.host_str().unwrap_or("").to_ascii_lowercase();
                let host_ok = match host {
                    HostMatch::Any => true,
                    HostMatch::Exact(h) => url_host == *h,
                    HostMatch::WithSubdomains(domain) => {
                        url_host == *domain || url_host.ends_with(&format!(".{domain}"))
                    }
                };
                if !host_ok {
                    return false;
                }

                let mut target = url.path().to_string();
                if let Some(query) = url.query() {
                    target.push('?');
                    target.push_str(query);
                }
                path.is_match(&target)
            }
        }
    }
}

/// `*` matches any run of characters; everything else is literal.
fn glob_to_regex(glob: &str) -> Result<Regex, regex::Error> {
    let body = glob
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{body}$"))
}

struct RegisteredEntry {
    entry: MenuEntry,
    document_patterns: Vec<MatchPattern>,
    target_patterns: Vec<MatchPattern>,
}

impl RegisteredEntry {
    fn is_visible_for(&self, target: &ClickTarget) -> bool {
        let context_ok = self
            .entry
            .contexts
            .iter()
            .any(|c| *c == ContextKind::All || *c == target.context);
        if !context_ok {
            return false;
        }

        let document_ok = self.document_patterns.is_empty()
            || self
                .document_patterns
                .iter()
                .any(|p| p.matches(&target.page_url));
        if !document_ok {
            return false;
        }

        if self.target_patterns.is_empty() {
            return true;
        }
        match &target.src_url {
            Some(src) => self.target_patterns.iter().any(|p| p.matches(src)),
            None => false,
        }
    }
}

/// In-process menu host.
#[derive(Default)]
pub struct MenuRegistry {
    entries: Vec<RegisteredEntry>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter().map(|r| &r.entry)
    }

    pub fn visible_for(&self, target: &ClickTarget) -> Vec<&MenuEntry> {
        self.entries
            .iter()
            .filter(|r| r.is_visible_for(target))
            .map(|r| &r.entry)
            .collect()
    }
}

impl ContextMenuHost for MenuRegistry {
    fn create(&mut self, entry: MenuEntry) -> Result<(), MenuError> {
        if self.entries.iter().any(|r| r.entry.id == entry.id) {
            return Err(MenuError::DuplicateId(entry.id));
        }

        let document_patterns = entry
            .document_url_patterns
            .iter()
            .map(|p| MatchPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;
        let target_patterns = entry
            .target_url_patterns
            .iter()
            .map(|p| MatchPattern::parse(p))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(id = %entry.id, title = %entry.title, "context menu entry created");
        self.entries.push(RegisteredEntry {
            entry,
            document_patterns,
            target_patterns,
        });
        Ok(())
    }

    fn remove_all(&mut self) {
        self.entries.clear();
    }
}
