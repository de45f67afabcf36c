//! History modes and the history stacks that back them.
//!
//! The [`HistoryMode`] decides how a route path is shown in the address bar and how a path is
//! recovered from a page url. A [`History`] records navigation, either in the browser through the
//! `History` API or in memory.
//!
//! [`HistoryMode`]: enum.HistoryMode.html
//! [`History`]: trait.History.html

use log::debug;
use url::Url;
use wasm_bindgen::JsValue;
use crate::error::{Error, Result};
use crate::route::{normalize, Routing, Target};

/// How navigation is reflected in the address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryMode {
    /// Real url paths, optionally below a base path such as `/app`.
    Web {
        /// The path the app is served under, without a trailing slash.
        base: String,
    },
    /// The route path lives in the url fragment, e.g. `/#/recipes`.
    Hash,
    /// Nothing is shown in the address bar.
    Memory,
}

impl Default for HistoryMode {
    fn default() -> Self {
        HistoryMode::web()
    }
}

impl HistoryMode {
    /// Browser url history served from the root of the site.
    pub fn web() -> Self {
        HistoryMode::Web { base: String::new() }
    }

    /// Browser url history served from below `base`.
    pub fn with_base(base: &str) -> Self {
        HistoryMode::Web { base: base.trim_end_matches('/').to_owned() }
    }

    /// Extract the route path from a full or relative url.
    ///
    /// Returns `None` if the url can't be parsed.
    pub fn path_of(&self, url: &str) -> Option<String> {
        let parsed = parse(url)?;

        let path = match self {
            HistoryMode::Web { base } => {
                let path = parsed.path();
                match path.strip_prefix(base.as_str()) {
                    Some(rest) if !base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                        rest.to_owned()
                    }
                    _ => path.to_owned(),
                }
            }
            HistoryMode::Hash => {
                let fragment = parsed.fragment().unwrap_or("");
                if fragment.starts_with('/') {
                    fragment.to_owned()
                }
                else {
                    format!("/{}", fragment)
                }
            }
            HistoryMode::Memory => parsed.path().to_owned(),
        };

        Some(normalize(&path).to_owned())
    }

    /// Render a route path as a url for the address bar.
    pub fn href(&self, path: &str) -> String {
        match self {
            HistoryMode::Web { base } => format!("{}{}", base, path),
            HistoryMode::Hash => format!("#{}", path),
            HistoryMode::Memory => path.to_owned(),
        }
    }

    /// The browser events that signal a url change in this mode.
    pub fn events(&self) -> &'static [&'static str] {
        match self {
            HistoryMode::Web { .. } => &["popstate"],
            HistoryMode::Hash => &["popstate", "hashchange"],
            HistoryMode::Memory => &[],
        }
    }
}

impl Routing<Target> for HistoryMode {
    fn route(&self, url: &str) -> Option<Target> {
        self.path_of(url).map(Target::Path)
    }
}

/// Parse an absolute url, or a relative one against a placeholder origin.
fn parse(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(url).ok()
        }
        Err(e) => {
            debug!("couldn't parse url {:?}: {}", url, e);
            None
        }
    }
}

/// A record of navigation.
pub trait History {
    /// Add a new entry.
    fn push(&mut self, url: &str) -> Result<()>;
    /// Replace the current entry.
    fn replace(&mut self, url: &str) -> Result<()>;
    /// The url of the current entry.
    fn location(&self) -> Result<String>;
}

/// History backed by the browser's `History` API.
pub struct BrowserHistory {
    window: web_sys::Window,
}

impl BrowserHistory {
    /// Get a handle to the browser history of the current window.
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| Error::Dom("couldn't get window handle".to_owned()))?;

        Ok(BrowserHistory { window: window })
    }

    fn history(&self) -> Result<web_sys::History> {
        self.window.history().map_err(Error::dom)
    }
}

impl History for BrowserHistory {
    fn push(&mut self, url: &str) -> Result<()> {
        self.history()?
            .push_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(Error::dom)
    }

    fn replace(&mut self, url: &str) -> Result<()> {
        self.history()?
            .replace_state_with_url(&JsValue::NULL, "", Some(url))
            .map_err(Error::dom)
    }

    fn location(&self) -> Result<String> {
        self.window.location().href().map_err(Error::dom)
    }
}

/// History kept in memory, for tests and for apps that don't touch the address bar.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHistory {
    entries: Vec<String>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        MemoryHistory::new("/")
    }
}

impl MemoryHistory {
    /// Start a history at the given url.
    pub fn new(initial: &str) -> Self {
        MemoryHistory { entries: vec![initial.to_owned()] }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

impl History for MemoryHistory {
    fn push(&mut self, url: &str) -> Result<()> {
        self.entries.push(url.to_owned());
        Ok(())
    }

    fn replace(&mut self, url: &str) -> Result<()> {
        match self.entries.last_mut() {
            Some(last) => *last = url.to_owned(),
            None => self.entries.push(url.to_owned()),
        }
        Ok(())
    }

    fn location(&self) -> Result<String> {
        Ok(self.entries.last().cloned().unwrap_or_else(|| "/".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_paths() {
        let mode = HistoryMode::web();

        assert_eq!(mode.path_of("http://localhost:8080").as_deref(), Some("/"));
        assert_eq!(mode.path_of("http://localhost:8080/").as_deref(), Some("/"));
        assert_eq!(mode.path_of("http://localhost:8080/recipes").as_deref(), Some("/recipes"));
        assert_eq!(mode.path_of("http://localhost:8080/recipes/?sort=name").as_deref(), Some("/recipes"));
        assert_eq!(mode.path_of("http://localhost:8080/meal-planner#today").as_deref(), Some("/meal-planner"));
        assert_eq!(mode.path_of("/shopping-list").as_deref(), Some("/shopping-list"));
    }

    #[test]
    fn web_paths_below_base() {
        let mode = HistoryMode::with_base("/app/");

        assert_eq!(mode, HistoryMode::Web { base: "/app".to_owned() });
        assert_eq!(mode.path_of("http://localhost/app").as_deref(), Some("/"));
        assert_eq!(mode.path_of("http://localhost/app/recipes").as_deref(), Some("/recipes"));
        assert_eq!(mode.path_of("http://localhost/apple").as_deref(), Some("/apple"));
        assert_eq!(mode.href("/recipes"), "/app/recipes");
    }

    #[test]
    fn hash_paths() {
        let mode = HistoryMode::Hash;

        assert_eq!(mode.path_of("http://localhost:8080").as_deref(), Some("/"));
        assert_eq!(mode.path_of("http://localhost:8080/#/").as_deref(), Some("/"));
        assert_eq!(mode.path_of("http://localhost:8080/#/recipes").as_deref(), Some("/recipes"));
        assert_eq!(mode.path_of("http://localhost:8080/#recipes").as_deref(), Some("/recipes"));
        assert_eq!(mode.path_of("#/shopping-list").as_deref(), Some("/shopping-list"));
        assert_eq!(mode.href("/recipes"), "#/recipes");
    }

    #[test]
    fn urls_route_to_path_targets() {
        let mode = HistoryMode::web();

        assert_eq!(mode.route("http://localhost/recipes"), Some(Target::path("/recipes")));
        assert_eq!(mode.route("http://[::1"), None);
    }

    #[test]
    fn unparsable_urls_have_no_path() {
        assert_eq!(HistoryMode::web().path_of("http://[::1"), None);
        assert_eq!(HistoryMode::Hash.path_of("http://[::1/#/recipes"), None);
        assert_eq!(HistoryMode::Memory.path_of("http://exa mple.com/"), None);
    }

    #[test]
    fn memory_history() {
        let mut history = MemoryHistory::default();
        assert_eq!(history.location().unwrap(), "/");

        history.push("/recipes").unwrap();
        history.push("/meal-planner").unwrap();
        history.replace("/shopping-list").unwrap();

        assert_eq!(history.entries(), &["/", "/recipes", "/shopping-list"]);
        assert_eq!(history.location().unwrap(), "/shopping-list");
    }
}
