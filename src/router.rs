//! The router: a route table plus a history, tracking the current route.

use log::{debug, warn};
use crate::error::Result;
use crate::history::{History, HistoryMode, MemoryHistory};
use crate::route::{normalize, Route, RouteTable, Routing, Target};
use crate::view::ViewRef;

/// Wraps a [`RouteTable`] with a history strategy and exposes navigation.
///
/// [`RouteTable`]: ../route/struct.RouteTable.html
pub struct Router {
    table: RouteTable,
    mode: HistoryMode,
    history: Box<dyn History>,
    current: Option<usize>,
}

impl Router {
    /// Create a router over `table` which records navigation in `history`, formatting urls
    /// according to `mode`.
    pub fn new(table: RouteTable, mode: HistoryMode, history: Box<dyn History>) -> Self {
        Router {
            table: table,
            mode: mode,
            history: history,
            current: None,
        }
    }

    /// Create a router that keeps its history in memory.
    pub fn memory(table: RouteTable) -> Self {
        Router::new(table, HistoryMode::Memory, Box::new(MemoryHistory::default()))
    }

    /// The route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// The history mode.
    pub fn mode(&self) -> &HistoryMode {
        &self.mode
    }

    /// The current url according to the history.
    pub fn location(&self) -> Result<String> {
        self.history.location()
    }

    /// The route we are currently on, if any.
    pub fn current(&self) -> Option<&Route> {
        self.current.and_then(|i| self.table.get(i))
    }

    /// The view for the current route. Lazy views are loaded here.
    pub fn view(&self) -> Option<ViewRef> {
        self.current().map(Route::view)
    }

    /// Find the route for a target without navigating.
    pub fn resolve(&self, target: &Target) -> Option<&Route> {
        self.table.resolve(target)
    }

    /// The address bar url for a target.
    pub fn href(&self, target: &Target) -> Option<String> {
        self.resolve(target).map(|route| self.mode.href(route.path()))
    }

    /// Navigate to a target, adding a history entry.
    pub fn push(&mut self, target: &Target) -> Result<Option<&Route>> {
        self.navigate(target, false)
    }

    /// Navigate to a target, replacing the current history entry.
    pub fn replace(&mut self, target: &Target) -> Result<Option<&Route>> {
        self.navigate(target, true)
    }

    /// Respond to the browser reporting a new url.
    ///
    /// History is not touched since the browser has already updated it.
    pub fn sync(&mut self, url: &str) -> Option<&Route> {
        self.current = match self.mode.route(url) {
            Some(target) => {
                let position = self.table.position(&target);
                if position.is_none() {
                    warn!("no route matches {:?}", url);
                }
                position
            }
            None => {
                warn!("couldn't read a route path from {:?}", url);
                None
            }
        };

        if let Some(route) = self.current() {
            debug!("url {:?} matched route {}", url, route.name());
        }

        self.current()
    }

    fn navigate(&mut self, target: &Target, replace: bool) -> Result<Option<&Route>> {
        let position = self.table.position(target);

        let url = match (position, target) {
            (Some(i), _) if position == self.current && !replace => {
                debug!("already on route {}", self.table.get(i).map_or("", Route::name));
                return Ok(self.current());
            }
            (Some(i), _) => self.table.get(i).map(|route| self.mode.href(route.path())),
            (None, Target::Path(path)) => {
                warn!("no route matches path {:?}", path);
                Some(self.mode.href(normalize(path)))
            }
            (None, Target::Name(name)) => {
                warn!("no route named {:?}", name);
                return Ok(None);
            }
        };

        if let Some(url) = url {
            if replace {
                self.history.replace(&url)?;
            }
            else {
                self.history.push(&url)?;
            }
        }

        self.current = position;

        if let Some(route) = self.current() {
            debug!("navigated to {} ({})", route.name(), route.path());
        }

        Ok(self.current())
    }
}
