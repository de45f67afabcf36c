//! The route table: an ordered list of path to view bindings.

use std::collections::HashSet;
use std::fmt;
use crate::error::{Error, Result};
use crate::view::{Component, View, ViewRef};

/// Implement this trait to turn a new page url into a message for the app.
pub trait Routing<Message> {
    /// Convert a new url to a message for the app.
    fn route(&self, url: &str) -> Option<Message>;
}

/// Something to navigate to, either a url path or the name of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A url path such as `/recipes`.
    Path(String),
    /// A route name such as `Recipes`.
    Name(String),
}

impl Target {
    /// Target a url path.
    pub fn path(path: impl Into<String>) -> Self {
        Target::Path(path.into())
    }

    /// Target a named route.
    pub fn name(name: impl Into<String>) -> Self {
        Target::Name(name.into())
    }
}

/// A binding from a url path to a view.
pub struct Route {
    path: &'static str,
    name: &'static str,
    component: Component,
}

impl Route {
    /// Bind `path` and `name` to the given component.
    pub fn new(path: &'static str, name: &'static str, component: Component) -> Self {
        Route {
            path: path,
            name: name,
            component: component,
        }
    }

    /// Bind `path` and `name` to a view that is built right away.
    pub fn eager<V: View + 'static>(path: &'static str, name: &'static str, view: V) -> Self {
        Route::new(path, name, Component::eager(view))
    }

    /// Bind `path` and `name` to a view that is built on first navigation.
    pub fn lazy(path: &'static str, name: &'static str, loader: fn() -> ViewRef) -> Self {
        Route::new(path, name, Component::lazy(loader))
    }

    /// The url path of this route.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// The symbolic name of this route.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The component bound to this route.
    pub fn component(&self) -> &Component {
        &self.component
    }

    /// The view for this route. Lazy views are loaded by this call if they weren't already.
    pub fn view(&self) -> ViewRef {
        self.component.view()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("component", &self.component)
            .finish()
    }
}

/// Normalize a url path for matching.
///
/// Query strings and fragments are dropped, an empty path becomes `/`, and a trailing slash is
/// removed from anything but the root.
pub fn normalize(path: &str) -> &str {
    let path = match path.find(|c| c == '?' || c == '#') {
        Some(i) => &path[..i],
        None => path,
    };

    if path.is_empty() {
        "/"
    }
    else if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    }
    else {
        path
    }
}

/// An immutable, ordered set of routes with unique paths and names.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a route table.
    ///
    /// Fails if two routes share a path (after normalization) or a name.
    pub fn new(routes: Vec<Route>) -> Result<Self> {
        let mut paths = HashSet::new();
        let mut names = HashSet::new();

        for route in &routes {
            if !paths.insert(normalize(route.path)) {
                return Err(Error::DuplicatePath(route.path.to_owned()));
            }
            if !names.insert(route.name) {
                return Err(Error::DuplicateName(route.name.to_owned()));
            }
        }

        Ok(RouteTable { routes: routes })
    }

    /// Find the route bound to a url path.
    pub fn by_path(&self, path: &str) -> Option<&Route> {
        self.position(&Target::path(path)).map(|i| &self.routes[i])
    }

    /// Find the route with the given name.
    pub fn by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Find the route for a navigation target.
    pub fn resolve(&self, target: &Target) -> Option<&Route> {
        self.position(target).map(|i| &self.routes[i])
    }

    /// The index of the route for a navigation target.
    pub fn position(&self, target: &Target) -> Option<usize> {
        match target {
            Target::Path(path) => {
                let path = normalize(path);
                self.routes.iter().position(|route| normalize(route.path) == path)
            }
            Target::Name(name) => {
                self.routes.iter().position(|route| route.name == name)
            }
        }
    }

    /// Get a route by index.
    pub fn get(&self, index: usize) -> Option<&Route> {
        self.routes.get(index)
    }

    /// Iterate over the routes in order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// The number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use wasm_bindgen::JsValue;
    use crate::app::Navigator;

    struct Page;

    impl View for Page {
        fn title(&self) -> &str { "page" }
        fn mount(&self, _parent: &web_sys::Element, _nav: &Navigator) -> std::result::Result<(), JsValue> { Ok(()) }
    }

    fn page() -> ViewRef {
        Rc::new(Page)
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            Route::eager("/", "Root", Page),
            Route::lazy("/a", "A", page),
            Route::lazy("/b/c", "C", page),
        ])
        .expect("valid table")
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/a/"), "/a");
        assert_eq!(normalize("/a?x=1"), "/a");
        assert_eq!(normalize("/a#top"), "/a");
        assert_eq!(normalize("?x=1"), "/");
    }

    #[test]
    fn lookup_by_path() {
        let table = table();

        assert_eq!(table.by_path("/").map(Route::name), Some("Root"));
        assert_eq!(table.by_path("/a").map(Route::name), Some("A"));
        assert_eq!(table.by_path("/a/").map(Route::name), Some("A"));
        assert_eq!(table.by_path("/b/c?q").map(Route::name), Some("C"));
        assert!(table.by_path("/b").is_none());
        assert!(table.by_path("/A").is_none());
    }

    #[test]
    fn lookup_by_name() {
        let table = table();

        assert_eq!(table.by_name("C").map(Route::path), Some("/b/c"));
        assert!(table.by_name("c").is_none());
        assert_eq!(table.resolve(&Target::name("A")).map(Route::path), Some("/a"));
        assert_eq!(table.resolve(&Target::path("/a")).map(Route::name), Some("A"));
    }

    #[test]
    fn order_is_kept() {
        let names: Vec<_> = table().iter().map(Route::name).collect();
        assert_eq!(names, vec!["Root", "A", "C"]);
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let result = RouteTable::new(vec![
            Route::eager("/", "Home", Page),
            Route::lazy("/other", "Home", page),
        ]);

        match result {
            Err(Error::DuplicateName(name)) => assert_eq!(name, "Home"),
            other => panic!("expected duplicate name error, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let result = RouteTable::new(vec![
            Route::lazy("/a", "A", page),
            Route::lazy("/a/", "B", page),
        ]);

        match result {
            Err(Error::DuplicatePath(path)) => assert_eq!(path, "/a/"),
            other => panic!("expected duplicate path error, got {:?}", other),
        }
    }

    #[test]
    fn resolving_does_not_load() {
        let table = table();

        let route = table.by_path("/a").expect("route");
        assert!(!route.component().is_loaded());

        route.view();
        assert!(route.component().is_loaded());
        assert_eq!(route.component().loads(), 1);
    }
}
