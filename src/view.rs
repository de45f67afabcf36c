//! Views and on-demand view construction.
//!
//! A route refers to its view through a [`Component`]. Eager components hold a view that was
//! built when the route table was built. Lazy components hold a [`LazyView`], a factory that
//! builds the view the first time it is asked for and hands out the cached view afterwards.
//!
//! [`Component`]: enum.Component.html
//! [`LazyView`]: struct.LazyView.html

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use log::debug;
use once_cell::unsync::OnceCell;
use wasm_bindgen::JsValue;
use crate::app::Navigator;

/// A page of the app that can be mounted in the DOM.
pub trait View {
    /// The title of the page, used as the document title while the view is mounted.
    fn title(&self) -> &str;

    /// Render this view as children of the given element.
    ///
    /// The navigator can be used to build links or to navigate away, including from inside
    /// `mount` itself.
    fn mount(&self, parent: &web_sys::Element, nav: &Navigator) -> Result<(), JsValue>;
}

/// A shared reference to a view.
pub type ViewRef = Rc<dyn View>;

/// A view that is constructed the first time it is needed.
///
/// The view is cached in the `LazyView`, so the loader runs at most once per route table. A
/// loader that must build its view at most once per process keeps its own cache, as the loaders
/// in [`views`] do.
///
/// [`views`]: ../views/index.html
pub struct LazyView {
    loader: fn() -> ViewRef,
    view: OnceCell<ViewRef>,
    loads: Cell<usize>,
}

impl LazyView {
    /// Create a lazy view which will be built by `loader` on first use.
    pub fn new(loader: fn() -> ViewRef) -> Self {
        LazyView {
            loader: loader,
            view: OnceCell::new(),
            loads: Cell::new(0),
        }
    }

    /// Get the view, running the loader if this is the first request.
    pub fn get(&self) -> ViewRef {
        let view = self.view.get_or_init(|| {
            self.loads.set(self.loads.get() + 1);
            let view = (self.loader)();
            debug!("loaded view \"{}\"", view.title());
            view
        });

        Rc::clone(view)
    }

    /// Whether the loader has already run.
    pub fn is_loaded(&self) -> bool {
        self.view.get().is_some()
    }

    /// How many times this `LazyView` has run its loader. Never more than one.
    pub fn loads(&self) -> usize {
        self.loads.get()
    }
}

impl fmt::Debug for LazyView {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LazyView {{ loaded: {} }}", self.is_loaded())
    }
}

/// The view bound to a route.
pub enum Component {
    /// A view built along with the route table.
    Eager(ViewRef),
    /// A view built on first navigation.
    Lazy(LazyView),
}

impl Component {
    /// Bind a view that already exists.
    pub fn eager<V: View + 'static>(view: V) -> Self {
        Component::Eager(Rc::new(view))
    }

    /// Bind a view that will be built by `loader` when first needed.
    pub fn lazy(loader: fn() -> ViewRef) -> Self {
        Component::Lazy(LazyView::new(loader))
    }

    /// Resolve the view, loading it if necessary.
    pub fn view(&self) -> ViewRef {
        match self {
            Component::Eager(view) => Rc::clone(view),
            Component::Lazy(lazy) => lazy.get(),
        }
    }

    /// Whether this component is deferred.
    pub fn is_lazy(&self) -> bool {
        match self {
            Component::Eager(_) => false,
            Component::Lazy(_) => true,
        }
    }

    /// Whether the view is available without running a loader.
    pub fn is_loaded(&self) -> bool {
        match self {
            Component::Eager(_) => true,
            Component::Lazy(lazy) => lazy.is_loaded(),
        }
    }

    /// How many times a loader ran for this component. Always zero for eager components.
    pub fn loads(&self) -> usize {
        match self {
            Component::Eager(_) => 0,
            Component::Lazy(lazy) => lazy.loads(),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Component::Eager(view) => write!(f, "Eager({:?})", view.title()),
            Component::Lazy(lazy) => write!(f, "Lazy({:?})", lazy),
        }
    }
}
