//! Attach the router to the DOM.
//!
//! The app shell owns a [`Router`] and the element the current view is mounted in. It listens for
//! url changes from the browser and re-renders when the route changes. Rendering happens on the
//! next animation frame, and that is also when a lazy view gets loaded, so a navigation to a view
//! that hasn't been built yet renders once the view is ready.
//!
//! Views get a [`Navigator`] when they are mounted. Links carrying the [`ROUTE_ATTRIBUTE`] are
//! followed by the shell instead of the browser.
//!
//! [`Router`]: ../router/struct.Router.html
//! [`Navigator`]: struct.Navigator.html
//! [`ROUTE_ATTRIBUTE`]: constant.ROUTE_ATTRIBUTE.html

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use crate::error::{Error, Result};
use crate::history::{BrowserHistory, History, HistoryMode, MemoryHistory};
use crate::route::{Route, RouteTable, Target};
use crate::router::Router;

/// Attribute naming the route a link points to, e.g. `<a href="/recipes" data-route="Recipes">`.
pub const ROUTE_ATTRIBUTE: &str = "data-route";

/// Detach an app from the DOM.
pub trait Detach {
    /// Detach an app from the DOM.
    ///
    /// Any mounted view is removed and event handlers are unregistered.
    fn detach(&self);
}

/// Struct used to configure and attach the app to the DOM.
#[derive(Debug, Default)]
pub struct AppBuilder {
    mode: HistoryMode,
}

impl AppBuilder {
    /// Use the given history mode. Defaults to browser url history.
    pub fn history(self, mode: HistoryMode) -> Self {
        AppBuilder {
            mode: mode,
        }
    }

    /// Attach an app to the dom.
    ///
    /// The view for the current url is mounted in `parent` right away. Event handlers will be
    /// registered as necessary.
    pub fn attach(self, parent: web_sys::Element, table: RouteTable) -> Result<Navigator> {
        let AppBuilder { mode } = self;

        let history: Box<dyn History> = match mode {
            HistoryMode::Memory => Box::new(MemoryHistory::default()),
            _ => Box::new(BrowserHistory::new()?),
        };

        // initialize the router with the initial url
        let mut router = Router::new(table, mode.clone(), history);
        let url = router.location()?;
        router.sync(&url);

        let navigator = Navigator {
            shell: Rc::new(RefCell::new(Shell {
                parent: parent.clone(),
                router: router,
                title: document()?.title(),
                mounted: None,
                rendered: false,
                listeners: vec![],
                animation_frame: None,
            })),
            pending: Rc::new(RefCell::new(VecDeque::new())),
        };

        navigator.render()?;

        // register event handlers
        let window = window()?;
        for event in mode.events() {
            let nav = navigator.clone();
            let closure = Closure::wrap(
                Box::new(move |_event| {
                    let synced = nav.location().and_then(|url| nav.sync(&url));
                    if let Err(e) = synced {
                        error!("error following url change: {}", e);
                    }
                }) as Box<dyn FnMut(web_sys::Event)>
            );

            navigator.listen(window.as_ref(), event, closure)?;
        }

        // follow clicks on route links
        let nav = navigator.clone();
        let closure = Closure::wrap(
            Box::new(move |event: web_sys::Event| {
                if let Some(name) = route_link(&event) {
                    event.prevent_default();
                    if let Err(e) = nav.push(&Target::Name(name)) {
                        error!("error following link: {}", e);
                    }
                }
            }) as Box<dyn FnMut(web_sys::Event)>
        );
        navigator.listen(parent.as_ref(), "click", closure)?;

        Ok(navigator)
    }
}

/// The name of the route a clicked link points to, if the click landed in a route link.
fn route_link(event: &web_sys::Event) -> Option<String> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    let link = target.closest(&format!("a[{}]", ROUTE_ATTRIBUTE)).ok()??;
    link.get_attribute(ROUTE_ATTRIBUTE)
}

/// A navigation waiting to be applied to the router.
enum Navigation {
    Push(Target),
    Replace(Target),
    Sync(String),
}

/// The router, the element it renders into, and the browser resources held on its behalf.
struct Shell {
    parent: web_sys::Element,
    router: Router,
    /// The document title from before the app was attached.
    title: String,
    mounted: Option<&'static str>,
    rendered: bool,
    listeners: Vec<(web_sys::EventTarget, String, Closure<dyn FnMut(web_sys::Event)>)>,
    animation_frame: Option<(i32, Closure<dyn FnMut(f64)>)>,
}

/// A shared handle for navigating an attached app.
///
/// Navigation requested while the app is busy is queued and applied by whoever holds the app,
/// so views may navigate from inside [`View::mount`].
///
/// [`View::mount`]: ../view/trait.View.html#tymethod.mount
#[derive(Clone)]
pub struct Navigator {
    shell: Rc<RefCell<Shell>>,
    pending: Rc<RefCell<VecDeque<Navigation>>>,
}

impl Navigator {
    /// Navigate to a target, adding a history entry.
    pub fn push(&self, target: &Target) -> Result<()> {
        self.dispatch(Navigation::Push(target.clone()))
    }

    /// Navigate to a target, replacing the current history entry.
    pub fn replace(&self, target: &Target) -> Result<()> {
        self.dispatch(Navigation::Replace(target.clone()))
    }

    /// Follow a url reported by the browser.
    pub fn sync(&self, url: &str) -> Result<()> {
        self.dispatch(Navigation::Sync(url.to_owned()))
    }

    /// Render any pending navigation now instead of waiting for the next animation frame.
    pub fn flush(&self) -> Result<()> {
        let frame = self.shell.borrow_mut().animation_frame.take();
        if let Some((handle, _closure)) = frame {
            window()?.cancel_animation_frame(handle).map_err(Error::dom)?;
        }

        self.render()
    }

    /// Whether a render is waiting for an animation frame.
    pub fn is_render_pending(&self) -> bool {
        self.shell.borrow().animation_frame.is_some()
    }

    /// The name of the current route.
    pub fn current(&self) -> Option<&'static str> {
        self.shell.borrow().router.current().map(Route::name)
    }

    /// The name of the route whose view is mounted.
    pub fn mounted(&self) -> Option<&'static str> {
        self.shell.borrow().mounted
    }

    /// The address bar url for a target.
    pub fn href(&self, target: &Target) -> Option<String> {
        self.shell.borrow().router.href(target)
    }

    /// The current url according to the history.
    pub fn location(&self) -> Result<String> {
        self.shell.borrow().router.location()
    }

    /// Whether the view for a route has been built.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.shell.borrow().router.table()
            .by_name(name)
            .map_or(false, |route| route.component().is_loaded())
    }

    /// Queue a navigation and apply the queue.
    fn dispatch(&self, navigation: Navigation) -> Result<()> {
        self.pending.borrow_mut().push_back(navigation);
        self.process()
    }

    /// Apply queued navigation, then schedule a render if anything changed.
    fn process(&self) -> Result<()> {
        // try to borrow the shell
        let mut shell = match self.shell.try_borrow_mut() {
            Ok(shell) => shell,
            // already borrowed, the current borrower will process the queue
            Err(_) => return Ok(()),
        };

        let mut navigated = false;
        loop {
            let navigation = match self.pending.borrow_mut().pop_front() {
                Some(navigation) => navigation,
                None => break,
            };

            match navigation {
                Navigation::Push(target) => { shell.router.push(&target)?; }
                Navigation::Replace(target) => { shell.router.replace(&target)?; }
                Navigation::Sync(url) => { shell.router.sync(&url); }
            }
            navigated = true;
        }

        drop(shell);

        if navigated {
            self.schedule_render()?;
        }

        Ok(())
    }

    /// Request an animation frame for rendering if we don't already have a request out.
    fn schedule_render(&self) -> Result<()> {
        if self.is_render_pending() {
            return Ok(());
        }

        let nav = self.clone();
        let closure = Closure::wrap(
            Box::new(move |_| {
                if let Err(e) = nav.render() {
                    error!("error rendering: {}", e);
                }
            }) as Box<dyn FnMut(f64)>
        );

        let handle = window()?
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .map_err(Error::dom)?;

        self.shell.borrow_mut().animation_frame = Some((handle, closure));

        Ok(())
    }

    /// Mount the view for the current route, replacing whatever was mounted before.
    ///
    /// The shell is not borrowed while the view mounts, so the view is free to use this
    /// navigator.
    fn render(&self) -> Result<()> {
        let update = {
            let mut shell = self.shell.borrow_mut();
            shell.animation_frame = None;

            let name = shell.router.current().map(Route::name);
            if shell.rendered && name == shell.mounted {
                None
            }
            else {
                shell.mounted = name;
                shell.rendered = true;
                // lazy views are loaded here
                Some((shell.parent.clone(), shell.router.view(), shell.title.clone()))
            }
        };

        if let Some((parent, view, title)) = update {
            parent.set_inner_html("");

            match view {
                Some(view) => {
                    view.mount(&parent, self).map_err(Error::dom)?;
                    document()?.set_title(view.title());
                    debug!("mounted \"{}\"", view.title());
                }
                None => {
                    document()?.set_title(&title);
                    debug!("no route matched, nothing mounted");
                }
            }
        }

        // apply anything queued while we held the shell
        self.process()
    }

    /// Register an event listener that is removed on detach.
    fn listen(
        &self,
        target: &web_sys::EventTarget,
        event: &str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    ) -> Result<()> {
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(Error::dom)?;

        self.shell.borrow_mut().listeners.push((target.clone(), event.to_owned(), closure));

        Ok(())
    }
}

impl Detach for Navigator {
    fn detach(&self) {
        let mut shell = self.shell.borrow_mut();

        // remove listeners
        for (target, event, listener) in shell.listeners.drain(..) {
            if let Err(e) = target.remove_event_listener_with_callback(&event, listener.as_ref().unchecked_ref()) {
                error!("failed to remove {} listener: {:?}", event, e);
            }
        }

        // cancel any pending render, dropping the callback and the handle it holds on the app
        if let Some((handle, _closure)) = shell.animation_frame.take() {
            match web_sys::window() {
                Some(window) => {
                    if let Err(e) = window.cancel_animation_frame(handle) {
                        error!("failed to cancel render: {:?}", e);
                    }
                }
                None => error!("couldn't get window handle"),
            }
        }

        self.pending.borrow_mut().clear();

        // remove the mounted view
        shell.parent.set_inner_html("");
        shell.mounted = None;
        shell.rendered = false;

        match document() {
            Ok(document) => document.set_title(&shell.title),
            Err(e) => error!("{}", e),
        }
    }
}

fn window() -> Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| Error::Dom("couldn't get window handle".to_owned()))
}

fn document() -> Result<web_sys::Document> {
    window()?
        .document()
        .ok_or_else(|| Error::Dom("couldn't get document handle".to_owned()))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::views;

    use wasm_bindgen_test::*;
    use wasm_bindgen_test::wasm_bindgen_test_configure;
    wasm_bindgen_test_configure!(run_in_browser);

    fn attach() -> Navigator {
        let parent = document().unwrap().create_element("div").unwrap();

        AppBuilder::default()
            .history(HistoryMode::Memory)
            .attach(parent, views::routes().unwrap())
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn detach_with_render_pending_releases_the_app() {
        let nav = attach();

        nav.push(&Target::name("Recipes")).unwrap();
        assert!(nav.is_render_pending());

        nav.detach();
        assert!(!nav.is_render_pending());

        let shell = Rc::downgrade(&nav.shell);
        drop(nav);
        assert!(shell.upgrade().is_none(), "app still referenced after detach");
    }

    #[wasm_bindgen_test]
    fn flush_drops_the_scheduled_render() {
        let nav = attach();

        nav.push(&Target::name("ShoppingList")).unwrap();
        nav.flush().unwrap();
        assert!(!nav.is_render_pending());
        assert_eq!(nav.mounted(), Some("ShoppingList"));

        nav.detach();

        let shell = Rc::downgrade(&nav.shell);
        drop(nav);
        assert!(shell.upgrade().is_none(), "app still referenced after detach");
    }

    #[wasm_bindgen_test]
    fn navigation_queued_while_busy_is_applied_later() {
        let nav = attach();

        {
            let _busy = nav.shell.borrow_mut();
            nav.push(&Target::name("Recipes")).unwrap();
        }
        assert_eq!(nav.current(), Some("Home"));

        nav.flush().unwrap();
        assert_eq!(nav.current(), Some("Recipes"));

        nav.flush().unwrap();
        assert_eq!(nav.mounted(), Some("Recipes"));

        nav.detach();
    }
}
