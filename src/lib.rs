//! # MealPal
//!
//! The client-side shell of the MealPal meal planner, a single page app compiled to WebAssembly.
//!
//! The app is organized around a [`RouteTable`], an ordered list of url paths bound to views. The
//! home page is built along with the table; the other pages are built on demand, the first time
//! someone navigates to them. A [`Router`] wraps the table with a [`HistoryMode`] and keeps track
//! of the current route, and the [`app`] module attaches a router to the page, mounting the view
//! for the current url and following browser navigation.
//!
//! ```no_run
//! use mealpal::app::AppBuilder;
//! use mealpal::history::HistoryMode;
//! use mealpal::route::Target;
//!
//! # fn main() -> mealpal::error::Result<()> {
//! let parent = web_sys::window().unwrap()
//!     .document().unwrap()
//!     .get_element_by_id("app").unwrap();
//!
//! let navigator = AppBuilder::default()
//!     .history(HistoryMode::web())
//!     .attach(parent, mealpal::views::routes()?)?;
//!
//! navigator.push(&Target::name("MealPlanner"))?;
//! # Ok(())
//! # }
//! ```
//!
//! [`RouteTable`]: route/struct.RouteTable.html
//! [`Router`]: router/struct.Router.html
//! [`HistoryMode`]: history/enum.HistoryMode.html
//! [`app`]: app/index.html

#![deny(missing_docs)]

pub mod error;
pub mod view;
pub mod route;
pub mod history;
pub mod router;
pub mod app;
pub mod meal_plan;
pub mod views;

pub use crate::error::Error;

use cfg_if::cfg_if;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use crate::app::AppBuilder;

cfg_if! {
    if #[cfg(feature = "console_error_panic_hook")] {
        #[inline]
        fn set_panic_hook() {
            console_error_panic_hook::set_once();
            debug!("panic hook set");
        }
    }
    else {
        fn set_panic_hook() {}
    }
}

cfg_if! {
    if #[cfg(feature = "console_log")] {
        #[inline]
        fn init_log() {
            if console_log::init_with_level(log::Level::Debug).is_ok() {
                debug!("log initialized");
            }
        }
    }
    else {
        fn init_log() {}
    }
}

/// The id of the element the app is mounted in.
pub const MOUNT_POINT: &str = "app";

/// Entry point: attach MealPal to the `#app` element, if the page has one.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_log();
    set_panic_hook();

    let parent = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(MOUNT_POINT));

    let parent = match parent {
        Some(parent) => parent,
        None => {
            warn!("no #{} element, MealPal not attached", MOUNT_POINT);
            return Ok(());
        }
    };

    let navigator = views::routes()
        .and_then(|table| AppBuilder::default().attach(parent, table))
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    info!("MealPal initialized at {}", navigator.current().unwrap_or("an unknown route"));

    Ok(())
}
