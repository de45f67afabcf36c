//! The pages of MealPal and the route table that binds them to urls.
//!
//! The home page is built with the table. Everything else is built on first visit.

use std::rc::Rc;
use std::thread::LocalKey;
use log::error;
use once_cell::unsync::OnceCell;
use wasm_bindgen::JsValue;
use crate::app::{Navigator, ROUTE_ATTRIBUTE};
use crate::error::Result;
use crate::meal_plan::{self, LocalStorage, WeekPlan};
use crate::route::{Route, RouteTable, Target};
use crate::view::{View, ViewRef};

/// The landing page.
#[derive(Debug, Default)]
pub struct HomeView;

/// Recipe browsing.
#[derive(Debug, Default)]
pub struct RecipesView;

/// The weekly meal plan.
#[derive(Debug, Default)]
pub struct MealPlannerView;

/// The shopping list.
#[derive(Debug, Default)]
pub struct ShoppingListView;

/// Build the MealPal route table.
///
/// Secondary views are shared by every table built in this process, so building a second table
/// (after detaching and re-attaching the app, say) doesn't build them again.
pub fn routes() -> Result<RouteTable> {
    RouteTable::new(vec![
        Route::eager("/", "Home", HomeView),
        Route::lazy("/recipes", "Recipes", load_recipes),
        Route::lazy("/meal-planner", "MealPlanner", load_meal_planner),
        Route::lazy("/shopping-list", "ShoppingList", load_shopping_list),
    ])
}

// wasm is single threaded, so a thread local is a process wide cache
thread_local! {
    static RECIPES: OnceCell<ViewRef> = OnceCell::new();
    static MEAL_PLANNER: OnceCell<ViewRef> = OnceCell::new();
    static SHOPPING_LIST: OnceCell<ViewRef> = OnceCell::new();
    static BUILT: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

/// Get a view from `cache`, building it with `build` the first time.
fn shared(cache: &'static LocalKey<OnceCell<ViewRef>>, build: fn() -> ViewRef) -> ViewRef {
    cache.with(|cell| {
        Rc::clone(cell.get_or_init(|| {
            BUILT.with(|built| built.set(built.get() + 1));
            build()
        }))
    })
}

/// How many secondary views this process has built.
pub fn views_built() -> usize {
    BUILT.with(|built| built.get())
}

fn load_recipes() -> ViewRef {
    shared(&RECIPES, || -> ViewRef { Rc::new(RecipesView) })
}

fn load_meal_planner() -> ViewRef {
    shared(&MEAL_PLANNER, || -> ViewRef { Rc::new(MealPlannerView) })
}

fn load_shopping_list() -> ViewRef {
    shared(&SHOPPING_LIST, || -> ViewRef { Rc::new(ShoppingListView) })
}

fn document() -> std::result::Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("couldn't get document handle"))
}

/// Append a new element holding `text` to `parent`.
fn append(parent: &web_sys::Element, name: &str, text: &str)
-> std::result::Result<web_sys::Element, JsValue>
{
    let element = document()?.create_element(name)?;
    if !text.is_empty() {
        element.set_text_content(Some(text));
    }
    parent.append_child(&element)?;
    Ok(element)
}

/// Append a list of links to named routes.
///
/// The app shell follows clicks on these links without reloading the page.
fn links(parent: &web_sys::Element, nav: &Navigator, routes: &[(&str, &str)])
-> std::result::Result<(), JsValue>
{
    let list = append(parent, "ul", "")?;
    list.set_attribute("class", "links")?;
    for &(name, label) in routes {
        let href = match nav.href(&Target::name(name)) {
            Some(href) => href,
            None => continue,
        };
        let a = append(&append(&list, "li", "")?, "a", label)?;
        a.set_attribute("href", &href)?;
        a.set_attribute(ROUTE_ATTRIBUTE, name)?;
    }
    Ok(())
}

impl View for HomeView {
    fn title(&self) -> &str {
        "MealPal"
    }

    fn mount(&self, parent: &web_sys::Element, nav: &Navigator) -> std::result::Result<(), JsValue> {
        append(parent, "h1", self.title())?;
        append(parent, "p", "Plan your meals, find recipes and keep track of your shopping.")?;
        links(parent, nav, &[
            ("Recipes", "Recipes"),
            ("MealPlanner", "Meal planner"),
            ("ShoppingList", "Shopping list"),
        ])?;
        Ok(())
    }
}

impl View for RecipesView {
    fn title(&self) -> &str {
        "Recipes"
    }

    fn mount(&self, parent: &web_sys::Element, nav: &Navigator) -> std::result::Result<(), JsValue> {
        append(parent, "h1", self.title())?;
        links(parent, nav, &[("Home", "Home")])?;
        Ok(())
    }
}

impl View for MealPlannerView {
    fn title(&self) -> &str {
        "Meal Planner"
    }

    fn mount(&self, parent: &web_sys::Element, nav: &Navigator) -> std::result::Result<(), JsValue> {
        append(parent, "h1", self.title())?;

        let plan = LocalStorage::new()
            .and_then(|store| meal_plan::load(&store))
            .unwrap_or_else(|e| {
                error!("error reading meal plan from storage: {}", e);
                WeekPlan::default()
            });

        let list = append(parent, "ul", "")?;
        list.set_attribute("class", "week-plan")?;
        for (day, meals) in plan.iter() {
            let item = append(&list, "li", "")?;
            append(&item, "h2", day.name())?;
            let meals_list = append(&item, "ul", "")?;
            for meal in meals {
                append(&meals_list, "li", meal)?;
            }
        }

        links(parent, nav, &[("ShoppingList", "Shopping list"), ("Home", "Home")])?;
        Ok(())
    }
}

impl View for ShoppingListView {
    fn title(&self) -> &str {
        "Shopping List"
    }

    fn mount(&self, parent: &web_sys::Element, nav: &Navigator) -> std::result::Result<(), JsValue> {
        append(parent, "h1", self.title())?;
        links(parent, nav, &[("Home", "Home")])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Router;

    #[test]
    fn paths_resolve_to_named_routes() {
        let table = routes().unwrap();

        for &(path, name, title) in &[
            ("/", "Home", "MealPal"),
            ("/recipes", "Recipes", "Recipes"),
            ("/meal-planner", "MealPlanner", "Meal Planner"),
            ("/shopping-list", "ShoppingList", "Shopping List"),
        ] {
            let route = table.by_path(path).expect("route for path");
            assert_eq!(route.name(), name);
            assert_eq!(route.view().title(), title);
        }
    }

    #[test]
    fn only_home_is_eager() {
        let table = routes().unwrap();

        let lazy: Vec<_> = table.iter()
            .filter(|route| route.component().is_lazy())
            .map(|route| route.name())
            .collect();

        assert_eq!(lazy, vec!["Recipes", "MealPlanner", "ShoppingList"]);
        assert!(table.iter().all(|route| route.component().loads() == 0));
    }

    #[test]
    fn home_does_not_load_on_demand() {
        let mut router = Router::memory(routes().unwrap());

        router.push(&Target::path("/")).unwrap();
        router.view();

        assert!(router.table().iter().all(|route| route.component().loads() == 0));
        assert!(router.table().iter().filter(|r| r.component().is_lazy()).all(|r| !r.component().is_loaded()));
    }

    #[test]
    fn secondary_views_load_once() {
        let mut router = Router::memory(routes().unwrap());

        for _ in 0..2 {
            for name in &["Recipes", "MealPlanner", "ShoppingList", "Home"] {
                router.push(&Target::name(*name)).unwrap();
                router.view();
            }
        }

        for route in router.table().iter() {
            let expected = if route.component().is_lazy() { 1 } else { 0 };
            assert_eq!(route.component().loads(), expected, "loads for {}", route.name());
        }
    }

    #[test]
    fn secondary_views_are_built_once_per_process() {
        let first = routes().unwrap();
        let second = routes().unwrap();

        let recipes = first.by_name("Recipes").unwrap().view();
        let built = views_built();
        let again = second.by_name("Recipes").unwrap().view();

        assert_eq!(views_built(), built);
        assert!(Rc::ptr_eq(&recipes, &again));

        // each table still runs its own loader once, and gets the shared view back
        assert_eq!(first.by_name("Recipes").unwrap().component().loads(), 1);
        assert_eq!(second.by_name("Recipes").unwrap().component().loads(), 1);
    }
}
