use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, NodeList, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::error::{UiError, UiResult};
use crate::visibility::Intersection;

/// Class and attribute names shared with the page stylesheet.
pub mod marker {
    pub const IN_VIEW: &str = "in-view";
    pub const ACTIVE: &str = "active";
    pub const STICKY: &str = "sticky";
    pub const OPEN: &str = "open";
    pub const SHOW: &str = "show";
    pub const ERROR: &str = "error";
    pub const ERROR_MESSAGE: &str = "error-message";
    pub const SUCCESS_MESSAGE: &str = "success-message";
    pub const ARIA_INVALID: &str = "aria-invalid";
    pub const DATA_WIDTH: &str = "data-width";
}

pub fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|idx| list.item(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

pub fn set_class(el: &Element, class: &str, on: bool) -> UiResult<()> {
    el.class_list().toggle_with_force(class, on)?;
    Ok(())
}

pub fn set_width(el: &Element, width: &str) -> UiResult<()> {
    let el = el
        .dyn_ref::<HtmlElement>()
        .ok_or_else(|| UiError::Dom(format!("<{}> has no inline style", el.tag_name())))?;
    el.style().set_property("width", width)?;
    Ok(())
}

/// Current value of a form control. Non-controls read as empty.
pub fn field_value(el: &Element) -> String {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

/// Registers `handler` for the page lifetime.
pub fn listen<F>(target: &EventTarget, event: &str, passive: bool, handler: F) -> UiResult<()>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if passive {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
    } else {
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    }
    closure.forget();
    Ok(())
}

/// Builds an intersection observer whose callback receives each batch as
/// `(target, intersection)` pairs in delivery order.
pub fn intersection_observer<F>(threshold: f64, mut handler: F) -> UiResult<IntersectionObserver>
where
    F: FnMut(Vec<(Element, Intersection)>, &IntersectionObserver) + 'static,
{
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let batch = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .map(|entry| {
                    let hit = Intersection {
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    };
                    (entry.target(), hit)
                })
                .collect();
            handler(batch, &observer);
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    callback.forget();
    Ok(observer)
}

pub fn scroll_into_view_smooth(el: &Element) {
    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}

pub fn scroll_to_top_smooth(window: &Window) {
    let options = ScrollToOptions::new();
    options.set_top(0.0);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or_default()
}
