use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use leptos::logging::{error, log, warn};
use leptos::prelude::{document, set_timeout, window};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlFormElement};

use crate::chrome::{marker_change, ScrollChrome};
use crate::config::{PortfolioConfig, CONFIG_ELEMENT_ID};
use crate::dom::{self, marker};
use crate::error::UiResult;
use crate::form::{FormValidator, Verdict};
use crate::navigation::{fragment_id, MenuState, NavState};
use crate::visibility::{resolve_section_batch, ObservedSet, ProgressLatch, RevealMarker};

type Shared<T> = Rc<RefCell<T>>;

thread_local! {
    static MOUNTED: Cell<bool> = const { Cell::new(false) };
}

/// Reads the `#portfolio-config` JSON block, falling back to defaults.
pub fn embedded_config() -> PortfolioConfig {
    let raw = document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content());
    let Some(raw) = raw else {
        return PortfolioConfig::default();
    };
    match PortfolioConfig::from_json(&raw) {
        Ok(config) => config,
        Err(err) => {
            error!("portfolio-ui: config rejected, using defaults: {err}");
            PortfolioConfig::default()
        }
    }
}

/// Mounts now if the DOM is parsed, otherwise on `DOMContentLoaded`.
pub fn boot(config: PortfolioConfig) {
    let doc = document();
    if doc.ready_state() != "loading" {
        mount(&doc, config);
        return;
    }
    let mut pending = Some(config);
    let result = dom::listen(&doc, "DOMContentLoaded", false, move |_| {
        if let Some(config) = pending.take() {
            mount(&document(), config);
        }
    });
    if let Err(err) = result {
        error!("portfolio-ui: cannot wait for DOMContentLoaded: {err}");
    }
}

fn mount(doc: &Document, config: PortfolioConfig) {
    if MOUNTED.with(|mounted| mounted.replace(true)) {
        warn!("portfolio-ui: already mounted, ignoring second init");
        return;
    }

    report("progress bars", setup_progress_bars(doc, &config));
    report("reveal targets", setup_reveal(doc, &config));

    let nav = match NavLinks::collect(doc, &config) {
        Ok(nav) => Some(nav),
        Err(err) => {
            warn!("portfolio-ui: navigation skipped: {err}");
            None
        }
    };
    if let Some(nav) = &nav {
        report("tracked sections", nav.watch_sections(config.thresholds.section));
        report("nav links", nav.intercept_clicks());
    }
    let all_links = nav.as_ref().map(|nav| nav.all.as_slice()).unwrap_or_default();
    report("mobile menu", setup_mobile_menu(doc, &config, all_links));

    let chrome = ScrollChrome::new(config.sticky_offset, config.back_to_top_offset);
    report("sticky header", setup_sticky_header(doc, chrome, &config));
    report("back-to-top", setup_back_to_top(doc, chrome, &config));
    report("contact form", setup_contact_form(doc, &config));
}

fn report(feature: &str, result: UiResult<usize>) {
    match result {
        Ok(0) => log!("portfolio-ui: {feature}: nothing to wire"),
        Ok(count) => log!("portfolio-ui: {feature}: {count} wired"),
        Err(err) => warn!("portfolio-ui: {feature} skipped: {err}"),
    }
}

fn setup_progress_bars(doc: &Document, config: &PortfolioConfig) -> UiResult<usize> {
    let bars = dom::elements(doc.query_selector_all(&config.selectors.progress_bars)?);
    if bars.is_empty() {
        return Ok(0);
    }

    let latches: Shared<ObservedSet<Element, ProgressLatch>> = Rc::default();
    for bar in &bars {
        let target = bar.get_attribute(marker::DATA_WIDTH);
        latches.borrow_mut().insert(bar.clone(), ProgressLatch::new(target));
    }

    let tracked = latches.clone();
    let observer = dom::intersection_observer(config.thresholds.progress, move |batch, obs| {
        let mut latches = tracked.borrow_mut();
        for (bar, hit) in batch {
            let Some(width) = latches.get_mut(&bar).and_then(|latch| latch.observe(hit)) else {
                continue;
            };
            if let Err(err) = dom::set_width(&bar, &width) {
                warn!("portfolio-ui: progress bar width: {err}");
            }
            obs.unobserve(&bar);
            latches.remove(&bar);
        }
    })?;
    for bar in &bars {
        observer.observe(bar);
    }
    Ok(bars.len())
}

fn setup_reveal(doc: &Document, config: &PortfolioConfig) -> UiResult<usize> {
    let targets = dom::elements(doc.query_selector_all(&config.selectors.reveal_targets)?);
    if targets.is_empty() {
        return Ok(0);
    }

    let markers: Shared<ObservedSet<Element, RevealMarker>> = Rc::default();
    for el in &targets {
        let state = RevealMarker::from_revealed(dom::has_class(el, marker::IN_VIEW));
        markers.borrow_mut().insert(el.clone(), state);
    }

    let tracked = markers.clone();
    let observer = dom::intersection_observer(config.thresholds.reveal, move |batch, _| {
        let mut markers = tracked.borrow_mut();
        for (el, hit) in batch {
            let changed = markers
                .get_mut(&el)
                .is_some_and(|state| state.observe(hit));
            if changed {
                if let Err(err) = dom::set_class(&el, marker::IN_VIEW, true) {
                    warn!("portfolio-ui: reveal: {err}");
                }
            }
        }
    })?;
    for el in &targets {
        observer.observe(el);
    }
    Ok(targets.len())
}

/// Every nav anchor, the sections their `href`s resolved to, and the shared
/// active-link state indexed like `all`.
struct NavLinks {
    all: Rc<Vec<Element>>,
    sections: Vec<Element>,
    state: Shared<NavState>,
}

impl NavLinks {
    fn collect(doc: &Document, config: &PortfolioConfig) -> UiResult<Self> {
        let all = dom::elements(doc.query_selector_all(&config.selectors.nav_links)?);
        let mut sections = Vec::new();
        let mut targets = Vec::with_capacity(all.len());
        for link in &all {
            let href = link.get_attribute("href").unwrap_or_default();
            let Some(section) = fragment_id(&href).and_then(|id| doc.get_element_by_id(id)) else {
                log!("portfolio-ui: nav link {href:?} has no target");
                targets.push(None);
                continue;
            };
            targets.push(Some(section.id()));
            sections.push(section);
        }
        Ok(Self {
            all: Rc::new(all),
            sections,
            state: Rc::new(RefCell::new(NavState::new(targets))),
        })
    }

    fn watch_sections(&self, threshold: f64) -> UiResult<usize> {
        if self.sections.is_empty() {
            return Ok(0);
        }
        let state = self.state.clone();
        let links = self.all.clone();
        let observer = dom::intersection_observer(threshold, move |batch, _| {
            let ids: Vec<(String, _)> = batch
                .into_iter()
                .map(|(section, hit)| (section.id(), hit))
                .collect();
            let winner = resolve_section_batch(ids.iter().map(|(id, hit)| (id.as_str(), *hit)));
            if let Some(id) = winner {
                state.borrow_mut().show_section(id);
                sync_active(&links, &state.borrow());
            }
        })?;
        for section in &self.sections {
            observer.observe(section);
        }
        Ok(self.sections.len())
    }

    fn intercept_clicks(&self) -> UiResult<usize> {
        for (idx, link) in self.all.iter().enumerate() {
            let doc = document();
            let state = self.state.clone();
            let links = self.all.clone();
            dom::listen(link, "click", false, move |event: Event| {
                event.prevent_default();
                let target = state
                    .borrow()
                    .target(idx)
                    .and_then(|id| doc.get_element_by_id(id));
                let Some(target) = target else {
                    return;
                };
                dom::scroll_into_view_smooth(&target);
                state.borrow_mut().click(idx);
                sync_active(&links, &state.borrow());
            })?;
        }
        Ok(self.all.len())
    }
}

/// Writes the active marker on every anchor, including the ones without a
/// target, so a stale `active` from the markup cannot survive.
fn sync_active(links: &[Element], state: &NavState) {
    for (idx, link) in links.iter().enumerate() {
        if let Err(err) = dom::set_class(link, marker::ACTIVE, state.is_active(idx)) {
            warn!("portfolio-ui: nav link state: {err}");
        }
    }
}

fn setup_mobile_menu(
    doc: &Document,
    config: &PortfolioConfig,
    links: &[Element],
) -> UiResult<usize> {
    let hamburger = doc.query_selector(&config.selectors.hamburger)?;
    let nav_list = doc.query_selector(&config.selectors.nav_list)?;
    let (Some(hamburger), Some(nav_list)) = (hamburger, nav_list) else {
        return Ok(0);
    };

    let list = nav_list.clone();
    dom::listen(&hamburger, "click", false, move |_| {
        let mut menu = MenuState::from_open(dom::has_class(&list, marker::OPEN));
        let open = menu.toggle();
        if let Err(err) = dom::set_class(&list, marker::OPEN, open) {
            warn!("portfolio-ui: menu toggle: {err}");
        }
    })?;

    for link in links {
        let list = nav_list.clone();
        dom::listen(link, "click", false, move |_| {
            let mut menu = MenuState::from_open(dom::has_class(&list, marker::OPEN));
            menu.close();
            if let Err(err) = dom::set_class(&list, marker::OPEN, menu.is_open()) {
                warn!("portfolio-ui: menu close: {err}");
            }
        })?;
    }
    Ok(links.len() + 1)
}

fn setup_sticky_header(
    doc: &Document,
    chrome: ScrollChrome,
    config: &PortfolioConfig,
) -> UiResult<usize> {
    let Some(header) = doc.query_selector(&config.selectors.header)? else {
        return Ok(0);
    };
    let check = move || {
        let wanted = chrome.is_sticky(dom::scroll_y(&window()));
        if let Some(on) = marker_change(dom::has_class(&header, marker::STICKY), wanted) {
            if let Err(err) = dom::set_class(&header, marker::STICKY, on) {
                warn!("portfolio-ui: sticky header: {err}");
            }
        }
    };
    check();
    dom::listen(&window(), "scroll", true, move |_| check())?;
    Ok(1)
}

fn setup_back_to_top(
    doc: &Document,
    chrome: ScrollChrome,
    config: &PortfolioConfig,
) -> UiResult<usize> {
    let Some(button) = doc.get_element_by_id(&config.selectors.back_to_top_id) else {
        return Ok(0);
    };

    let toggled = button.clone();
    dom::listen(&window(), "scroll", true, move |_| {
        let wanted = chrome.shows_back_to_top(dom::scroll_y(&window()));
        if let Some(on) = marker_change(dom::has_class(&toggled, marker::SHOW), wanted) {
            if let Err(err) = dom::set_class(&toggled, marker::SHOW, on) {
                warn!("portfolio-ui: back-to-top: {err}");
            }
        }
    })?;
    dom::listen(&button, "click", false, move |_| {
        dom::scroll_to_top_smooth(&window());
    })?;
    Ok(1)
}

fn find_form(doc: &Document, selectors: &[String]) -> UiResult<Option<Element>> {
    for selector in selectors {
        if let Some(form) = doc.query_selector(selector)? {
            return Ok(Some(form));
        }
    }
    Ok(None)
}

fn setup_contact_form(doc: &Document, config: &PortfolioConfig) -> UiResult<usize> {
    let Some(form) = find_form(doc, &config.selectors.forms)? else {
        return Ok(0);
    };
    let validator = Rc::new(RefCell::new(FormValidator::new(
        config.fields.clone(),
        config.messages.clone(),
    )));
    let timeout = Duration::from_millis(config.success_timeout_ms);
    let rules = config.fields.len();

    let target = form.clone();
    dom::listen(&form, "submit", false, move |event: Event| {
        event.prevent_default();
        if let Err(err) = handle_submit(&target, &validator, timeout) {
            warn!("portfolio-ui: contact form: {err}");
        }
    })?;
    Ok(rules)
}

fn handle_submit(
    form: &Element,
    validator: &Shared<FormValidator>,
    timeout: Duration,
) -> UiResult<()> {
    let doc = document();
    let stale = form.query_selector_all(&format!(
        ".{}, .{}",
        marker::ERROR_MESSAGE,
        marker::SUCCESS_MESSAGE
    ))?;
    for node in dom::elements(stale) {
        node.remove();
    }

    let mut fields: Vec<(String, Element)> = Vec::new();
    let (submission, report) = validator.borrow_mut().submit(|selector| {
        let field = match form.query_selector(selector) {
            Ok(found) => found?,
            Err(_) => {
                warn!("portfolio-ui: invalid field selector {selector:?}");
                return None;
            }
        };
        let value = dom::field_value(&field);
        fields.push((selector.to_string(), field));
        Some(value)
    });

    for outcome in &report.fields {
        let Some((_, field)) = fields.iter().find(|(sel, _)| *sel == outcome.selector) else {
            continue;
        };
        match &outcome.verdict {
            Verdict::Invalid { message } => {
                dom::set_class(field, marker::ERROR, true)?;
                field.set_attribute(marker::ARIA_INVALID, "true")?;
                let note = doc.create_element("div")?;
                note.set_class_name(marker::ERROR_MESSAGE);
                note.set_text_content(Some(message.as_str()));
                // appended to the parent, so it renders right after the field
                if let Some(parent) = field.parent_node() {
                    parent.append_child(&note)?;
                }
            }
            Verdict::Valid => {
                dom::set_class(field, marker::ERROR, false)?;
                field.remove_attribute(marker::ARIA_INVALID)?;
            }
        }
    }

    if !report.is_valid() {
        return Ok(());
    }

    let success = doc.create_element("div")?;
    success.set_class_name(marker::SUCCESS_MESSAGE);
    success.set_text_content(Some(validator.borrow().messages().success.as_str()));
    form.append_child(&success)?;
    if let Some(html_form) = form.dyn_ref::<HtmlFormElement>() {
        html_form.reset();
    }

    let validator = validator.clone();
    set_timeout(
        move || {
            success.remove();
            validator.borrow_mut().expire_success(submission);
        },
        timeout,
    );
    Ok(())
}
