#![forbid(unsafe_code)]

//! DOM wiring for the stateless page helpers: form validation, reveal
//! animation, lazy images, keyboard accessibility, hover effects, the loader
//! fade and the global error logger.
//!
//! Everything installed here is owned by [`Enhancements`]; dropping it removes
//! the listeners, disconnects the observers and cancels the loader timer.
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use js_sys::{Array, Reflect};
use siteui_core::helpers::focus::{FOCUSABLE_SELECTOR, INTERACTIVE_SELECTOR, LiveRegion};
use siteui_core::helpers::form::{
    CLASS_ERROR, CLASS_ERROR_MESSAGE, FieldInput, REQUIRED_SELECTOR, validate_fields,
};
use siteui_core::helpers::reveal::{CLASS_ANIMATE_IN, LoadStrategy, RevealTracker, lazy_load};
use siteui_core::helpers::{HoverEffect, StyleWrite, focus_trap_target, loader_schedule};
use siteui_core::{ErrorKind, ErrorReport, Key, SiteConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, ErrorEvent, Event, HtmlElement, HtmlImageElement, HtmlInputElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, PromiseRejectionEvent, Window,
};

use crate::dom::js_message;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Listeners, observers and timers installed by [`Enhancements::install`].
#[derive(Default)]
pub struct Enhancements {
    listeners: Vec<EventListener>,
    observers: Vec<(IntersectionObserver, ObserverCallback)>,
    loader_timer: Rc<RefCell<Option<Timeout>>>,
}

impl Drop for Enhancements {
    fn drop(&mut self) {
        for (observer, _) in &self.observers {
            observer.disconnect();
        }
    }
}

/// All elements matching `selector`; an invalid selector yields none.
fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        tracing::warn!(selector, "invalid selector");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn apply_styles(element: &HtmlElement, writes: &[StyleWrite]) {
    let style = element.style();
    for write in writes {
        let result = if write.value.is_empty() {
            style.remove_property(write.property).map(drop)
        } else {
            style.set_property(write.property, write.value)
        };
        if let Err(err) = result {
            tracing::warn!(property = write.property, error = %js_message(&err), "style write failed");
        }
    }
}

fn now_iso() -> String {
    String::from(js_sys::Date::new_0().to_iso_string())
}

impl Enhancements {
    /// Install every helper. Individual helpers whose elements are absent
    /// install nothing.
    pub fn install(window: &Window, document: &Document, config: &SiteConfig) -> Self {
        let mut this = Self::default();
        this.install_error_logger(window);
        this.install_form_validation(document, config);
        this.install_reveal(document, config);
        this.install_lazy_images(window, document, config);
        this.install_accessibility(document);
        this.install_hover(document, config);
        this.install_loader(window, document, config);
        tracing::debug!(
            listeners = this.listeners.len(),
            observers = this.observers.len(),
            "page helpers installed"
        );
        this
    }

    fn install_error_logger(&mut self, window: &Window) {
        let context = {
            let user_agent = window.navigator().user_agent().unwrap_or_default();
            let url = window.location().href().unwrap_or_default();
            Rc::new((user_agent, url))
        };

        let ctx = Rc::clone(&context);
        self.listeners
            .push(EventListener::new(window, "error", move |event: &Event| {
                let Some(event) = event.dyn_ref::<ErrorEvent>() else {
                    return;
                };
                let error = event.error();
                let stack = Reflect::get(&error, &"stack".into())
                    .ok()
                    .and_then(|s| s.as_string());
                log_report(
                    ErrorReport::new(ErrorKind::Uncaught, event.message())
                        .with_stack(stack)
                        .with_timestamp(now_iso())
                        .with_context(ctx.0.clone(), ctx.1.clone()),
                );
            }));

        let ctx = context;
        self.listeners.push(EventListener::new(
            window,
            "unhandledrejection",
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PromiseRejectionEvent>() else {
                    return;
                };
                let reason = event.reason();
                let stack = Reflect::get(&reason, &"stack".into())
                    .ok()
                    .and_then(|s| s.as_string());
                log_report(
                    ErrorReport::new(ErrorKind::UnhandledRejection, js_message(&reason))
                        .with_stack(stack)
                        .with_timestamp(now_iso())
                        .with_context(ctx.0.clone(), ctx.1.clone()),
                );
            },
        ));
    }

    fn install_form_validation(&mut self, document: &Document, config: &SiteConfig) {
        let Ok(Some(form)) = document.query_selector(&config.elements.form_selector) else {
            return;
        };
        let message = config.labels.required_field.clone();
        let target = form.clone();
        self.listeners.push(EventListener::new_with_options(
            &form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                event.prevent_default();
                let fields = required_fields(&target);
                let inputs: Vec<FieldInput> = fields
                    .iter()
                    .map(|el| FieldInput::new(el.get_attribute("name").unwrap_or_default(), field_value(el)))
                    .collect();
                let report = validate_fields(&inputs, &message);
                for &index in &report.cleared {
                    clear_field_error(&fields[index]);
                }
                for error in &report.errors {
                    show_field_error(&fields[error.index], &error.message);
                }
                if report.is_valid() {
                    gloo::console::log!("form submitted");
                }
            },
        ));
    }

    fn install_reveal(&mut self, document: &Document, config: &SiteConfig) {
        let targets = select_all(document, &config.reveal.selector);
        if targets.is_empty() {
            return;
        }
        let mut tracker = RevealTracker::new();
        let elements = targets.clone();
        let callback: ObserverCallback = Closure::new(move |entries: Array, _: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                let target = entry.target();
                let Some(index) = elements.iter().position(|el| *el == target) else {
                    continue;
                };
                if tracker.observe(index, entry.is_intersecting()) {
                    let _ = target.class_list().add_1(CLASS_ANIMATE_IN);
                }
            }
        });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(config.reveal.threshold));
        options.set_root_margin(&config.reveal.root_margin);
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options) {
            Ok(observer) => {
                for el in &targets {
                    observer.observe(el);
                }
                self.observers.push((observer, callback));
            }
            Err(err) => tracing::warn!(error = %js_message(&err), "reveal observer unavailable"),
        }
    }

    fn install_lazy_images(&mut self, window: &Window, document: &Document, config: &SiteConfig) {
        let images: Vec<HtmlImageElement> = select_all(document, &config.reveal.lazy_image_selector)
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlImageElement>().ok())
            .collect();
        if images.is_empty() {
            return;
        }

        let supported = Reflect::has(window, &"IntersectionObserver".into()).unwrap_or(false);
        match LoadStrategy::detect(supported) {
            LoadStrategy::Immediate => {
                for img in &images {
                    load_image(img, LoadStrategy::Immediate, None);
                }
            }
            LoadStrategy::Observe => {
                let callback: ObserverCallback =
                    Closure::new(move |entries: Array, observer: IntersectionObserver| {
                        for entry in entries.iter() {
                            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                                continue;
                            };
                            if !entry.is_intersecting() {
                                continue;
                            }
                            if let Ok(img) = entry.target().dyn_into::<HtmlImageElement>() {
                                load_image(&img, LoadStrategy::Observe, Some(&observer));
                            }
                        }
                    });
                match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
                    Ok(observer) => {
                        for img in &images {
                            observer.observe(img);
                        }
                        self.observers.push((observer, callback));
                    }
                    Err(err) => {
                        tracing::warn!(error = %js_message(&err), "lazy observer failed; loading now");
                        for img in &images {
                            load_image(img, LoadStrategy::Immediate, None);
                        }
                    }
                }
            }
        }
    }

    fn install_accessibility(&mut self, document: &Document) {
        for element in select_all(document, INTERACTIVE_SELECTOR) {
            let Ok(element) = element.dyn_into::<HtmlElement>() else {
                continue;
            };
            let target = element.clone();
            self.listeners.push(EventListener::new(
                &element,
                "keydown",
                move |event: &Event| {
                    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if Key::from_dom(&event.key(), event.shift_key()).activates()
                        && target.tag_name().eq_ignore_ascii_case("a")
                    {
                        target.click();
                    }
                },
            ));
        }

        let doc = document.clone();
        self.listeners.push(EventListener::new_with_options(
            document,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let Key::Tab { shift } = Key::from_dom(&event.key(), event.shift_key()) else {
                    return;
                };
                let focusable = select_all(&doc, FOCUSABLE_SELECTOR);
                let active = doc.active_element();
                let current = active
                    .as_ref()
                    .and_then(|a| focusable.iter().position(|el| el == a));
                let Some(next) = focus_trap_target(focusable.len(), current, shift) else {
                    return;
                };
                if let Some(el) = focusable[next].dyn_ref::<HtmlElement>() {
                    event.prevent_default();
                    let _ = el.focus();
                }
            },
        ));

        let Some(body) = document.body() else {
            return;
        };
        let Ok(region) = document.create_element("div") else {
            return;
        };
        for (name, value) in LiveRegion::ATTRIBUTES {
            let _ = region.set_attribute(name, value);
        }
        region.set_class_name(LiveRegion::CLASS);
        if let Err(err) = body.append_child(&region) {
            tracing::warn!(error = %js_message(&err), "live region not appended");
        }
    }

    fn install_hover(&mut self, document: &Document, config: &SiteConfig) {
        let groups = [
            (&config.elements.service_card_selector, HoverEffect::ServiceCard),
            (&config.elements.team_image_selector, HoverEffect::TeamImage),
        ];
        for (selector, effect) in groups {
            for element in select_all(document, selector) {
                let Ok(element) = element.dyn_into::<HtmlElement>() else {
                    continue;
                };
                for (dom_type, hovering) in [("mouseenter", true), ("mouseleave", false)] {
                    let target = element.clone();
                    self.listeners
                        .push(EventListener::new(&element, dom_type, move |_: &Event| {
                            apply_styles(&target, effect.styles(hovering));
                        }));
                }
            }
        }
    }

    fn install_loader(&mut self, window: &Window, document: &Document, config: &SiteConfig) {
        let Some(loader) = document
            .query_selector(&config.elements.loader_selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let fade = config.reveal.loader_fade();
        let slot = Rc::clone(&self.loader_timer);
        self.listeners
            .push(EventListener::once(window, "load", move |_: &Event| {
                let [fade_out, hide] = loader_schedule(fade);
                apply_styles(&loader, &[fade_out.write]);
                let millis = u32::try_from(hide.delay.as_millis()).unwrap_or(u32::MAX);
                let target = loader.clone();
                *slot.borrow_mut() = Some(Timeout::new(millis, move || {
                    apply_styles(&target, &[hide.write]);
                }));
            }));
    }
}

fn log_report(report: ErrorReport) {
    report.log();
    gloo::console::error!(report.to_string(), report.to_json());
}

/// Record an initialization failure. No retry; the page stays usable.
pub fn log_init_error(message: &str) {
    let mut report = ErrorReport::new(ErrorKind::Init, message).with_timestamp(now_iso());
    if let Some(window) = web_sys::window() {
        report = report.with_context(
            window.navigator().user_agent().unwrap_or_default(),
            window.location().href().unwrap_or_default(),
        );
    }
    log_report(report);
}

fn load_image(img: &HtmlImageElement, strategy: LoadStrategy, observer: Option<&IntersectionObserver>) {
    let Some(load) = lazy_load(img.get_attribute("data-src").as_deref(), strategy) else {
        return;
    };
    img.set_src(&load.src);
    if let Some(class) = load.remove_class {
        let _ = img.class_list().remove_1(class);
    }
    if load.unobserve
        && let Some(observer) = observer
    {
        observer.unobserve(img);
    }
}

fn required_fields(form: &Element) -> Vec<Element> {
    let Ok(list) = form.query_selector_all(REQUIRED_SELECTOR) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn field_value(el: &Element) -> String {
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

fn clear_field_error(field: &Element) {
    if let Some(parent) = field.parent_element()
        && let Ok(Some(message)) = parent.query_selector(&format!(".{CLASS_ERROR_MESSAGE}"))
    {
        message.remove();
    }
    let _ = field.class_list().remove_1(CLASS_ERROR);
}

fn show_field_error(field: &Element, message: &str) {
    clear_field_error(field);
    let Some(parent) = field.parent_element() else {
        return;
    };
    let Some(document) = field.owner_document() else {
        return;
    };
    if let Ok(div) = document.create_element("div") {
        div.set_class_name(CLASS_ERROR_MESSAGE);
        div.set_text_content(Some(message));
        let _ = parent.append_child(&div);
    }
    let _ = field.class_list().add_1(CLASS_ERROR);
}
