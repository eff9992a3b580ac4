#![forbid(unsafe_code)]

//! `wasm-bindgen` exports: [`SiteRunner`], [`boot`] and the geometry
//! utilities.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with live DOM
//! listeners. Only compiled on `wasm32` targets.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use js_sys::Reflect;
use siteui_core::helpers::{Rect, is_rect_in_viewport};
use siteui_core::{
    ElementConfig, ElementRole, EventKind, HandleOutcome, Key, PageEvent, SystemClock, Viewport,
    config::DEFAULT_ELEMENT_OFFSET_PX,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, KeyboardEvent, Node};

use crate::dom::{DomPage, document, js_message, window};
use crate::enhance::{Enhancements, log_init_error};
use crate::error::SiteError;
use crate::runner_core::{ListenerSpec, ListenerTarget, RunnerCore, listener_specs, parse_config};

type SharedCore = Rc<RefCell<RunnerCore<DomPage, SystemClock>>>;
type TimerSlot = Rc<RefCell<Option<Timeout>>>;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn to_js(err: SiteError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Dispatch `event`, then (re)arm the debounce timer if the coordinator has a
/// deadline.
fn dispatch(core: &SharedCore, timer: &TimerSlot, event: &PageEvent) -> HandleOutcome {
    let outcome = core.borrow_mut().handle(event);
    if let Some(wake_at) = outcome.wake_at {
        arm_timer(core, timer, wake_at);
    }
    outcome
}

/// Replacing the slot drops, and so cancels, the previous timeout. A callback
/// that fires before the clock reaches the deadline re-arms itself.
fn arm_timer(core: &SharedCore, timer: &TimerSlot, wake_at: Duration) {
    let millis = core.borrow().timer_delay_ms(wake_at);
    let core = Rc::clone(core);
    let slot = Rc::clone(timer);
    *timer.borrow_mut() = Some(Timeout::new(millis, move || {
        slot.borrow_mut().take();
        let pending = core.borrow_mut().fire_timer();
        if let Some(wake_at) = pending {
            arm_timer(&core, &slot, wake_at);
        }
    }));
}

/// Listeners for one wiring plan. Dropping unsubscribes all of them.
struct Bindings {
    listeners: Vec<EventListener>,
}

impl Bindings {
    fn wire(core: &SharedCore, timer: &TimerSlot) -> Result<Self, SiteError> {
        let window = window()?;
        let document = document()?;
        let specs = listener_specs(core.borrow().plan());
        let nav_link_selector = core.borrow().config().elements.nav_link_selector.clone();

        let mut listeners = Vec::new();
        for spec in specs {
            let targets: Vec<EventTarget> = match spec.target {
                ListenerTarget::Window => vec![window.clone().into()],
                ListenerTarget::Document => vec![document.clone().into()],
                ListenerTarget::MenuToggle => role_target(core, ElementRole::MenuToggle),
                ListenerTarget::BackToTop => role_target(core, ElementRole::BackToTop),
                ListenerTarget::NavLinks => {
                    let list = document
                        .query_selector_all(&nav_link_selector)
                        .map_err(|e| SiteError::Js(js_message(&e)))?;
                    (0..list.length())
                        .filter_map(|i| list.item(i))
                        .map(EventTarget::from)
                        .collect()
                }
            };
            for target in targets {
                listeners.push(listen(core, timer, spec, &target));
            }
        }
        tracing::debug!(listeners = listeners.len(), "coordinator listeners wired");
        Ok(Self { listeners })
    }
}

fn role_target(core: &SharedCore, role: ElementRole) -> Vec<EventTarget> {
    core.borrow()
        .page()
        .element(role)
        .map(|el| EventTarget::from(el.clone()))
        .into_iter()
        .collect()
}

fn listen(core: &SharedCore, timer: &TimerSlot, spec: ListenerSpec, target: &EventTarget) -> EventListener {
    let options = if spec.cancelable {
        EventListenerOptions::enable_prevent_default()
    } else {
        EventListenerOptions::default()
    };
    let core = Rc::clone(core);
    let timer = Rc::clone(timer);
    let element = target.clone();
    EventListener::new_with_options(target, spec.dom_type, options, move |event: &Event| {
        let Some(page_event) = to_page_event(&core, spec.kind, event, &element) else {
            return;
        };
        let outcome = dispatch(&core, &timer, &page_event);
        if spec.cancelable && outcome.dispatch.prevent_default {
            event.prevent_default();
        }
    })
}

fn to_page_event(
    core: &SharedCore,
    kind: EventKind,
    event: &Event,
    element: &EventTarget,
) -> Option<PageEvent> {
    Some(match kind {
        EventKind::WindowScroll => {
            let (width, y) = core.borrow().page().viewport();
            PageEvent::Scroll { y, width }
        }
        EventKind::WindowResize => {
            let (width, _) = core.borrow().page().viewport();
            PageEvent::Resize { width }
        }
        EventKind::ToggleClick => PageEvent::ToggleClick,
        EventKind::DocumentClick => {
            let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            let inside_menu = core.borrow().page().is_inside_menu(target.as_ref());
            PageEvent::DocumentClick { inside_menu }
        }
        EventKind::DocumentKeydown => {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            PageEvent::Key {
                key: Key::from_dom(&event.key(), event.shift_key()),
            }
        }
        EventKind::AnchorClick => {
            let href = element.dyn_ref::<web_sys::Element>()?.get_attribute("href")?;
            PageEvent::AnchorClick { href }
        }
        EventKind::BackToTopClick => PageEvent::BackToTopClick,
    })
}

/// Site interactivity runner exported to JavaScript.
///
/// ```js
/// const runner = new SiteRunner(JSON.stringify({ labels: { menu_open: "메뉴 열기", menu_close: "메뉴 닫기" } }));
/// runner.mount();
/// runner.pushEncodedEvent('{"kind":"toggle"}');
/// runner.state(); // { menu_open: true, ... }
/// runner.teardown();
/// ```
#[wasm_bindgen]
pub struct SiteRunner {
    core: SharedCore,
    timer: TimerSlot,
    bindings: Option<Bindings>,
    enhancements: Option<Enhancements>,
}

impl SiteRunner {
    fn create(config_json: Option<&str>) -> Result<Self, SiteError> {
        let config = parse_config(config_json)?;
        let page = DomPage::lookup(&config.elements)?;
        let (width, scroll_y) = page.viewport();
        let core = RunnerCore::new(
            config,
            Viewport::new(width, scroll_y),
            page,
            SystemClock::new(),
        );
        Ok(Self {
            core: Rc::new(RefCell::new(core)),
            timer: Rc::new(RefCell::new(None)),
            bindings: None,
            enhancements: None,
        })
    }

    fn mount_inner(&mut self) -> Result<(), SiteError> {
        if self.bindings.is_some() {
            return Err(SiteError::AlreadyMounted);
        }
        let bindings = Bindings::wire(&self.core, &self.timer)?;
        let enhancements = {
            let core = self.core.borrow();
            let page = core.page();
            Enhancements::install(page.window(), page.document(), core.config())
        };
        self.bindings = Some(bindings);
        self.enhancements = Some(enhancements);
        Ok(())
    }
}

#[wasm_bindgen]
impl SiteRunner {
    /// Look up the page elements and sync their initial presentation.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SiteRunner, JsValue> {
        install_panic_hook();
        Self::create(config_json.as_deref()).map_err(to_js)
    }

    /// Register every listener, observer and helper.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        self.mount_inner().map_err(to_js)
    }

    /// Remove listeners and observers and cancel pending timers.
    pub fn teardown(&mut self) {
        if let Some(bindings) = self.bindings.take() {
            tracing::debug!(listeners = bindings.listeners.len(), "coordinator listeners removed");
        }
        self.enhancements = None;
        self.timer.borrow_mut().take();
        if let Some(plan) = self.core.borrow_mut().teardown() {
            tracing::debug!(subscriptions = plan.len(), "runner torn down");
        }
    }

    /// Dispatch one JSON-encoded event. Returns whether the equivalent DOM
    /// event should have its default action prevented.
    #[wasm_bindgen(js_name = pushEncodedEvent)]
    pub fn push_encoded_event(&mut self, json: &str) -> Result<bool, JsValue> {
        let event = siteui_core::event_parser::parse_encoded_event(json)
            .map_err(|e| to_js(e.into()))?;
        Ok(dispatch(&self.core, &self.timer, &event).dispatch.prevent_default)
    }

    /// Current UI state as a plain object.
    pub fn state(&self) -> JsValue {
        let json = self.core.borrow().state_json();
        js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL)
    }

    /// Effective configuration as a JSON string.
    pub fn config(&self) -> String {
        self.core
            .borrow()
            .config()
            .to_json_string()
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.bindings.is_some()
    }
}

/// Build and mount a runner. Initialization failures are logged to the
/// console and `undefined` is returned; the rest of the page keeps working.
#[wasm_bindgen]
pub fn boot(config_json: Option<String>) -> Option<SiteRunner> {
    install_panic_hook();
    let result = SiteRunner::create(config_json.as_deref()).and_then(|mut runner| {
        runner.mount_inner()?;
        Ok(runner)
    });
    match result {
        Ok(runner) => {
            gloo::console::log!("site interactivity ready");
            Some(runner)
        }
        Err(err) => {
            log_init_error(&err.to_string());
            None
        }
    }
}

/// Smooth-scroll so element `id` sits `offset` (default 80) pixels below the
/// top of the window. Returns `false` if the element does not exist.
#[wasm_bindgen(js_name = scrollToElement)]
pub fn scroll_to_element(id: &str, offset: Option<f64>) -> bool {
    let Ok(mut page) = DomPage::lookup(&ElementConfig::default()) else {
        return false;
    };
    siteui_core::helpers::scroll_to_element(&mut page, id, offset.unwrap_or(DEFAULT_ELEMENT_OFFSET_PX))
        .is_some()
}

/// Whether element `id` is entirely inside the viewport.
#[wasm_bindgen(js_name = isElementInViewport)]
pub fn is_element_in_viewport(id: &str) -> bool {
    let (Ok(window), Ok(document)) = (window(), document()) else {
        return false;
    };
    let Some(element) = document.get_element_by_id(id) else {
        return false;
    };
    let r = element.get_bounding_client_rect();
    let root = document.document_element();
    let extent = |inner: Result<JsValue, JsValue>, client: fn(&web_sys::Element) -> i32| {
        inner
            .ok()
            .and_then(|v| v.as_f64())
            .filter(|v| *v > 0.0)
            .or_else(|| root.as_ref().map(|el| f64::from(client(el))))
            .unwrap_or(0.0)
    };
    let width = extent(window.inner_width(), web_sys::Element::client_width);
    let height = extent(window.inner_height(), web_sys::Element::client_height);
    is_rect_in_viewport(Rect::new(r.top(), r.left(), r.bottom(), r.right()), width, height)
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}
