//! Browser side of the carousel: paints through `web-sys`, schedules through
//! `gloo-timers` and feeds DOM events into the controller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_timers::callback::{Interval, Timeout};
use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, MouseEvent, Node,
    TouchEvent, Window,
};

use super::controller::CarouselController;
use super::surface::{RenderSurface, TimerKind, Timers};
use super::track::{ExtendedTrack, SlotKind};
use super::CarouselError;
use crate::config::CarouselConfig;

pub const WRAPPER_ID: &str = "testimonial-wrapper";
pub const TRACK_ID: &str = "testimonial-carousel";
pub const PREV_ID: &str = "testimonial-prev";
pub const NEXT_ID: &str = "testimonial-next";
pub const DOTS_ID: &str = "testimonial-dots";

const ORIGINAL_CARDS: &str = ".testimonial-card:not(.clone)";
const CLONE_CLASS: &str = "clone";
const NO_TRANSITION_CLASS: &str = "no-transition";
const DOT_CLASS: &str = "testimonial-dot";
const ACTIVE_CLASS: &str = "active";
const DOT_INDEX_ATTR: &str = "data-index";

type DomController = CarouselController<DomSurface, GlooTimers>;

fn js_err(err: JsValue) -> CarouselError {
    CarouselError::Dom(format!("{:?}", err))
}

fn warn_on_err<T>(result: Result<T, JsValue>, action: &str) {
    if let Err(err) = result {
        warn!("Carousel failed to {}: {:?}", action, err);
    }
}

pub struct DomSurface {
    window: Window,
    document: Document,
    wrapper: HtmlElement,
    track: HtmlElement,
    dots: HtmlElement,
    originals: Vec<Element>,
}

impl DomSurface {
    fn new(
        window: Window,
        document: Document,
        wrapper: HtmlElement,
        track: HtmlElement,
        dots: HtmlElement,
    ) -> Result<Self, CarouselError> {
        let found = track.query_selector_all(ORIGINAL_CARDS).map_err(js_err)?;
        let originals = (0..found.length())
            .filter_map(|i| found.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();

        Ok(Self {
            window,
            document,
            wrapper,
            track,
            dots,
            originals,
        })
    }

    pub fn item_count(&self) -> usize {
        self.originals.len()
    }

    fn remove_clones(&self) {
        if let Ok(clones) = self.track.query_selector_all(&format!(".{}", CLONE_CLASS)) {
            for node in (0..clones.length()).filter_map(|i| clones.get(i)) {
                if let Some(clone) = node.dyn_ref::<Element>() {
                    clone.remove();
                }
            }
        }
    }

    fn clone_card(&self, original: usize) -> Result<Element, JsValue> {
        let source = self
            .originals
            .get(original)
            .ok_or_else(|| JsValue::from_str("clone source out of range"))?;
        let clone = source.clone_node_with_deep(true)?.dyn_into::<Element>()?;
        clone.class_list().add_1(CLONE_CLASS)?;
        clone.set_attribute("aria-hidden", "true")?;
        Ok(clone)
    }

    fn insert_clones(&self, track: &ExtendedTrack) -> Result<(), JsValue> {
        let anchor = self.originals.first().map(AsRef::<Node>::as_ref);
        for slot in track.leading() {
            let clone = self.clone_card(slot.original)?;
            self.track.insert_before(&clone, anchor)?;
        }
        for slot in track.trailing() {
            let clone = self.clone_card(slot.original)?;
            self.track.append_child(&clone)?;
        }
        Ok(())
    }

    fn cards(&self) -> Vec<HtmlElement> {
        let children = self.track.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect()
    }
}

impl RenderSurface for DomSurface {
    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn wrapper_width(&self) -> f64 {
        self.wrapper.get_bounding_client_rect().width()
    }

    fn rebuild_track(&mut self, track: &ExtendedTrack) {
        self.remove_clones();
        match self.insert_clones(track) {
            Ok(()) => debug!(
                "Track rebuilt with {} clones",
                track
                    .leading()
                    .iter()
                    .chain(track.trailing())
                    .filter(|slot| slot.kind == SlotKind::Clone)
                    .count()
            ),
            Err(err) => warn!("Failed to clone testimonial cards: {:?}", err),
        }
    }

    fn set_card_basis(&mut self, px: f64) {
        let basis = format!("{}px", px);
        for card in self.cards() {
            warn_on_err(card.style().set_property("flex-basis", &basis), "set card width");
        }
    }

    fn first_card_lefts(&self) -> Option<(f64, f64)> {
        // Reading offsetWidth forces the new flex-basis to be laid out.
        let _ = self.track.offset_width();
        let children = self.track.children();
        let first = children.item(0)?.get_bounding_client_rect().left();
        let second = children.item(1)?.get_bounding_client_rect().left();
        Some((first, second))
    }

    fn set_offset(&mut self, px: f64) {
        warn_on_err(
            self.track
                .style()
                .set_property("transform", &format!("translateX({}px)", px)),
            "move the track",
        );
    }

    fn set_animated(&mut self, animated: bool) {
        warn_on_err(
            self.track
                .class_list()
                .toggle_with_force(NO_TRANSITION_CLASS, !animated),
            "toggle the track transition",
        );
    }

    fn render_dots(&mut self, count: usize) {
        self.dots.set_inner_html("");
        for index in 0..count {
            let dot = match self.document.create_element("button") {
                Ok(dot) => dot,
                Err(err) => {
                    warn!("Failed to create carousel dot: {:?}", err);
                    return;
                }
            };
            dot.set_class_name(DOT_CLASS);
            let added = dot
                .set_attribute("type", "button")
                .and_then(|_| dot.set_attribute(DOT_INDEX_ATTR, &index.to_string()))
                .and_then(|_| {
                    dot.set_attribute("aria-label", &format!("Go to testimonial {}", index + 1))
                })
                .and_then(|_| self.dots.append_child(&dot));
            warn_on_err(added, "add a dot");
        }
    }

    fn set_active_dot(&mut self, index: usize) {
        let dots = self.dots.children();
        for i in 0..dots.length() {
            if let Some(dot) = dots.item(i) {
                warn_on_err(
                    dot.class_list()
                        .toggle_with_force(ACTIVE_CLASS, i as usize == index),
                    "mark the active dot",
                );
            }
        }
    }
}

/// Keeps a gloo timer alive; dropping it cancels the timer.
pub enum TimerHandle {
    Interval(#[allow(dead_code)] Interval),
    Timeout(#[allow(dead_code)] Timeout),
}

pub struct GlooTimers {
    dispatch: Rc<dyn Fn(TimerKind)>,
}

impl Timers for GlooTimers {
    type Handle = TimerHandle;

    fn every(&mut self, kind: TimerKind, period_ms: u32) -> TimerHandle {
        let dispatch = self.dispatch.clone();
        TimerHandle::Interval(Interval::new(period_ms, move || dispatch(kind)))
    }

    fn after(&mut self, kind: TimerKind, delay_ms: u32) -> TimerHandle {
        let dispatch = self.dispatch.clone();
        TimerHandle::Timeout(Timeout::new(delay_ms, move || dispatch(kind)))
    }
}

fn with_controller(weak: &Weak<RefCell<DomController>>, f: impl FnOnce(&mut DomController)) {
    let Some(controller) = weak.upgrade() else {
        return;
    };
    match controller.try_borrow_mut() {
        Ok(mut controller) => f(&mut controller),
        Err(_) => debug!("Carousel busy, skipping re-entrant event"),
    };
}

/// An event listener that unregisters itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        passive: Option<bool>,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, CarouselError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let added = match passive {
            Some(passive) => {
                let options = AddEventListenerOptions::new();
                options.set_passive(passive);
                target.add_event_listener_with_callback_and_add_event_listener_options(
                    event,
                    callback.as_ref().unchecked_ref(),
                    &options,
                )
            }
            None => target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()),
        };
        added.map_err(js_err)?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        warn_on_err(
            self.target
                .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref()),
            "remove a listener",
        );
    }
}

/// Dot index from a dot's `data-index` attribute.
fn parse_dot_index(raw: Option<String>) -> Option<usize> {
    raw?.trim().parse().ok()
}

/// The dot a click landed on, even when it hit something inside the dot.
fn clicked_dot(event: &Event) -> Option<usize> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let dot = target.closest(&format!(".{}", DOT_CLASS)).ok().flatten()?;
    parse_dot_index(dot.get_attribute(DOT_INDEX_ATTR))
}

/// Cards have their own hover transitions that bubble up to the track.
fn is_from_track(event: &Event, track: &JsValue) -> bool {
    event
        .target()
        .map_or(false, |target| JsValue::from(target) == *track)
}

fn touch_position(event: &Event) -> Option<(f64, f64)> {
    let touch = event.dyn_ref::<TouchEvent>()?.touches().get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn mouse_position(event: &Event) -> Option<(f64, f64)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((mouse.client_x() as f64, mouse.client_y() as f64))
}

fn element_by_id(document: &Document, id: &'static str) -> Result<HtmlElement, CarouselError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or(CarouselError::MissingElement(id))
}

/// A live carousel. Dropping it removes its listeners and cancels its timers.
pub struct MountedCarousel {
    controller: Rc<RefCell<DomController>>,
    _listeners: Vec<Listener>,
}

impl Drop for MountedCarousel {
    fn drop(&mut self) {
        if let Ok(controller) = self.controller.try_borrow() {
            debug!("Unmounting carousel with {} items", controller.item_count());
        }
    }
}

/// Wires up the carousel found in `document`. Any missing element means the
/// page has no carousel and nothing is attached.
pub fn mount(document: &Document, config: CarouselConfig) -> Result<MountedCarousel, CarouselError> {
    let window = web_sys::window().ok_or_else(|| CarouselError::Dom("no window".to_string()))?;
    let wrapper = element_by_id(document, WRAPPER_ID)?;
    let track = element_by_id(document, TRACK_ID)?;
    let prev = element_by_id(document, PREV_ID)?;
    let next = element_by_id(document, NEXT_ID)?;
    let dots = element_by_id(document, DOTS_ID)?;

    let debounce_ms = config.resize_debounce_ms;

    let surface = DomSurface::new(
        window.clone(),
        document.clone(),
        wrapper.clone(),
        track.clone(),
        dots.clone(),
    )?;
    let item_count = surface.item_count();

    // Timers fire back into the controller, which does not exist yet.
    let target: Rc<RefCell<Weak<RefCell<DomController>>>> = Rc::new(RefCell::new(Weak::new()));
    let dispatch: Rc<dyn Fn(TimerKind)> = {
        let target = target.clone();
        Rc::new(move |kind| {
            let weak = target.borrow().clone();
            with_controller(&weak, |c| c.on_timer(kind));
        })
    };

    let controller = CarouselController::new(surface, GlooTimers { dispatch }, item_count, config)?;
    let controller = Rc::new(RefCell::new(controller));
    *target.borrow_mut() = Rc::downgrade(&controller);
    let weak = Rc::downgrade(&controller);

    let mut listeners = Vec::new();

    listeners.push(Listener::new(&prev, "click", None, {
        let weak = weak.clone();
        move |_| with_controller(&weak, |c| {
            c.prev();
        })
    })?);

    listeners.push(Listener::new(&next, "click", None, {
        let weak = weak.clone();
        move |_| with_controller(&weak, |c| {
            c.next();
        })
    })?);

    // Dots are re-rendered on every resize, so clicks are delegated.
    listeners.push(Listener::new(&dots, "click", None, {
        let weak = weak.clone();
        move |event: Event| {
            if let Some(index) = clicked_dot(&event) {
                with_controller(&weak, |c| {
                    c.go_to_dot(index);
                });
            }
        }
    })?);

    listeners.push(Listener::new(&track, "transitionend", None, {
        let weak = weak.clone();
        let track_value: JsValue = track.clone().into();
        move |event: Event| {
            if is_from_track(&event, &track_value) {
                with_controller(&weak, |c| c.on_transition_end());
            }
        }
    })?);

    listeners.push(Listener::new(&track, "touchstart", Some(true), {
        let weak = weak.clone();
        move |event: Event| {
            if let Some((x, y)) = touch_position(&event) {
                with_controller(&weak, |c| c.handle_drag_start(x, y));
            }
        }
    })?);

    listeners.push(Listener::new(&track, "touchmove", Some(false), {
        let weak = weak.clone();
        move |event: Event| {
            if let Some((x, y)) = touch_position(&event) {
                let mut swiping = false;
                with_controller(&weak, |c| swiping = c.handle_drag_move(x, y));
                if swiping {
                    event.prevent_default();
                }
            }
        }
    })?);

    for event in ["touchend", "touchcancel"] {
        listeners.push(Listener::new(&track, event, None, {
            let weak = weak.clone();
            move |_| with_controller(&weak, |c| c.handle_drag_end())
        })?);
    }

    listeners.push(Listener::new(&track, "mousedown", None, {
        let weak = weak.clone();
        move |event: Event| {
            if let Some((x, y)) = mouse_position(&event) {
                with_controller(&weak, |c| c.handle_drag_start(x, y));
            }
        }
    })?);

    listeners.push(Listener::new(&window, "mousemove", None, {
        let weak = weak.clone();
        move |event: Event| {
            if let Some((x, y)) = mouse_position(&event) {
                with_controller(&weak, |c| {
                    c.handle_drag_move(x, y);
                });
            }
        }
    })?);

    listeners.push(Listener::new(&window, "mouseup", None, {
        let weak = weak.clone();
        move |_| with_controller(&weak, |c| c.handle_drag_end())
    })?);

    for event in ["mouseenter", "focusin"] {
        listeners.push(Listener::new(&wrapper, event, None, {
            let weak = weak.clone();
            move |_| with_controller(&weak, |c| c.pause_autoplay())
        })?);
    }

    for event in ["mouseleave", "focusout"] {
        listeners.push(Listener::new(&wrapper, event, None, {
            let weak = weak.clone();
            move |_| with_controller(&weak, |c| c.resume_autoplay())
        })?);
    }

    listeners.push(Listener::new(&window, "resize", None, {
        let weak = weak.clone();
        let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        move |_| {
            with_controller(&weak, |c| c.pause_autoplay());
            let weak = weak.clone();
            // Replacing the pending timeout cancels it.
            *pending.borrow_mut() = Some(Timeout::new(debounce_ms, move || {
                with_controller(&weak, |c| c.on_resize());
            }));
        }
    })?);

    {
        let mut controller = controller.borrow_mut();
        controller.initialize();
        info!(
            "Testimonial carousel mounted: {} items, {} per view, {}px slides",
            item_count,
            controller.items_per_view(),
            controller.slide_width()
        );
    }

    Ok(MountedCarousel {
        controller,
        _listeners: listeners,
    })
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::EventInit;

    wasm_bindgen_test_configure!(run_in_browser);

    const CARDS: usize = 3;

    /// Carousel markup appended to the body, removed again on drop.
    struct Fixture {
        document: Document,
        wrapper: HtmlElement,
    }

    impl Fixture {
        fn new() -> Self {
            let document = web_sys::window().unwrap().document().unwrap();
            let wrapper = html(&document, "div", WRAPPER_ID, "testimonial-wrapper");
            let track = html(&document, "div", TRACK_ID, "testimonial-track");
            for i in 0..CARDS {
                let card = html(&document, "div", "", "testimonial-card");
                card.set_text_content(Some(&format!("Card {}", i)));
                track.append_child(&card).unwrap();
            }
            wrapper.append_child(&track).unwrap();
            for (id, tag) in [(PREV_ID, "button"), (NEXT_ID, "button"), (DOTS_ID, "div")] {
                wrapper.append_child(&html(&document, tag, id, "")).unwrap();
            }
            document.body().unwrap().append_child(&wrapper).unwrap();
            Self { document, wrapper }
        }

        fn get(&self, id: &str) -> HtmlElement {
            self.document
                .get_element_by_id(id)
                .unwrap()
                .dyn_into::<HtmlElement>()
                .unwrap()
        }

        fn mount(&self) -> MountedCarousel {
            mount(&self.document, CarouselConfig::default()).unwrap()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            self.wrapper.remove();
        }
    }

    fn html(document: &Document, tag: &str, id: &str, class: &str) -> HtmlElement {
        let el = document
            .create_element(tag)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        if !id.is_empty() {
            el.set_id(id);
        }
        el.set_class_name(class);
        el
    }

    fn bubbling(event: &str) -> Event {
        let init = EventInit::new();
        init.set_bubbles(true);
        Event::new_with_event_init_dict(event, &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn mount_fails_without_markup() {
        let document = web_sys::window().unwrap().document().unwrap();
        assert!(matches!(
            mount(&document, CarouselConfig::default()),
            Err(CarouselError::MissingElement(WRAPPER_ID))
        ));
    }

    #[wasm_bindgen_test]
    fn clicking_a_dot_moves_to_its_slide() {
        let fixture = Fixture::new();
        let mounted = fixture.mount();
        let dots = fixture.get(DOTS_ID);
        assert_eq!(dots.children().length() as usize, CARDS);

        let dot = dots
            .children()
            .item(1)
            .unwrap()
            .dyn_into::<HtmlElement>()
            .unwrap();
        dot.click();

        let controller = mounted.controller.borrow();
        assert_eq!(controller.current_index(), 1 + controller.items_per_view());
        assert_eq!(controller.active_dot(), 1);
    }

    #[wasm_bindgen_test]
    fn click_inside_a_dot_is_delegated() {
        let fixture = Fixture::new();
        let mounted = fixture.mount();
        let dot = fixture.get(DOTS_ID).children().item(2).unwrap();
        let inner = html(&fixture.document, "span", "", "");
        dot.append_child(&inner).unwrap();

        inner.click();

        assert_eq!(mounted.controller.borrow().active_dot(), 2);
    }

    #[wasm_bindgen_test]
    fn card_transitionend_does_not_finish_the_slide() {
        let fixture = Fixture::new();
        let mounted = fixture.mount();
        fixture.get(NEXT_ID).click();
        assert!(mounted.controller.borrow().is_transitioning());

        let card = fixture.get(TRACK_ID).children().item(0).unwrap();
        card.dispatch_event(&bubbling("transitionend")).unwrap();
        assert!(mounted.controller.borrow().is_transitioning());

        fixture
            .get(TRACK_ID)
            .dispatch_event(&bubbling("transitionend"))
            .unwrap();
        assert!(!mounted.controller.borrow().is_transitioning());
    }

    #[wasm_bindgen_test]
    fn touchcancel_ends_the_drag() {
        let fixture = Fixture::new();
        let mounted = fixture.mount();
        mounted.controller.borrow_mut().handle_drag_start(100.0, 50.0);
        assert!(mounted.controller.borrow().is_dragging());

        fixture
            .get(TRACK_ID)
            .dispatch_event(&Event::new("touchcancel").unwrap())
            .unwrap();

        let controller = mounted.controller.borrow();
        assert!(!controller.is_dragging());
        assert!(controller.is_autoplaying());
    }

    #[wasm_bindgen_test]
    fn dropping_the_carousel_detaches_it() {
        let fixture = Fixture::new();
        let mounted = fixture.mount();
        let weak = Rc::downgrade(&mounted.controller);
        let before = fixture.get(TRACK_ID).style().get_property_value("transform").unwrap();

        drop(mounted);
        assert!(weak.upgrade().is_none());

        fixture.get(NEXT_ID).click();
        fixture
            .get(TRACK_ID)
            .dispatch_event(&Event::new("touchcancel").unwrap())
            .unwrap();
        let after = fixture.get(TRACK_ID).style().get_property_value("transform").unwrap();
        assert_eq!(before, after);
    }
}
