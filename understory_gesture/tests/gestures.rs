// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `understory_gesture` crate.
//!
//! These drive [`Gestures`] through an in-memory platform that records every
//! call it receives and replays whatever recognizer state the test sets up.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use understory_gesture::options::{
    EdgePanOptions, ForcePressOptions, LongPressOptions, PanOptions, SwipeOptions, TapOptions,
};
use understory_gesture::{
    AcceptRule, ArbitrationPolicy, Binding, CloseGesture, DragPhase, DragSource, DropTarget,
    Edges, EncodedItem, GestureData, GestureError, GesturePlatform, GestureKind, GestureState,
    Gestures, HandlerResult, Outcome, Payload, PayloadKind, RecognizerConfig, SwipeDirection,
    TouchForce,
};

type View = u32;
type Rec = u32;

#[derive(Debug, Default)]
struct FakePlatform {
    next: Rec,
    reuse: Option<Rec>,
    created: Vec<(Rec, RecognizerConfig)>,
    attached: HashMap<Rec, View>,
    enabled_calls: Vec<(Rec, bool)>,
    touch_enabled: HashSet<View>,
    states: HashMap<Rec, GestureState>,
    location: Point,
    touches: usize,
    translation: Vec2,
    force: Option<TouchForce>,
    under_touch: Option<View>,
    close: Option<CloseGesture<View, Rec>>,
    dismissed: Vec<View>,
    affordances: Vec<(View, bool)>,
    offered: Vec<EncodedItem>,
}

impl FakePlatform {
    fn set_state(&mut self, recognizer: Rec, state: GestureState) {
        self.states.insert(recognizer, state);
    }
}

impl GesturePlatform for FakePlatform {
    type View = View;
    type Recognizer = Rec;

    fn create_recognizer(&mut self, config: &RecognizerConfig) -> Rec {
        let id = self.reuse.take().unwrap_or_else(|| {
            self.next += 1;
            self.next
        });
        self.created.push((id, *config));
        id
    }

    fn attach(&mut self, view: View, recognizer: Rec) {
        self.attached.insert(recognizer, view);
    }

    fn detach(&mut self, view: View, recognizer: Rec) {
        assert_eq!(self.attached.remove(&recognizer), Some(view));
    }

    fn set_recognizer_enabled(&mut self, recognizer: Rec, enabled: bool) {
        self.enabled_calls.push((recognizer, enabled));
    }

    fn set_touch_enabled(&mut self, view: View, enabled: bool) {
        if enabled {
            self.touch_enabled.insert(view);
        } else {
            self.touch_enabled.remove(&view);
        }
    }

    fn state(&self, recognizer: Rec) -> GestureState {
        self.states.get(&recognizer).copied().unwrap_or_default()
    }

    fn location_in(&self, _: Rec, _: View) -> Point {
        self.location
    }

    fn number_of_touches(&self, _: Rec) -> usize {
        self.touches
    }

    fn translation_in(&self, _: Rec, _: View) -> Vec2 {
        self.translation
    }

    fn velocity_in(&self, _: Rec, _: View) -> Vec2 {
        Vec2::new(10.0, 0.0)
    }

    fn scale(&self, _: Rec) -> f64 {
        1.0
    }

    fn rotation(&self, _: Rec) -> f64 {
        0.0
    }

    fn velocity(&self, _: Rec) -> f64 {
        0.0
    }

    fn touch_force(&self, _: Rec) -> Option<TouchForce> {
        self.force
    }

    fn view_under_touch(&self, _: Rec) -> Option<View> {
        self.under_touch
    }

    fn close_gesture(&self, _: View) -> Option<CloseGesture<View, Rec>> {
        self.close
    }

    fn dismiss(&mut self, container: View) {
        self.dismissed.push(container);
    }

    fn drop_affordance(&mut self, target: View, accepted: bool) {
        self.affordances.push((target, accepted));
    }

    fn offer_external(&mut self, _: View, item: &EncodedItem) {
        self.offered.push(item.clone());
    }
}

#[derive(Debug)]
struct Boom;

impl fmt::Display for Boom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("boom")
    }
}

impl std::error::Error for Boom {}

type Log = Rc<RefCell<Vec<GestureData<View, Rec>>>>;

fn recorder() -> (
    Log,
    impl FnMut(&GestureData<View, Rec>) -> HandlerResult + 'static,
) {
    let log: Log = Rc::default();
    let sink = Rc::clone(&log);
    (log, move |data: &GestureData<View, Rec>| -> HandlerResult {
        sink.borrow_mut().push(*data);
        Ok(())
    })
}

fn gestures() -> Gestures<FakePlatform> {
    Gestures::new(FakePlatform {
        touches: 1,
        ..FakePlatform::default()
    })
}

fn fire(gestures: &mut Gestures<FakePlatform>, recognizer: Rec, state: GestureState) -> Outcome {
    gestures.platform_mut().set_state(recognizer, state);
    gestures.on_action(recognizer)
}

#[test]
fn registration_attaches_and_enables_touch() {
    let mut g = gestures();
    let (_, handler) = recorder();
    let tap = g.tap(7, TapOptions::new().taps(2), handler).unwrap();

    let recognizer = g.recognizer(tap).unwrap();
    let platform = g.platform();
    assert_eq!(platform.attached.get(&recognizer), Some(&7));
    assert!(platform.touch_enabled.contains(&7));
    assert_eq!(
        platform.created,
        [(recognizer, RecognizerConfig::Tap(TapOptions::new().taps(2)))]
    );
    assert!(g.is_enabled(tap).unwrap());
    assert_eq!(g.binding_for(recognizer), Some(tap));
}

#[test]
fn handler_receives_gesture_data() {
    let mut g = gestures();
    let (log, handler) = recorder();
    let pan = g.pan(1, PanOptions::new(), handler).unwrap();
    let recognizer = g.recognizer(pan).unwrap();

    g.platform_mut().location = Point::new(3.0, 4.0);
    g.platform_mut().translation = Vec2::new(12.0, -2.0);
    assert_eq!(fire(&mut g, recognizer, GestureState::Changed), Outcome::Handled);

    let log = log.borrow();
    let data = &log[0];
    assert!(data.changed());
    assert_eq!(data.view, 1);
    assert_eq!(data.recognizer, recognizer);
    assert_eq!(data.location, Point::new(3.0, 4.0));
    assert_eq!(data.number_of_touches, 1);
    assert_eq!(data.translation(), Some(Vec2::new(12.0, -2.0)));
    assert_eq!(data.pan_velocity(), Some(Vec2::new(10.0, 0.0)));
    assert_eq!(data.scale(), None);
}

#[test]
fn enable_and_disable_are_idempotent() {
    let mut g = gestures();
    let (_, handler) = recorder();
    let tap = g.tap(1, TapOptions::new(), handler).unwrap();
    let recognizer = g.recognizer(tap).unwrap();

    tap.disable(&mut g).unwrap();
    tap.disable(&mut g).unwrap();
    assert!(!g.is_enabled(tap).unwrap());
    assert_eq!(g.platform().enabled_calls, [(recognizer, false)]);
    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Disabled);

    tap.enable(&mut g).unwrap();
    tap.enable(&mut g).unwrap();
    assert!(g.is_enabled(tap).unwrap());
    assert_eq!(
        g.platform().enabled_calls,
        [(recognizer, false), (recognizer, true)]
    );
}

#[test]
fn removed_binding_is_stale() {
    let mut g = gestures();
    let (log, handler) = recorder();
    let tap = g.tap(1, TapOptions::new(), handler).unwrap();
    let (_, other_handler) = recorder();
    let other = g.tap(1, TapOptions::new(), other_handler).unwrap();
    let recognizer = g.recognizer(tap).unwrap();

    tap.remove(&mut g).unwrap();
    assert!(!g.is_registered(tap));
    assert!(!g.platform().attached.contains_key(&recognizer));

    let stale = GestureError::StaleHandle(tap.id());
    assert_eq!(tap.enable(&mut g).unwrap_err(), stale);
    assert_eq!(tap.disable(&mut g).unwrap_err(), stale);
    assert_eq!(tap.remove(&mut g).unwrap_err(), stale);
    assert_eq!(tap.before(other, &mut g).unwrap_err(), stale);
    assert_eq!(other.together_with(tap, &mut g).unwrap_err(), stale);

    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Ignored);
    assert!(log.borrow().is_empty());
}

#[test]
fn remove_all_gestures_clears_one_view() {
    let mut g = gestures();
    let (_, a) = recorder();
    let (_, b) = recorder();
    let (_, c) = recorder();
    let pinch = g.pinch(1, a).unwrap();
    let rotation = g.rotation(1, b).unwrap();
    let elsewhere = g.long_press(2, LongPressOptions::new(), c).unwrap();

    assert_eq!(g.remove_all_gestures(1), 2);
    assert!(!g.is_registered(pinch));
    assert!(!g.is_registered(rotation));
    assert!(g.is_registered(elsewhere));
    assert_eq!(g.len(), 1);

    assert_eq!(g.remove_all_gestures(1), 0);
    assert_eq!(g.remove_all_gestures(99), 0);
}

#[test]
fn swipe_before_pan_gives_swipe_first_refusal() {
    let mut g = gestures();
    let (swipe_log, swipe_handler) = recorder();
    let (_, pan_handler) = recorder();
    let swipe = g
        .swipe(
            1,
            SwipeOptions::new()
                .direction(SwipeDirection::LEFT)
                .minimum_distance(50.0),
            swipe_handler,
        )
        .unwrap();
    let pan = g.pan(1, PanOptions::new(), pan_handler).unwrap();
    swipe.before(pan, &mut g).unwrap();

    let s = g.recognizer(swipe).unwrap();
    let p = g.recognizer(pan).unwrap();
    assert!(!g.should_require_failure_of(s, p));
    assert!(g.should_require_failure_of(p, s));
    assert!(g.should_be_required_to_fail_by(s, p));
    assert!(!g.should_be_required_to_fail_by(p, s));
    assert!(!g.should_recognize_simultaneously(s, p));

    // The platform recognizes the 60 point leftward drag as a swipe.
    g.platform_mut().translation = Vec2::new(-60.0, 0.0);
    assert_eq!(fire(&mut g, s, GestureState::Ended), Outcome::Handled);
    assert!(swipe_log.borrow()[0].ended());
}

#[test]
fn after_is_before_seen_from_the_other_side() {
    let mut g = gestures();
    let (_, a) = recorder();
    let (_, b) = recorder();
    let tap = g.tap(1, TapOptions::new(), a).unwrap();
    let double = g.doubletap(1, b).unwrap();
    tap.after(double, &mut g).unwrap();

    let t = g.recognizer(tap).unwrap();
    let d = g.recognizer(double).unwrap();
    assert!(g.should_require_failure_of(t, d));
    assert!(!g.should_require_failure_of(d, t));
}

#[test]
fn together_with_is_symmetric() {
    let mut g = gestures();
    let (_, a) = recorder();
    let (_, b) = recorder();
    let pinch = g.pinch(1, a).unwrap();
    let pan = g.pan(2, PanOptions::new(), b).unwrap();
    let (p, q) = (g.recognizer(pinch).unwrap(), g.recognizer(pan).unwrap());
    assert!(!g.should_recognize_simultaneously(p, q));

    pinch.together_with(pan, &mut g).unwrap();
    assert!(g.should_recognize_simultaneously(p, q));
    assert!(g.should_recognize_simultaneously(q, p));
    assert!(!g.should_recognize_simultaneously(p, 999));
}

#[test]
fn kind_policy_applies_to_undeclared_pairs_on_one_view() {
    let mut g = Gestures::with_policy(
        FakePlatform::default(),
        ArbitrationPolicy::new().recognize_simultaneously(|a, b| {
            matches!(
                (a, b),
                (GestureKind::Pinch, GestureKind::Rotation) | (GestureKind::Rotation, GestureKind::Pinch)
            )
        }),
    );
    let (_, a) = recorder();
    let (_, b) = recorder();
    let (_, c) = recorder();
    let pinch = g.pinch(1, a).unwrap();
    let rotation = g.rotation(1, b).unwrap();
    let far_rotation = g.rotation(2, c).unwrap();

    let p = g.recognizer(pinch).unwrap();
    assert!(g.should_recognize_simultaneously(p, g.recognizer(rotation).unwrap()));
    assert!(!g.should_recognize_simultaneously(p, g.recognizer(far_rotation).unwrap()));
}

#[test]
fn force_press_respects_threshold() {
    let mut g = gestures();
    let (log, handler) = recorder();
    let press = g
        .force_press(1, ForcePressOptions::new(0.4), handler)
        .unwrap();
    let recognizer = g.recognizer(press).unwrap();

    g.platform_mut().force = Some(TouchForce {
        force: 3.0,
        maximum_possible_force: 6.0,
    });
    assert_eq!(fire(&mut g, recognizer, GestureState::Changed), Outcome::Handled);
    {
        let log = log.borrow();
        let force = log[0].force().unwrap();
        assert!((0.4..=1.0).contains(&force));
        assert!(log[0].changed());
    }

    g.platform_mut().force = Some(TouchForce {
        force: 1.8,
        maximum_possible_force: 6.0,
    });
    assert_eq!(
        fire(&mut g, recognizer, GestureState::Changed),
        Outcome::BelowThreshold
    );

    g.platform_mut().force = None;
    assert_eq!(
        fire(&mut g, recognizer, GestureState::Changed),
        Outcome::BelowThreshold
    );
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn handler_failure_leaves_registry_intact() {
    let mut g = gestures();
    let failing = g
        .tap(1, TapOptions::new(), |_| Err(Boom.into()))
        .unwrap();
    let (log, handler) = recorder();
    let healthy = g.tap(1, TapOptions::new(), handler).unwrap();

    let f = g.recognizer(failing).unwrap();
    let h = g.recognizer(healthy).unwrap();
    assert_eq!(fire(&mut g, f, GestureState::Ended), Outcome::HandlerFailed);
    assert!(g.is_registered(failing));
    assert_eq!(g.len(), 2);

    assert_eq!(fire(&mut g, h, GestureState::Ended), Outcome::Handled);
    assert_eq!(fire(&mut g, f, GestureState::Ended), Outcome::HandlerFailed);
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn invalid_configuration_creates_no_recognizer() {
    let mut g = gestures();
    let (_, a) = recorder();
    let (_, b) = recorder();
    let (_, c) = recorder();

    let err = g
        .force_press(1, ForcePressOptions::new(1.5), a)
        .unwrap_err();
    assert!(matches!(
        err,
        GestureError::InvalidConfiguration {
            option: "threshold",
            ..
        }
    ));
    assert!(g.tap(1, TapOptions::new().taps(0), b).is_err());
    assert!(g.edge_pan(1, EdgePanOptions::new(Edges::empty()), c).is_err());

    assert!(g.platform().created.is_empty());
    assert!(g.platform().touch_enabled.is_empty());
    assert!(g.is_empty());
}

#[test]
fn in_process_drag_delivers_the_same_object() {
    let mut g = gestures();
    let original: Rc<dyn Any> = Rc::new(String::from("card"));
    let received: Rc<RefCell<Vec<(Payload, Option<View>, View)>>> = Rc::default();
    let sink = Rc::clone(&received);

    let source = g
        .drag(
            1,
            DragSource::new(Payload::Object(Rc::clone(&original))),
            LongPressOptions::new(),
        )
        .unwrap();
    g.drop(
        2,
        DropTarget::new(AcceptRule::ByType(PayloadKind::of::<String>()), move |event| {
            sink.borrow_mut()
                .push((event.payload, event.source, event.target));
            Ok(())
        }),
    )
    .unwrap();

    let recognizer = g.recognizer(source).unwrap();
    assert_eq!(fire(&mut g, recognizer, GestureState::Began), Outcome::Dragging);
    assert_eq!(g.drag_phase(), DragPhase::Dragging);
    assert!(g.platform().offered.is_empty());

    g.platform_mut().under_touch = Some(2);
    assert_eq!(fire(&mut g, recognizer, GestureState::Changed), Outcome::Dragging);
    assert_eq!(g.platform().affordances, [(2, true)]);

    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Dropped);
    assert_eq!(g.drag_phase(), DragPhase::Dropped);

    let received = received.borrow();
    let (payload, source_view, target_view) = &received[0];
    let Payload::Object(object) = payload else {
        panic!("expected an object payload");
    };
    assert!(Rc::ptr_eq(object, &original));
    assert_eq!(*source_view, Some(1));
    assert_eq!(*target_view, 2);
}

#[test]
fn rejected_or_cancelled_drags_invoke_no_handler() {
    let mut g = gestures();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let source = g
        .drag(1, DragSource::new("text"), LongPressOptions::new())
        .unwrap();
    g.drop(
        2,
        DropTarget::new(AcceptRule::ByType(PayloadKind::Image), move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        }),
    )
    .unwrap();
    let recognizer = g.recognizer(source).unwrap();

    fire(&mut g, recognizer, GestureState::Began);
    g.platform_mut().under_touch = Some(2);
    fire(&mut g, recognizer, GestureState::Changed);
    assert_eq!(g.platform().affordances, [(2, false)]);
    assert_eq!(
        fire(&mut g, recognizer, GestureState::Ended),
        Outcome::DragCancelled
    );

    fire(&mut g, recognizer, GestureState::Began);
    assert_eq!(
        fire(&mut g, recognizer, GestureState::Cancelled),
        Outcome::DragCancelled
    );
    assert_eq!(g.drag_phase(), DragPhase::Cancelled);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn disabled_drop_target_takes_nothing() {
    let mut g = gestures();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let source = g
        .drag(1, DragSource::new("text"), LongPressOptions::new())
        .unwrap();
    let target = g
        .drop(
            2,
            DropTarget::new(AcceptRule::ByType(PayloadKind::Any), move |_| {
                *counter.borrow_mut() += 1;
                Ok(())
            }),
        )
        .unwrap();
    target.disable(&mut g).unwrap();
    let recognizer = g.recognizer(source).unwrap();

    fire(&mut g, recognizer, GestureState::Began);
    g.platform_mut().under_touch = Some(2);
    assert_eq!(
        fire(&mut g, recognizer, GestureState::Ended),
        Outcome::DragCancelled
    );

    target.remove(&mut g).unwrap();
    let item = EncodedItem::encode(&Payload::text("late")).unwrap();
    assert_eq!(g.on_external_drop(2, &item), Outcome::DragCancelled);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn cross_process_text_round_trips() {
    let mut g = gestures();
    let source = g
        .drag(
            1,
            DragSource::new("hello, world").allow_others(true),
            LongPressOptions::new(),
        )
        .unwrap();
    let recognizer = g.recognizer(source).unwrap();
    fire(&mut g, recognizer, GestureState::Began);
    let offered = g.platform().offered[0].clone();

    let received: Rc<RefCell<Vec<(String, Option<View>)>>> = Rc::default();
    let sink = Rc::clone(&received);
    g.drop(
        5,
        DropTarget::new(AcceptRule::ByType(PayloadKind::Text), move |event| {
            let text = event.payload.as_text().unwrap_or_default().to_owned();
            sink.borrow_mut().push((text, event.source));
            Ok(())
        }),
    )
    .unwrap();

    assert_eq!(g.on_external_drop(5, &offered), Outcome::Dropped);
    assert_eq!(
        *received.borrow(),
        [(String::from("hello, world"), None)]
    );
}

#[test]
fn replacing_the_close_gesture() {
    let mut g = gestures();
    let missing = g.replace_close_gesture(1, RecognizerConfig::Swipe(SwipeOptions::new()));
    assert_eq!(missing.unwrap_err(), GestureError::CloseGestureUnavailable);
    assert!(g.platform().created.is_empty());

    g.platform_mut().close = Some(CloseGesture {
        container: 100,
        recognizer: 500,
    });
    let close = g
        .replace_close_gesture(
            1,
            RecognizerConfig::Swipe(SwipeOptions::new().direction(SwipeDirection::DOWN)),
        )
        .unwrap();
    let recognizer = g.recognizer(close).unwrap();
    assert_eq!(g.platform().attached.get(&recognizer), Some(&100));
    assert_eq!(g.platform().enabled_calls, [(500, false)]);

    assert_eq!(fire(&mut g, recognizer, GestureState::Began), Outcome::Handled);
    assert!(g.platform().dismissed.is_empty());
    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Dismissed);
    assert_eq!(g.platform().dismissed, [100]);

    close.remove(&mut g).unwrap();
    assert_eq!(g.platform().enabled_calls, [(500, false), (500, true)]);
}

#[test]
fn disable_swipe_to_close_reports_whether_found() {
    let mut g = gestures();
    assert!(!g.disable_swipe_to_close(1));

    g.platform_mut().close = Some(CloseGesture {
        container: 100,
        recognizer: 500,
    });
    assert!(g.disable_swipe_to_close(1));
    assert_eq!(g.platform().enabled_calls, [(500, false)]);
}

#[test]
fn unknown_recognizers_are_ignored() {
    let mut g = gestures();
    assert_eq!(g.on_action(42), Outcome::Ignored);
    assert!(!g.should_require_failure_of(1, 2));
    assert!(!g.should_be_required_to_fail_by(1, 2));
}

fn counting_target(accept: AcceptRule) -> (Rc<RefCell<u32>>, DropTarget<View>) {
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    let target = DropTarget::new(accept, move |_| {
        *counter.borrow_mut() += 1;
        Ok(())
    });
    (calls, target)
}

fn object_drag(g: &mut Gestures<FakePlatform>, original: &Rc<dyn Any>) -> (Binding, Rec) {
    let source = g
        .drag(
            1,
            DragSource::new(Payload::Object(Rc::clone(original))),
            LongPressOptions::new(),
        )
        .unwrap();
    let recognizer = g.recognizer(source).unwrap();
    assert_eq!(fire(g, recognizer, GestureState::Began), Outcome::Dragging);
    // original + drag source + session
    assert_eq!(Rc::strong_count(original), 3);
    (source, recognizer)
}

#[test]
fn disabling_the_drag_source_cancels_the_drag() {
    let mut g = gestures();
    let (calls, target) = counting_target(AcceptRule::ByType(PayloadKind::Any));
    g.drop(2, target).unwrap();
    let original: Rc<dyn Any> = Rc::new(7_u8);
    let (source, recognizer) = object_drag(&mut g, &original);

    source.disable(&mut g).unwrap();
    assert_eq!(g.drag_phase(), DragPhase::Cancelled);
    assert_eq!(Rc::strong_count(&original), 2);

    g.platform_mut().under_touch = Some(2);
    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Disabled);
    assert_eq!(*calls.borrow(), 0);

    source.enable(&mut g).unwrap();
    assert_eq!(fire(&mut g, recognizer, GestureState::Began), Outcome::Dragging);
    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Dropped);
    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn removing_the_drag_source_releases_the_payload() {
    let mut g = gestures();
    let original: Rc<dyn Any> = Rc::new(7_u8);
    let (source, recognizer) = object_drag(&mut g, &original);

    source.remove(&mut g).unwrap();
    assert_eq!(g.drag_phase(), DragPhase::Cancelled);
    assert_eq!(Rc::strong_count(&original), 1);
    assert_eq!(g.on_action(recognizer), Outcome::Ignored);
}

#[test]
fn remove_all_gestures_on_the_source_view_ends_the_drag() {
    let mut g = gestures();
    let (_, handler) = recorder();
    let original: Rc<dyn Any> = Rc::new(7_u8);
    let (_, _) = object_drag(&mut g, &original);
    g.tap(1, TapOptions::new(), handler).unwrap();

    assert_eq!(g.remove_all_gestures(1), 2);
    assert_eq!(g.drag_phase(), DragPhase::Cancelled);
    assert_eq!(Rc::strong_count(&original), 1);
    assert!(g.is_empty());
}

#[test]
fn disabling_another_drag_source_leaves_the_drag_running() {
    let mut g = gestures();
    let idle = g
        .drag(3, DragSource::new("idle"), LongPressOptions::new())
        .unwrap();
    let original: Rc<dyn Any> = Rc::new(7_u8);
    let _ = object_drag(&mut g, &original);

    idle.disable(&mut g).unwrap();
    idle.remove(&mut g).unwrap();
    assert_eq!(g.drag_phase(), DragPhase::Dragging);
    assert_eq!(Rc::strong_count(&original), 3);
}

#[test]
fn registering_a_second_drop_target_replaces_the_first() {
    let mut g = gestures();
    let (first_calls, first) = counting_target(AcceptRule::ByType(PayloadKind::Any));
    let (second_calls, second) = counting_target(AcceptRule::ByType(PayloadKind::Any));
    let first = g.drop(2, first).unwrap();
    let second = g.drop(2, second).unwrap();

    assert!(!g.is_registered(first));
    assert!(g.is_registered(second));
    assert!(matches!(
        first.disable(&mut g),
        Err(GestureError::StaleHandle(_))
    ));

    let source = g
        .drag(1, DragSource::new("text"), LongPressOptions::new())
        .unwrap();
    let recognizer = g.recognizer(source).unwrap();
    fire(&mut g, recognizer, GestureState::Began);
    g.platform_mut().under_touch = Some(2);
    assert_eq!(fire(&mut g, recognizer, GestureState::Ended), Outcome::Dropped);

    assert_eq!(*first_calls.borrow(), 0);
    assert_eq!(*second_calls.borrow(), 1);
    assert_eq!(g.len(), 2);
}

#[test]
fn reused_recognizer_id_evicts_the_previous_binding() {
    let mut g = gestures();
    let (calls, target) = counting_target(AcceptRule::ByType(PayloadKind::Any));
    let old = g.drop(2, target).unwrap();
    let reused = g.recognizer(old).unwrap();

    g.platform_mut().reuse = Some(reused);
    let (log, handler) = recorder();
    let tap = g.tap(3, TapOptions::new(), handler).unwrap();

    assert!(!g.is_registered(old));
    assert_eq!(g.recognizer(tap), Ok(reused));
    assert_eq!(g.platform().attached.get(&reused), Some(&3));
    assert_eq!(g.len(), 1);

    let item = EncodedItem::encode(&Payload::text("late")).unwrap();
    assert_eq!(g.on_external_drop(2, &item), Outcome::DragCancelled);
    assert_eq!(*calls.borrow(), 0);

    assert_eq!(fire(&mut g, reused, GestureState::Ended), Outcome::Handled);
    assert_eq!(log.borrow().len(), 1);
}
