//! Integration tests for reactive cells and value channels.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use fieldwork::{CellOptions, FieldErrorMap, ReactiveCell, Subscription, ValueChannel};
use proptest::prelude::*;

fn log<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, impl Fn(&T) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    (log, move |v: &T| sink.borrow_mut().push(v.clone()))
}

#[test]
fn test_replay_happens_before_subscribe_returns() {
    let cell = ReactiveCell::new(7);
    let (seen, listener) = log::<i32>();
    let _sub = cell.subscribe(listener);
    assert_eq!(*seen.borrow(), vec![7]);
}

#[test]
fn test_unsubscribe_during_pass_does_not_disturb_others() {
    let cell = ReactiveCell::new(0);
    let order = Rc::new(RefCell::new(Vec::new()));

    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let first_order = Rc::clone(&order);
    let victim_handle = Rc::clone(&victim);
    let _first = cell.subscribe(move |v| {
        first_order.borrow_mut().push(("first", *v));
        if *v == 1 {
            if let Some(sub) = victim_handle.borrow().as_ref() {
                sub.unsubscribe();
            }
        }
    });

    let second_order = Rc::clone(&order);
    *victim.borrow_mut() = Some(cell.subscribe(move |v| second_order.borrow_mut().push(("second", *v))));

    let third_order = Rc::clone(&order);
    let _third = cell.subscribe(move |v| third_order.borrow_mut().push(("third", *v)));

    order.borrow_mut().clear();
    cell.set(1);
    cell.set(2);

    assert_eq!(
        *order.borrow(),
        vec![("first", 1), ("third", 1), ("first", 2), ("third", 2)]
    );
}

#[test]
fn test_subscriber_added_mid_pass_only_gets_replay() {
    let cell = ReactiveCell::new(0);
    let late = Rc::new(RefCell::new(Vec::new()));
    let subs: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

    let handle = cell.clone();
    let late_sink = Rc::clone(&late);
    let subs_sink = Rc::clone(&subs);
    let _adder = cell.subscribe(move |v| {
        if *v == 1 {
            let sink = Rc::clone(&late_sink);
            let sub = handle.subscribe(move |v| sink.borrow_mut().push(*v));
            subs_sink.borrow_mut().push(sub);
        }
    });

    cell.set(1);
    assert_eq!(*late.borrow(), vec![1]);

    cell.set(2);
    assert_eq!(*late.borrow(), vec![1, 2]);
}

#[test]
fn test_reentrant_set_runs_after_current_pass() {
    let cell = ReactiveCell::new(0);
    let order = Rc::new(RefCell::new(Vec::new()));

    let handle = cell.clone();
    let first_order = Rc::clone(&order);
    let _clamp = cell.subscribe(move |v| {
        first_order.borrow_mut().push(("clamp", *v));
        if *v > 10 {
            handle.set(10);
        }
    });

    let second_order = Rc::clone(&order);
    let _view = cell.subscribe(move |v| second_order.borrow_mut().push(("view", *v)));

    order.borrow_mut().clear();
    cell.set(50);

    assert_eq!(cell.get(), 10);
    assert_eq!(
        *order.borrow(),
        vec![("clamp", 50), ("view", 50), ("clamp", 10), ("view", 10)]
    );
}

#[test]
fn test_self_feeding_subscriber_terminates() {
    let cell = ReactiveCell::with_options(0u64, CellOptions::default().with_max_cascade(10));
    let handle = cell.clone();
    let _sub = cell.subscribe(move |v| handle.set(v + 1));

    cell.set(0);
    assert!(cell.get() > 0);
}

#[test]
fn test_cell_recovers_after_listener_panic() {
    let cell = ReactiveCell::new(0);
    let _faulty = cell.subscribe(|v| {
        if *v == 1 {
            panic!("listener failed");
        }
    });
    let (seen, listener) = log::<i32>();
    let _view = cell.subscribe(listener);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cell.set(1)));
    assert!(outcome.is_err());
    assert_eq!(cell.get(), 1);

    cell.set(2);
    cell.set(3);
    assert_eq!(*seen.borrow(), vec![0, 2, 3]);
}

#[test]
fn test_panic_mid_cascade_discards_queued_values() {
    let cell = ReactiveCell::new(0);
    let handle = cell.clone();
    let _feeder = cell.subscribe(move |v| {
        if *v == 1 {
            handle.set(2);
            panic!("listener failed");
        }
    });
    let (seen, listener) = log::<i32>();
    let _view = cell.subscribe(listener);

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| cell.set(1)));
    assert!(outcome.is_err());

    cell.set(5);
    assert_eq!(*seen.borrow(), vec![0, 5]);
    assert_eq!(cell.get(), 5);
}

#[test]
fn test_channel_publishes_error_maps() {
    let channel = ValueChannel::new(FieldErrorMap::new());
    let view = channel.as_read_only();
    let (seen, listener) = log::<FieldErrorMap>();
    let _sub = view.subscribe(listener);

    channel.next([("email", "E1")].into_iter().collect());
    channel.update(|current| {
        let mut next = current.clone();
        next.push("email", "E2");
        next
    });

    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(view.value().get("email"), ["E1", "E2"]);
}

proptest! {
    #[test]
    fn prop_subscriber_sees_replay_plus_every_set(values in proptest::collection::vec(any::<i32>(), 0..20)) {
        let cell = ReactiveCell::new(-1);
        let (seen, listener) = log::<i32>();
        let _sub = cell.subscribe(listener);

        for v in &values {
            cell.set(*v);
        }

        let seen = seen.borrow();
        prop_assert_eq!(seen.len(), values.len() + 1);
        prop_assert_eq!(seen[0], -1);
        prop_assert_eq!(*seen.last().unwrap(), values.last().copied().unwrap_or(-1));
        prop_assert_eq!(&seen[1..], values.as_slice());
    }
}
