//! End-to-end gestures through the directive, the simulated engine and the
//! in-memory document.

use std::cell::RefCell;
use std::rc::Rc;

use hubsort_core::{
    BindingTarget, EngineEventKind, GroupOptions, InputEvent, MoveEvent, MoveResult, OptionName,
    OptionValue, Pull, PullCheckError, PullContext, PullMode, Put, SequenceBindingGroup, SortableEvent,
    SortableOptions, shared_list,
};
use hubsort_harness::{
    Board, CallbackOrder, GestureOutcome, NodeId, SimulatedEngine, SimulatedFactory,
};
use hubsort_runtime::{
    DragEngine, EngineCallbacks, EngineHandle, FormArray, FormControl, GesturePhase, Observable,
    SetupError, SortableConfig, SortableDirective, SortableInput,
};

type Region<T> = SortableDirective<T, SimulatedFactory>;

fn mounted<T: Clone + 'static>(
    board: &Board<T>,
    labels: &[&str],
    items: impl Into<SortableInput<T>>,
    options: SortableOptions,
) -> (Region<T>, EngineHandle<SimulatedEngine>) {
    let host = board.list(labels);
    let region = board.region(host);
    region.set_items(items);
    region.set_options(options);
    region.init().unwrap();
    board.render();
    let engine = region.engine().expect("engine created after render");
    (region, engine)
}

fn group(name: &str) -> SortableOptions {
    SortableOptions::default().with_group(name)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn container(engine: &EngineHandle<SimulatedEngine>) -> NodeId {
    engine.borrow().container()
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[test]
fn update_moves_item_within_region() {
    let board = Board::<i32>::new();
    let items = shared_list([1, 2, 3, 4, 5]);
    let (region, engine) = mounted(
        &board,
        &["1", "2", "3", "4", "5"],
        Rc::clone(&items),
        SortableOptions::default(),
    );

    let outcome = board.simulator().reorder(&engine, 0, 3);

    assert_eq!(outcome, GestureOutcome::Sorted);
    assert_eq!(*items.borrow(), vec![2, 3, 4, 1, 5]);
    assert_eq!(
        board.dom.child_texts(container(&engine)),
        ["2", "3", "4", "1", "5"]
    );
    assert_eq!(region.phase(), GesturePhase::Idle);
    assert!(board.service.handoff().is_idle());
}

#[test]
fn drop_at_origin_changes_nothing() {
    let board = Board::<i32>::new();
    let items = shared_list([1, 2, 3]);
    let (region, engine) = mounted(&board, &["1", "2", "3"], Rc::clone(&items), group("g"));
    let updates = Rc::new(RefCell::new(0u32));
    let u = Rc::clone(&updates);
    let _sub = region.outputs().update.subscribe(move |_| *u.borrow_mut() += 1);

    assert_eq!(board.simulator().reorder(&engine, 1, 1), GestureOutcome::Unchanged);
    assert_eq!(*items.borrow(), vec![1, 2, 3]);
    assert_eq!(*updates.borrow(), 0);
}

#[test]
fn draggable_indexes_skip_non_draggable_siblings() {
    let board = Board::<i32>::new();
    let host = board.list(&["title", "1", "2", "3"]);
    let rows = board.dom.children(host);
    board.dom.add_class(rows[0], "header");
    for &row in &rows[1..] {
        board.dom.add_class(row, "item");
    }

    let items = shared_list([1, 2, 3]);
    let region = board.region(host);
    region.set_items(Rc::clone(&items));
    region.set_option(OptionName::Draggable, Some(OptionValue::Text(".item".into())))
        .unwrap();
    region.init().unwrap();
    board.render();
    let engine = region.engine().unwrap();

    // DOM positions 1 -> 3 are draggable positions 0 -> 2.
    board.simulator().reorder(&engine, 1, 3);
    assert_eq!(*items.borrow(), vec![2, 3, 1]);
}

#[test]
fn filtered_items_do_not_drag() {
    let board = Board::<i32>::new();
    let items = shared_list([1, 2]);
    let options = SortableOptions {
        filter: Some(hubsort_core::Filter::Selector("li".into())),
        ..SortableOptions::default()
    };
    let (region, engine) = mounted(&board, &["1", "2"], Rc::clone(&items), options);
    let filtered = Rc::new(RefCell::new(Vec::new()));
    let f = Rc::clone(&filtered);
    let _sub = region
        .outputs()
        .filter
        .subscribe(move |e: &SortableEvent<NodeId>| f.borrow_mut().push(e.item));

    assert_eq!(board.simulator().reorder(&engine, 0, 1), GestureOutcome::Filtered);
    assert_eq!(*items.borrow(), vec![1, 2]);
    assert_eq!(filtered.borrow().len(), 1);
}

#[test]
fn unbound_region_forwards_events_only() {
    let board = Board::<i32>::new();
    let (region, engine) = mounted(
        &board,
        &["a", "b"],
        SortableInput::Unbound,
        SortableOptions::default(),
    );
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut subs = Vec::new();
    for kind in [EngineEventKind::Update, EngineEventKind::End] {
        let s = Rc::clone(&seen);
        subs.push(region.outputs().event(kind).unwrap().subscribe(
            move |e: &SortableEvent<NodeId>| {
                s.borrow_mut().push((kind, e.old_index, e.new_index));
            },
        ));
    }

    board.simulator().reorder(&engine, 0, 1);
    assert_eq!(
        *seen.borrow(),
        vec![
            (EngineEventKind::Update, Some(0), Some(1)),
            (EngineEventKind::End, Some(0), Some(1)),
        ]
    );
    assert_eq!(board.dom.child_texts(container(&engine)), ["b", "a"]);
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

#[test]
fn transfer_moves_item_in_either_callback_order() {
    for order in [CallbackOrder::AddFirst, CallbackOrder::RemoveFirst] {
        let board = Board::<char>::new();
        let left = shared_list(['a', 'b', 'c']);
        let right = shared_list(['x']);
        let (_l, from) = mounted(&board, &["a", "b", "c"], Rc::clone(&left), group("board"));
        let (_r, to) = mounted(&board, &["x"], Rc::clone(&right), group("board"));

        let outcome = board.simulator().transfer(&from, &to, 1, 0, order);

        assert_eq!(
            outcome,
            GestureOutcome::Transferred {
                mode: PullMode::Move
            },
            "{order:?}"
        );
        assert_eq!(*left.borrow(), vec!['a', 'c'], "{order:?}");
        assert_eq!(*right.borrow(), vec!['b', 'x'], "{order:?}");
        assert!(board.service.handoff().is_idle(), "{order:?}");
    }
}

#[test]
fn add_is_emitted_after_injection() {
    let board = Board::<char>::new();
    let left = shared_list(['a']);
    let right = shared_list(Vec::<char>::new());
    let (_l, from) = mounted(&board, &["a"], Rc::clone(&left), group("g"));
    let (dest, to) = mounted(&board, &[], Rc::clone(&right), group("g"));

    let seen_on_add = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen_on_add);
    let r = Rc::clone(&right);
    let _sub = dest
        .outputs()
        .add
        .subscribe(move |_| s.borrow_mut().push(r.borrow().clone()));

    board
        .simulator()
        .transfer(&from, &to, 0, 0, CallbackOrder::AddFirst);
    assert_eq!(*seen_on_add.borrow(), vec![vec!['a']]);
}

#[test]
fn clone_drag_copies_into_destination_and_restores_source() {
    for order in [CallbackOrder::AddFirst, CallbackOrder::RemoveFirst] {
        let board = Board::<String>::new();
        let source = shared_list(strings(&["p", "q"]));
        let dest = shared_list(strings(&["z"]));
        let cloning = SortableOptions::default()
            .with_group(GroupOptions::named("g").with_pull(Pull::Clone));
        let (src_region, from) = mounted(&board, &["p", "q"], Rc::clone(&source), cloning);
        src_region.set_clone_function(|x: &String| format!("{x}-copy"));
        let (_dst_region, to) = mounted(&board, &["z"], Rc::clone(&dest), group("g"));
        let original = board.dom.children(container(&from))[0];

        let outcome = board.simulator().transfer(&from, &to, 0, 0, order);

        assert_eq!(
            outcome,
            GestureOutcome::Transferred {
                mode: PullMode::Clone
            }
        );
        assert_eq!(*dest.borrow(), strings(&["p-copy", "z"]), "{order:?}");
        assert_eq!(*source.borrow(), strings(&["p", "q"]), "{order:?}");

        // The engine's DOM swap is undone: bound data renders the copy.
        assert_eq!(board.dom.child_texts(container(&from)), ["p", "q"]);
        assert_eq!(board.dom.children(container(&from))[0], original);
        assert_eq!(board.dom.child_texts(container(&to)), ["z"]);
    }
}

#[test]
fn predicate_decides_clone_per_drag() {
    let board = Board::<i32>::new();
    let source = shared_list([10, 20]);
    let dest = shared_list(Vec::<i32>::new());
    // Clone the first row, move the rest.
    let pull = Pull::Decide(Rc::new(|ctx: &PullContext<'_>| {
        Ok(if ctx.old_index == Some(0) {
            PullMode::Clone
        } else {
            PullMode::Move
        })
    }));
    let options = SortableOptions::default().with_group(GroupOptions::named("g").with_pull(pull));
    let (_s, from) = mounted(&board, &["10", "20"], Rc::clone(&source), options);
    let (_d, to) = mounted(&board, &[], Rc::clone(&dest), group("g"));
    let sim = board.simulator();

    sim.transfer(&from, &to, 0, 0, CallbackOrder::AddFirst);
    assert_eq!(*source.borrow(), vec![10, 20]);
    assert_eq!(*dest.borrow(), vec![10]);

    sim.transfer(&from, &to, 1, 1, CallbackOrder::AddFirst);
    assert_eq!(*source.borrow(), vec![10]);
    assert_eq!(*dest.borrow(), vec![10, 20]);
}

#[test]
fn failing_pull_predicate_means_move() {
    let board = Board::<i32>::new();
    let source = shared_list([1, 2]);
    let dest = shared_list(Vec::<i32>::new());
    let pull = Pull::Decide(Rc::new(|_: &PullContext<'_>| Err(PullCheckError::new("lookup failed"))));
    let options = SortableOptions::default().with_group(GroupOptions::named("g").with_pull(pull));
    let (_s, from) = mounted(&board, &["1", "2"], Rc::clone(&source), options);
    let (_d, to) = mounted(&board, &[], Rc::clone(&dest), group("g"));

    let (src, dst) = (container(&from), container(&to));
    let item = board.dom.children(src)[0];
    let event = SortableEvent::new(src, dst, item).with_indexes(0, 0);
    let sim = board.simulator();
    sim.fire(&from, EngineEventKind::Remove, &event);
    sim.fire(&to, EngineEventKind::Add, &event);
    sim.fire(&from, EngineEventKind::End, &event);

    assert_eq!(*source.borrow(), vec![2]);
    assert_eq!(*dest.borrow(), vec![1]);
}

#[test]
fn multi_column_regions_move_rows_together() {
    let board = Board::<String>::new();
    let names = shared_list(strings(&["ann", "bob"]));
    let ages = shared_list(strings(&["31", "42"]));
    let dest_names = shared_list(strings(&["cy"]));
    let dest_ages = shared_list(strings(&["27"]));
    let columns = |a: &Rc<RefCell<Vec<String>>>, b: &Rc<RefCell<Vec<String>>>| {
        SequenceBindingGroup::<String>::from_targets([
            Rc::clone(a) as Rc<dyn BindingTarget<String>>,
            Rc::clone(b) as Rc<dyn BindingTarget<String>>,
        ])
    };

    let (_s, from) = mounted(&board, &["ann", "bob"], columns(&names, &ages), group("rows"));
    let (_d, to) = mounted(&board, &["cy"], columns(&dest_names, &dest_ages), group("rows"));

    board
        .simulator()
        .transfer(&from, &to, 0, 1, CallbackOrder::AddFirst);

    assert_eq!(*names.borrow(), strings(&["bob"]));
    assert_eq!(*ages.borrow(), strings(&["42"]));
    assert_eq!(*dest_names.borrow(), strings(&["cy", "ann"]));
    assert_eq!(*dest_ages.borrow(), strings(&["27", "31"]));
}

#[test]
fn form_controls_keep_identity_across_regions() {
    let board = Board::<FormControl<String>>::new();
    let left = FormArray::from_values(strings(&["a", "b"]));
    let right = FormArray::from_values(strings(&["x"]));
    let moving = left.at(1).unwrap();
    moving.set_value("b!".into());

    let (_l, from) = mounted(&board, &["a", "b"], left.clone(), group("f"));
    let (_r, to) = mounted(&board, &["x"], right.clone(), group("f"));
    board
        .simulator()
        .transfer(&from, &to, 1, 0, CallbackOrder::AddFirst);

    assert_eq!(left.values(), strings(&["a"]));
    assert_eq!(right.values(), strings(&["b!", "x"]));
    assert_eq!(right.at(0).unwrap(), moving);
    assert!(right.at(0).unwrap().is_dirty());
}

#[test]
fn signal_subscribers_hear_one_update_per_gesture() {
    let board = Board::<i32>::new();
    let signal = Observable::new(vec![1, 2, 3]);
    let heard = Rc::new(RefCell::new(Vec::new()));
    let h = Rc::clone(&heard);
    let _sub = signal.subscribe(move |v: &Vec<i32>| h.borrow_mut().push(v.clone()));
    let (_r, engine) = mounted(
        &board,
        &["1", "2", "3"],
        signal.clone(),
        SortableOptions::default(),
    );

    board.simulator().reorder(&engine, 2, 0);

    assert_eq!(signal.get(), vec![3, 1, 2]);
    assert_eq!(signal.writes(), 2, "extract and inject are two writes");
    assert_eq!(*heard.borrow(), vec![vec![3, 1, 2]]);
}

// ---------------------------------------------------------------------------
// Group rules and move handlers
// ---------------------------------------------------------------------------

#[test]
fn closed_destination_rejects_the_drop() {
    let board = Board::<i32>::new();
    let left = shared_list([1]);
    let right = shared_list([2]);
    let closed = SortableOptions::default()
        .with_group(GroupOptions::named("g").with_put(Put::Allow(false)));
    let (_l, from) = mounted(&board, &["1"], Rc::clone(&left), group("g"));
    let (_r, to) = mounted(&board, &["2"], Rc::clone(&right), closed);

    let outcome = board
        .simulator()
        .transfer(&from, &to, 0, 0, CallbackOrder::AddFirst);
    assert_eq!(outcome, GestureOutcome::Rejected);
    assert_eq!(*left.borrow(), vec![1]);
    assert_eq!(*right.borrow(), vec![2]);
}

#[test]
fn different_group_names_do_not_exchange() {
    let board = Board::<i32>::new();
    let (_l, from) = mounted(&board, &["1"], shared_list([1]), group("a"));
    let (_r, to) = mounted(&board, &[], shared_list(Vec::<i32>::new()), group("b"));
    assert_eq!(
        board
            .simulator()
            .transfer(&from, &to, 0, 0, CallbackOrder::AddFirst),
        GestureOutcome::Rejected
    );
}

#[test]
fn move_handler_can_cancel_and_sees_raw_input() {
    let board = Board::<i32>::new();
    let left = shared_list([1, 2]);
    let right = shared_list([3]);
    let (source, from) = mounted(&board, &["1", "2"], Rc::clone(&left), group("g"));
    let (_r, to) = mounted(&board, &["3"], Rc::clone(&right), group("g"));

    let mut handlers = EngineCallbacks::<NodeId>::default();
    handlers.on_move = Some(Rc::new(|_: &MoveEvent<NodeId>, _: &InputEvent| {
        MoveResult::Cancel
    }));
    source.set_handlers(handlers);
    let raw = Rc::new(RefCell::new(Vec::new()));
    let r = Rc::clone(&raw);
    let _sub = source
        .outputs()
        .moved
        .subscribe(move |payload| r.borrow_mut().push(payload.original));

    let input = InputEvent::pointer(12.0, 34.0);
    let outcome = board.simulator().with_input(input).transfer(
        &from,
        &to,
        0,
        0,
        CallbackOrder::AddFirst,
    );

    assert_eq!(outcome, GestureOutcome::Cancelled);
    assert_eq!(*left.borrow(), vec![1, 2]);
    assert_eq!(*right.borrow(), vec![3]);
    assert_eq!(*raw.borrow(), vec![input]);
}

#[test]
fn user_handler_runs_before_output_inside_the_zone() {
    let board = Board::<i32>::new();
    let (region, engine) = mounted(
        &board,
        &["1", "2"],
        shared_list([1, 2]),
        SortableOptions::default(),
    );
    let log = Rc::new(RefCell::new(Vec::new()));

    let mut handlers = EngineCallbacks::<NodeId>::default();
    let l = Rc::clone(&log);
    let zone = Rc::clone(&board.zone);
    handlers.on_update = Some(Rc::new(move |_: &SortableEvent<NodeId>| {
        l.borrow_mut().push(("handler", zone.is_inside()));
    }));
    region.set_handlers(handlers);
    let l = Rc::clone(&log);
    let zone = Rc::clone(&board.zone);
    let _sub = region
        .outputs()
        .update
        .subscribe(move |_| l.borrow_mut().push(("output", zone.is_inside())));

    let before = board.zone.entries();
    board.simulator().reorder(&engine, 0, 1);

    assert_eq!(*log.borrow(), vec![("handler", true), ("output", true)]);
    // choose, start, change, unchoose, update, sort, end, plus move
    assert_eq!(board.zone.entries() - before, 8);
}

// ---------------------------------------------------------------------------
// Gesture end
// ---------------------------------------------------------------------------

#[test]
fn aborted_gesture_leaves_data_and_slot_untouched() {
    let board = Board::<i32>::new();
    let items = shared_list([1, 2, 3]);
    let (region, engine) = mounted(&board, &["1", "2", "3"], Rc::clone(&items), group("g"));

    assert_eq!(board.simulator().abort(&engine, 1), GestureOutcome::Unchanged);
    assert_eq!(*items.borrow(), vec![1, 2, 3]);
    assert_eq!(region.phase(), GesturePhase::Idle);
    assert!(board.service.handoff().is_idle());
}

#[test]
fn phase_follows_the_gesture() {
    let board = Board::<i32>::new();
    let (region, engine) = mounted(
        &board,
        &["1", "2"],
        shared_list([1, 2]),
        SortableOptions::default(),
    );
    let at = container(&engine);
    let item = board.dom.children(at)[0];
    let event = SortableEvent::new(at, at, item).with_indexes(0, 1);
    let sim = board.simulator();

    sim.fire(&engine, EngineEventKind::Choose, &event);
    assert_eq!(region.phase(), GesturePhase::Dragging);
    sim.fire(&engine, EngineEventKind::Update, &event);
    assert_eq!(region.phase(), GesturePhase::Settled);
    sim.fire(&engine, EngineEventKind::End, &event);
    assert_eq!(region.phase(), GesturePhase::Idle);
}

#[test]
fn end_releases_an_unfed_destination() {
    let board = Board::<i32>::new();
    let dest = shared_list([7]);
    let (region, to) = mounted(&board, &["7"], Rc::clone(&dest), group("g"));
    let adds = Rc::new(RefCell::new(0u32));
    let a = Rc::clone(&adds);
    let _sub = region.outputs().add.subscribe(move |_| *a.borrow_mut() += 1);

    let at = container(&to);
    let stray = board.dom.create_element("li");
    let event = SortableEvent::new(at, at, stray).with_indexes(0, 0);
    let sim = board.simulator();
    sim.fire(&to, EngineEventKind::Add, &event);
    assert!(!board.service.handoff().is_idle());
    assert_eq!(*adds.borrow(), 0, "add waits for its payload");

    sim.fire(&to, EngineEventKind::End, &event);
    assert!(board.service.handoff().is_idle());
    assert_eq!(*adds.borrow(), 1);
    assert_eq!(*dest.borrow(), vec![7]);
}

#[test]
fn end_discards_an_unclaimed_payload() {
    let board = Board::<i32>::new();
    let source = shared_list([1, 2]);
    let dest = shared_list([9]);
    let (_s, from) = mounted(&board, &["1", "2"], Rc::clone(&source), group("g"));
    let (_d, to) = mounted(&board, &["9"], Rc::clone(&dest), group("g"));

    let (src, dst) = (container(&from), container(&to));
    let item = board.dom.children(src)[0];
    let event = SortableEvent::new(src, dst, item).with_indexes(0, 0);
    let sim = board.simulator();
    sim.fire(&from, EngineEventKind::Remove, &event);
    sim.fire(&from, EngineEventKind::End, &event);
    assert!(board.service.handoff().is_idle());

    // The next gesture starts clean.
    sim.transfer(&from, &to, 0, 1, CallbackOrder::AddFirst);
    assert_eq!(*source.borrow(), Vec::<i32>::new());
    assert_eq!(*dest.borrow(), vec![9, 2]);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn engine_is_created_after_render_and_announced_once() {
    let board = Board::<i32>::new();
    let host = board.list(&["1"]);
    let region = board.region(host);
    let announced = Rc::new(RefCell::new(0u32));
    let a = Rc::clone(&announced);
    let _sub = region.outputs().init.subscribe(move |_| *a.borrow_mut() += 1);

    region.init().unwrap();
    region.init().unwrap();
    assert!(region.engine().is_none(), "waits for the render");
    assert_eq!(board.render(), 1);

    assert_eq!(board.factory.created(), vec![host]);
    assert_eq!(*announced.borrow(), 1);
    assert!(region.engine().is_some());
}

#[test]
fn container_selector_picks_the_inner_list() {
    let board = Board::<i32>::new();
    let host = board.dom.create_element("section");
    let rows = board.list(&["1"]);
    board.dom.add_class(rows, "rows");
    board.dom.append_child(host, rows);

    let region = board.region(host);
    region.set_container(Some(".rows".into()));
    region.init().unwrap();
    board.render();

    assert_eq!(container(&region.engine().unwrap()), rows);
}

#[test]
fn missing_container_creates_no_engine() {
    let board = Board::<i32>::new();
    let host = board.list(&["1"]);
    let region = board.region(host);
    region.set_container(Some(".rows".into()));

    let err = region.init().unwrap_err();
    assert_eq!(
        err,
        SetupError::ContainerNotFound {
            selector: ".rows".into()
        }
    );
    assert_eq!(region.setup_error(), Some(err.clone()));
    assert_eq!(region.init(), Err(err));
    assert_eq!(board.render(), 0);
    assert!(region.engine().is_none());
    assert!(board.factory.created().is_empty());
}

#[test]
fn corrected_container_selector_allows_setup() {
    let board = Board::<i32>::new();
    let region = board.region(board.list(&["1"]));
    region.set_container(Some(".rows".into()));
    assert!(region.init().is_err());

    region.set_container(None);
    assert_eq!(region.setup_error(), None);
    region.init().unwrap();
    assert_eq!(board.render(), 1);
    assert!(region.engine().is_some());
}

#[test]
fn server_render_stays_inert() {
    let board = Board::<i32>::new().with_factory(SimulatedFactory::unavailable());
    let host = board.list(&["1"]);
    let region = board.region(host);
    region.set_items(shared_list([1]));

    assert!(region.init().is_ok());
    assert_eq!(board.render(), 0);
    assert!(region.engine().is_none());
    assert!(region.setup_error().is_none());
}

#[test]
fn destroy_is_idempotent_and_runs_on_drop() {
    let board = Board::<i32>::new();
    let items = shared_list([1, 2]);
    let (region, engine) = mounted(&board, &["1", "2"], Rc::clone(&items), group("g"));

    region.destroy();
    region.destroy();
    assert!(engine.borrow().is_destroyed());
    assert!(region.is_destroyed());
    assert!(region.engine().is_none());

    let (second, other) = mounted(&board, &["1", "2"], Rc::clone(&items), group("g"));
    drop(second);
    assert!(other.borrow().is_destroyed());

    // Callbacks held by the engine go quiet once the region is gone.
    board.simulator().reorder(&other, 0, 1);
    assert_eq!(*items.borrow(), vec![1, 2]);
}

#[test]
fn destroy_before_render_prevents_creation() {
    let board = Board::<i32>::new();
    let region = board.region(board.list(&[]));
    region.init().unwrap();
    region.destroy();
    board.render();
    assert!(board.factory.created().is_empty());
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[test]
fn option_layers_merge_into_the_engine() {
    let globals = SortableOptions {
        animation: Some(100),
        ghost_class: Some("ghost".into()),
        ..SortableOptions::default()
    };
    let board = Board::<i32>::new().with_config(SortableConfig::with_globals(globals));
    let host = board.list(&[]);
    let region = board.region(host);
    region.set_options(SortableOptions {
        animation: Some(200),
        delay: Some(5),
        ..SortableOptions::default()
    });
    region.set_option(OptionName::Delay, Some(OptionValue::Int(9))).unwrap();
    region.init().unwrap();
    board.render();

    let engine = region.engine().unwrap();
    let options = engine.borrow().options().clone();
    assert_eq!(options.animation, Some(200));
    assert_eq!(options.ghost_class.as_deref(), Some("ghost"));
    assert_eq!(options.delay, Some(9));
    assert!(engine.borrow().reconfigurations().is_empty());
}

#[test]
fn only_changed_keys_are_pushed() {
    let board = Board::<i32>::new();
    let base = SortableOptions {
        animation: Some(150),
        sort: Some(true),
        ..SortableOptions::default()
    };
    let (region, engine) = mounted(&board, &[], shared_list(Vec::<i32>::new()), base.clone());

    region.set_options(SortableOptions {
        animation: Some(300),
        ..base.clone()
    });
    assert_eq!(
        engine.borrow().reconfigurations(),
        [(OptionName::Animation, Some(OptionValue::Int(300)))]
    );

    region.set_options(SortableOptions {
        animation: Some(300),
        ..base
    });
    assert_eq!(engine.borrow().reconfigurations().len(), 1, "no-op diff");
}

#[test]
fn individual_options_override_and_clear() {
    let board = Board::<i32>::new();
    let options = SortableOptions {
        disabled: Some(false),
        ..SortableOptions::default()
    };
    let (region, engine) = mounted(&board, &["1"], shared_list([1]), options);

    region
        .set_option(OptionName::Disabled, Some(OptionValue::Bool(true)))
        .unwrap();
    assert_eq!(engine.borrow().options().disabled, Some(true));
    assert_eq!(
        board.simulator().reorder(&engine, 0, 0),
        GestureOutcome::NoDrag
    );

    region.set_option(OptionName::Disabled, None).unwrap();
    assert_eq!(engine.borrow().options().disabled, Some(false));

    let err = region
        .set_option(OptionName::Disabled, Some(OptionValue::Int(1)))
        .unwrap_err();
    assert_eq!(err.name, OptionName::Disabled);
    assert_eq!(engine.borrow().reconfigurations().len(), 2);
}

#[test]
fn group_changes_apply_to_the_next_gesture() {
    let board = Board::<i32>::new();
    let source = shared_list([1, 2]);
    let dest = shared_list(Vec::<i32>::new());
    let (src_region, from) = mounted(&board, &["1", "2"], Rc::clone(&source), group("g"));
    let (_d, to) = mounted(&board, &[], Rc::clone(&dest), group("g"));

    src_region
        .set_option(
            OptionName::Group,
            Some(OptionValue::Group(
                GroupOptions::named("g").with_pull(Pull::Clone).into(),
            )),
        )
        .unwrap();
    board
        .simulator()
        .transfer(&from, &to, 0, 0, CallbackOrder::AddFirst);

    assert_eq!(*source.borrow(), vec![1, 2]);
    assert_eq!(*dest.borrow(), vec![1]);
}

#[test]
fn strict_targets_reject_opaque_data() {
    struct Opaque;
    impl BindingTarget<i32> for Opaque {}

    let config = SortableConfig {
        strict_targets: true,
        ..SortableConfig::default()
    };
    let board = Board::<i32>::new().with_config(config);
    let target: Rc<dyn BindingTarget<i32>> = Rc::new(Opaque);
    let (region, engine) = mounted(&board, &["a", "b"], target, SortableOptions::default());
    let updates = Rc::new(RefCell::new(0u32));
    let u = Rc::clone(&updates);
    let _sub = region.outputs().update.subscribe(move |_| *u.borrow_mut() += 1);

    board.simulator().reorder(&engine, 0, 1);
    assert_eq!(*updates.borrow(), 1, "events still flow");
}
