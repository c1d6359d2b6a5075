#![no_main]

use std::cell::RefCell;
use std::rc::Rc;

use hubsort_runtime::HandoffSlot;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|script: Vec<u8>| {
    // Every offered payload reaches at most one sink, and every sink is
    // fed at most once.
    let slot = HandoffSlot::<u8>::new();
    let delivered = Rc::new(RefCell::new(Vec::new()));

    for (step, byte) in script.into_iter().take(512).enumerate() {
        match byte % 3 {
            0 => {
                slot.offer(vec![Some(byte)]);
            }
            1 => {
                let delivered = Rc::clone(&delivered);
                slot.accept(Box::new(move |payload| {
                    delivered.borrow_mut().push((step, payload));
                }));
            }
            _ => {
                if let Some(hubsort_runtime::StaleHandoff::Sink(sink)) = slot.clear() {
                    sink(Vec::new());
                }
                assert!(slot.is_idle());
            }
        }
    }

    let delivered = delivered.borrow();
    let mut steps: Vec<usize> = delivered.iter().map(|(step, _)| *step).collect();
    steps.dedup();
    assert_eq!(steps.len(), delivered.len(), "a sink ran twice");
});
