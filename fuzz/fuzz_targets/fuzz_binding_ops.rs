#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use hubsort_core::{BindingTarget, SequenceBindingGroup, shared_list};
use hubsort_runtime::{FormArray, FormControl, Observable};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Insert(i8, u16),
    Remove(i8),
    Get(i8),
    Move(i8, i8),
}

fuzz_target!(|ops: Vec<Op>| {
    // The same operations on each target kind must leave them equal.
    let plain = shared_list(Vec::<u16>::new());
    let signal = Observable::new(Vec::<u16>::new());
    let form = FormArray::<u16>::new(Vec::new());

    let group = SequenceBindingGroup::<u16>::from_targets([
        Rc::clone(&plain) as Rc<dyn BindingTarget<u16>>,
        Rc::new(signal.clone()),
    ]);
    let forms = SequenceBindingGroup::from_targets([
        Rc::new(form.clone()) as Rc<dyn BindingTarget<FormControl<u16>>>
    ]);

    for op in ops.into_iter().take(256) {
        match op {
            Op::Insert(index, value) => {
                let index = isize::from(index);
                group.insert_across_all(index, [value, value]).unwrap();
                forms
                    .insert_across_all(index, [FormControl::new(value)])
                    .unwrap();
            }
            Op::Remove(index) => {
                let removed = group.remove_across_all(isize::from(index));
                let form_removed = forms.remove_across_all(isize::from(index));
                assert_eq!(removed[0], removed[1]);
                assert_eq!(
                    removed[0],
                    form_removed[0].as_ref().map(|control| control.value())
                );
            }
            Op::Get(index) => {
                let got = group.get_across_all(isize::from(index));
                assert_eq!(got[0], got[1]);
            }
            Op::Move(old, new) => {
                group
                    .move_within(isize::from(old), isize::from(new))
                    .unwrap();
                forms
                    .move_within(isize::from(old), isize::from(new))
                    .unwrap();
            }
        }
        assert_eq!(*plain.borrow(), signal.get());
        assert_eq!(*plain.borrow(), form.values());
    }
});
