use engine::{GameLogic, HeadlessRunner, TimeMachine};

#[test]
fn timemachine_json_roundtrips_history_and_frame() {
    let mut tm = TimeMachine::new(0i32);
    tm.record(1);
    tm.record(2);

    // Rewind and branch so the truncated history is what gets saved.
    tm.rewind(1);
    tm.record(99);

    let json = serde_json::to_string(&tm).expect("serialize timemachine");
    let loaded: TimeMachine<i32> = serde_json::from_str(&json).expect("deserialize timemachine");
    assert_eq!(loaded.frame(), tm.frame());
    assert_eq!(loaded.history(), &[0, 1, 99]);
    assert_eq!(loaded.state(), &99);
}

#[test]
fn rewound_timemachine_keeps_future_until_next_record() {
    let mut tm = TimeMachine::new('a');
    tm.record('b');
    tm.record('c');
    assert_eq!(tm.rewind(5), 0);
    assert_eq!(tm.state(), &'a');
    assert_eq!(tm.len(), 3);

    assert_eq!(tm.forward(1), 1);
    assert_eq!(tm.state_at(2), Some(&'c'));
    assert_eq!(tm.state_at(3), None);
}

struct Echo;

impl GameLogic for Echo {
    type State = Vec<u8>;
    type Input = u8;

    fn initial_state(&self) -> Self::State {
        Vec::new()
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        next.push(input);
        next
    }
}

#[test]
fn replaying_after_rewind_reproduces_states() {
    let mut runner = HeadlessRunner::new(Echo);
    runner.run([1, 2, 3, 4]);
    let first_pass = runner.history().to_vec();

    runner.rewind(2);
    runner.run([3, 4]);
    assert_eq!(runner.history(), first_pass.as_slice());
    assert_eq!(runner.timemachine().frame(), 4);
}
