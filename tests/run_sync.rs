//! End-to-end scheduler scenarios over realistic narration timelines.

use cuesync::{
    PaddingPolicy, RenderClock, SegmentCallbacks, SegmentRunner, SegmentStatus, SegmentWindow,
    TimelineSpec,
};

fn consume(seconds: f64) -> impl FnMut(&mut RenderClock) -> cuesync::SyncResult<()> {
    move |clock| clock.advance(seconds)
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Route the runner's wait/overrun diagnostics into the test output.
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn underrun_then_exact_then_padding() {
    // Segments [a: 0..5, b: 5..9]; a consumes 4.0 (1.0 corrective wait),
    // b consumes 4.0 (no wait), trailing padding 1.5 -> 10.5 total.
    init_tracing();
    let spec = TimelineSpec::new(vec![
        SegmentWindow::new("a", 0.0, 5.0),
        SegmentWindow::new("b", 5.0, 9.0),
    ])
    .unwrap();

    let mut callbacks = SegmentCallbacks::new();
    callbacks.register("a", consume(4.0));
    callbacks.register("b", consume(4.0));

    let mut clock = RenderClock::new();
    let report = SegmentRunner::default()
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    assert!(approx(report.final_time, 10.5));
    assert!(approx(clock.now(), 10.5));
    assert!(report.on_plan());

    let rows = report.summary();
    assert_eq!(rows[0].status, SegmentStatus::Padded);
    assert!(approx(rows[0].drift, -1.0));
    assert_eq!(rows[1].status, SegmentStatus::OnCue);
    assert!(approx(rows[1].drift, 0.0));
}

#[test]
fn overrun_is_warned_and_padding_still_applies() {
    // Segment [a: 0..3] consuming 3.6 -> overrun 0.6, clock 3.6, padded 5.1.
    init_tracing();
    let spec = TimelineSpec::new(vec![SegmentWindow::new("a", 0.0, 3.0)]).unwrap();

    let mut callbacks = SegmentCallbacks::new();
    callbacks.register("a", consume(3.6));

    let mut clock = RenderClock::new();
    let report = SegmentRunner::default()
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].id, "a");
    assert!(approx(report.warnings[0].excess, 0.6));
    assert!(approx(report.final_time, 5.1));
    assert_eq!(report.records[0].status(), SegmentStatus::Overran);
}

#[test]
fn zero_length_single_segment_timeline() {
    let spec = TimelineSpec::new(vec![SegmentWindow::new("a", 0.0, 0.0)]).unwrap();

    let mut callbacks = SegmentCallbacks::new();
    callbacks.register("a", |_clock: &mut RenderClock| Ok(()));

    let mut clock = RenderClock::new();
    let report = SegmentRunner::new(PaddingPolicy::new(1.5).unwrap())
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    assert_eq!(clock.now(), 1.5);
    assert_eq!(report.total_planned, 0.0);
    assert_eq!(report.records[0].status(), SegmentStatus::OnCue);
}

#[test]
fn exact_consumption_over_a_measured_timeline_has_zero_net_drift() {
    // Cues taken from a real narration measurement export.
    let cues = [
        ("01_hook", 0.0, 3.52),
        ("02_answer", 3.52, 6.09),
        ("03_setup", 6.09, 12.32),
        ("04_naive", 12.32, 17.72),
        ("05_insight", 17.72, 23.64),
    ];
    let spec = TimelineSpec::new(
        cues.iter()
            .map(|(id, s, e)| SegmentWindow::new(*id, *s, *e))
            .collect(),
    )
    .unwrap();

    let mut callbacks = SegmentCallbacks::new();
    for (id, s, e) in cues {
        callbacks.register(id, consume(e - s));
    }

    let mut clock = RenderClock::new();
    let report = SegmentRunner::new(PaddingPolicy::new(0.0).unwrap())
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    assert!(approx(clock.now(), spec.total_duration()));
    assert!(report.on_plan());
    for r in &report.records {
        assert!(approx(r.drift, 0.0));
    }
}

#[test]
fn segment_starts_never_precede_their_cue() {
    // Mixed under- and over-running segments. Every segment must start at
    // or after its cue, exactly on it whenever the previous segment stayed
    // inside its window.
    let cues = [
        ("a", 0.0, 2.0),
        ("b", 2.0, 5.0),
        ("c", 5.0, 6.0),
        ("d", 6.0, 9.0),
    ];
    let consumed = [1.0, 3.8, 0.5, 3.0];

    let spec = TimelineSpec::new(
        cues.iter()
            .map(|(id, s, e)| SegmentWindow::new(*id, *s, *e))
            .collect(),
    )
    .unwrap();

    let starts = std::cell::RefCell::new(Vec::<f64>::new());
    let mut callbacks = SegmentCallbacks::new();
    for ((id, ..), secs) in cues.iter().zip(consumed) {
        let starts = &starts;
        callbacks.register(*id, move |clock: &mut RenderClock| {
            starts.borrow_mut().push(clock.now());
            clock.advance(secs)
        });
    }

    let mut clock = RenderClock::new();
    let report = SegmentRunner::new(PaddingPolicy::new(0.0).unwrap())
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    // b overruns by 0.8, so c starts 0.8 late but keeps its full budget;
    // the overrun stays local and d starts right after c at 6.3.
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].id, "b");

    let starts = starts.borrow();
    let expected = [0.0, 2.0, 5.8, 6.3];
    for ((observed, expected), (_, cue, _)) in starts.iter().zip(expected).zip(cues) {
        assert!(approx(*observed, expected));
        assert!(*observed >= cue - 1e-9);
    }
    assert!(approx(clock.now(), 9.6));
}

#[test]
fn rerunning_the_same_plan_yields_identical_reports() {
    let spec = TimelineSpec::new(vec![
        SegmentWindow::new("a", 0.0, 5.0),
        SegmentWindow::new("b", 5.0, 9.0),
    ])
    .unwrap();

    let run = || {
        let mut callbacks = SegmentCallbacks::new();
        callbacks.register("a", consume(5.5));
        callbacks.register("b", consume(3.0));
        let mut clock = RenderClock::new();
        SegmentRunner::default()
            .run(&spec, &mut callbacks, &mut clock)
            .unwrap()
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(first.records, second.records);
}

#[test]
fn run_report_roundtrips_through_json() {
    let spec = TimelineSpec::new(vec![SegmentWindow::new("a", 0.0, 3.0)]).unwrap();
    let mut callbacks = SegmentCallbacks::new();
    callbacks.register("a", consume(3.6));

    let mut clock = RenderClock::new();
    let report = SegmentRunner::default()
        .run(&spec, &mut callbacks, &mut clock)
        .unwrap();

    let json = serde_json::to_string(&report).unwrap();
    let de: cuesync::RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(de, report);
}
