use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use cuesync::{
    CompletionValidator, GapPolicy, PaddingPolicy, RenderClock, SegmentCallbacks, SegmentRunner,
    TimelineDef, TimelineSpec,
};

#[derive(Parser, Debug)]
#[command(name = "cuesync", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a timing document and, when it carries narration text,
    /// check per-segment plan adequacy.
    Validate(ValidateArgs),
    /// Dry-run the scheduler with declared per-segment durations and
    /// report realized drift.
    Simulate(SimulateArgs),
    /// Compare probed video/audio durations before the combine step.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input timing JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Accept authored idle gaps between segments.
    #[arg(long)]
    allow_gaps: bool,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input timing JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Optional JSON map of segment id to seconds the segment's render is
    /// expected to consume. Missing segments consume their planned duration.
    #[arg(long)]
    actuals: Option<PathBuf>,

    /// Trailing padding in seconds.
    #[arg(long, default_value_t = PaddingPolicy::DEFAULT_MIN_PADDING)]
    padding: f64,

    /// Accept authored idle gaps between segments.
    #[arg(long)]
    allow_gaps: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Probed video duration in seconds.
    #[arg(long)]
    video: f64,

    /// Probed narration duration in seconds.
    #[arg(long)]
    audio: f64,

    /// Optional timing JSON; enables the per-segment adequacy check.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Accept authored idle gaps between segments.
    #[arg(long)]
    allow_gaps: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn read_timeline_def(path: &Path) -> anyhow::Result<TimelineDef> {
    let f = File::open(path).with_context(|| format!("open timing '{}'", path.display()))?;
    let r = BufReader::new(f);
    let def: TimelineDef = serde_json::from_reader(r).with_context(|| "parse timing JSON")?;
    Ok(def)
}

fn gap_policy(allow_gaps: bool) -> GapPolicy {
    if allow_gaps {
        GapPolicy::AllowAuthored
    } else {
        GapPolicy::Contiguous
    }
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let def = read_timeline_def(&args.in_path)?;
    let spec = def.to_spec(gap_policy(args.allow_gaps))?;

    eprintln!(
        "timeline ok: {} segments, {:.2}s planned",
        spec.len(),
        spec.total_duration()
    );

    let word_counts = def.narration().word_counts();
    if word_counts.is_empty() {
        return Ok(());
    }

    let findings =
        CompletionValidator::default().check_segment_adequacy(&spec, &word_counts);
    if findings.is_empty() {
        eprintln!("adequacy ok: every narrated segment fits its window");
        return Ok(());
    }

    for f in &findings {
        eprintln!(
            "inadequate: '{}' needs {:.2}s for {} words but is planned at {:.2}s",
            f.id, f.minimum_time, f.word_count, f.planned
        );
    }
    anyhow::bail!("{} segment(s) are under-planned for their narration", findings.len());
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let def = read_timeline_def(&args.in_path)?;
    let spec = def.to_spec(gap_policy(args.allow_gaps))?;

    let actuals: BTreeMap<String, f64> = match &args.actuals {
        Some(path) => {
            let f = File::open(path).with_context(|| format!("open actuals '{}'", path.display()))?;
            serde_json::from_reader(BufReader::new(f)).with_context(|| "parse actuals JSON")?
        }
        None => BTreeMap::new(),
    };

    let mut callbacks = SegmentCallbacks::new();
    for window in spec.windows() {
        let consumed = actuals
            .get(&window.id)
            .copied()
            .unwrap_or_else(|| window.duration());
        callbacks.register(window.id.clone(), move |clock: &mut RenderClock| {
            clock.advance(consumed)
        });
    }

    let runner = SegmentRunner::new(PaddingPolicy::new(args.padding)?);
    let mut clock = RenderClock::new();
    let report = runner.run(&spec, &mut callbacks, &mut clock)?;

    for w in &report.warnings {
        eprintln!("overrun: '{}' exceeded its window by {:.2}s", w.id, w.excess);
    }
    eprintln!(
        "simulated {:.2}s planned -> {:.2}s realized ({} overrun(s))",
        report.total_planned,
        report.final_time,
        report.warnings.len()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let validator = CompletionValidator::default();

    let (spec, word_counts) = match &args.in_path {
        Some(path) => {
            let def = read_timeline_def(path)?;
            let spec = def.to_spec(gap_policy(args.allow_gaps))?;
            let counts = def.narration().word_counts();
            (Some(spec), counts)
        }
        None => (None, BTreeMap::new()),
    };

    // Without a timeline, fall back to a duration-only report against a
    // single synthetic window spanning the probed audio.
    let spec = match spec {
        Some(s) => s,
        None => TimelineSpec::new(vec![cuesync::SegmentWindow::new(
            "narration",
            0.0,
            args.audio.max(0.0),
        )])?,
    };

    let report = validator.report(&spec, &word_counts, args.video, args.audio);
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_ok() {
        anyhow::bail!("completion check failed; see report");
    }
    eprintln!("completion ok: {:.2}s of trailing margin", report.padding_delta);
    Ok(())
}
