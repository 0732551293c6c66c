//! `floorplan` — command-line driver for a floor-plan workspace.
//!
//! Every invocation opens the workspace document, runs one command through a
//! [`Session`], and lets the session save after each mutation. Command output
//! goes to stdout; logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use canvas::doc::{FloorPlanId, ShapeId, ShapeKind};
use canvas::input::DrawingMode;
use canvas::mapper::{Point, Size};
use canvas::units::{LengthInput, format_length, parse_positive_length};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{Value, json};
use store::ErrorCode;
use store::config::{StoreConfig, parse_container};
use store::session::{Session, SessionError};
use store::storage::{FileStorage, Storage};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("not a usable length: {0:?}")]
    InvalidLength(String),
    #[error("length is empty or zero: {0:?}")]
    EmptyLength(String),
    #[error("--from, --to and --length are required unless --clear is given")]
    IncompleteCalibration,
    #[error("no active floor plan; create or select one first")]
    NoActivePlan,
    #[error("could not read image dimensions from {path}: {source}")]
    Image { path: PathBuf, source: image::ImageError },
    #[error("--length given but the gesture drew no calibration line")]
    NothingDrawn,
    #[error("output failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Session(e) => e.error_code(),
            Self::InvalidLength(_) => "E_INVALID_LENGTH",
            Self::EmptyLength(_) => "E_EMPTY_LENGTH",
            Self::IncompleteCalibration => "E_USAGE",
            Self::NoActivePlan => "E_NO_ACTIVE_PLAN",
            Self::Image { .. } => "E_IMAGE_READ",
            Self::NothingDrawn => "E_NOTHING_DRAWN",
            Self::Io(_) => "E_IO",
            Self::Json(_) => "E_JSON",
        }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Calibrated floor-plan annotation workspace")]
struct Cli {
    /// Directory holding the workspace document [env: FLOORPLAN_STATE_DIR]
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Storage key of the workspace document [env: FLOORPLAN_STATE_KEY]
    #[arg(long)]
    state_key: Option<String>,

    /// Container the image is fitted into, as WIDTHxHEIGHT [env: FLOORPLAN_CONTAINER]
    #[arg(long, value_parser = parse_size)]
    container: Option<Size>,

    /// Log more to stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    /// Environment config with command-line overrides applied.
    fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::from_env();
        if let Some(dir) = &self.state_dir {
            config.state_dir.clone_from(dir);
        }
        if let Some(key) = &self.state_key {
            config.state_key.clone_from(key);
        }
        if let Some(container) = self.container {
            config.container = container;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, list and manage floor plans.
    Plan(PlanCommand),
    /// Set the active plan's image or its native size.
    Image(ImageCommand),
    /// Calibrate the active plan from a stored-space line of known length.
    Calibrate(CalibrateArgs),
    /// Add and edit shapes on the active plan.
    Shape(ShapeCommand),
    /// Parse a length and print it in inches.
    Parse {
        #[arg(allow_hyphen_values = true)]
        text: String,
    },
    /// Replay pointer events (display space) against the active plan.
    Gesture(GestureArgs),
    /// Print the active plan's draw commands as JSON.
    Render,
}

#[derive(Args, Debug)]
struct CalibrateArgs {
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, required_unless_present = "clear")]
    from: Option<Point>,
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true, required_unless_present = "clear")]
    to: Option<Point>,
    /// Real length, e.g. `120`, `10'`, `5'6"`, `66"`.
    #[arg(long, value_parser = parse_length, required_unless_present = "clear")]
    length: Option<f64>,
    /// Drop the plan's scale and calibration line instead.
    #[arg(long, conflicts_with_all = ["from", "to", "length"])]
    clear: bool,
}

#[derive(Args, Debug)]
struct PlanCommand {
    #[command(subcommand)]
    command: PlanSubcommand,
}

#[derive(Subcommand, Debug)]
enum PlanSubcommand {
    List,
    Create,
    Delete { id: FloorPlanId },
    Duplicate { id: FloorPlanId },
    Rename { id: FloorPlanId, name: String },
    Select { id: FloorPlanId },
}

#[derive(Args, Debug)]
struct ImageCommand {
    #[command(subcommand)]
    command: ImageSubcommand,
}

#[derive(Subcommand, Debug)]
enum ImageSubcommand {
    /// Replace the image. Local files are measured; otherwise pass --width/--height.
    Set {
        reference: String,
        #[arg(long, requires = "height", value_parser = parse_dimension)]
        width: Option<f64>,
        #[arg(long, requires = "width", value_parser = parse_dimension)]
        height: Option<f64>,
    },
    /// Record the image's native pixel size.
    Dims {
        #[arg(value_parser = parse_dimension)]
        width: f64,
        #[arg(value_parser = parse_dimension)]
        height: f64,
    },
}

#[derive(Args, Debug)]
struct ShapeCommand {
    #[command(subcommand)]
    command: ShapeSubcommand,
}

#[derive(Subcommand, Debug)]
enum ShapeSubcommand {
    List,
    /// Add a shape in stored-space pixels.
    Add {
        #[arg(value_enum)]
        kind: KindArg,
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Point,
        #[arg(long, value_parser = parse_size)]
        size: Size,
    },
    Move {
        id: ShapeId,
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        to: Point,
    },
    /// Set a shape's real-world size.
    Resize {
        id: ShapeId,
        #[arg(long, value_parser = parse_length)]
        width: f64,
        #[arg(long, value_parser = parse_length)]
        height: f64,
    },
    Rename { id: ShapeId, name: String },
    Delete { id: ShapeId },
}

#[derive(Args, Debug)]
struct GestureArgs {
    #[arg(long, value_enum, default_value = "none")]
    mode: ModeArg,

    /// Confirm a drawn calibration line with this length.
    #[arg(long, value_parser = parse_length)]
    length: Option<f64>,

    /// Events: `down:X,Y`, `move:X,Y`, `up[:X,Y]`, `leave[:X,Y]`.
    #[arg(required = true, value_parser = parse_event, allow_hyphen_values = true)]
    events: Vec<PointerEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    None,
    Calibration,
    Rectangle,
    Oval,
}

impl From<ModeArg> for DrawingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::None => Self::None,
            ModeArg::Calibration => Self::Calibration,
            ModeArg::Rectangle => Self::Rectangle,
            ModeArg::Oval => Self::Oval,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    #[value(alias = "rect")]
    Rectangle,
    Oval,
}

impl From<KindArg> for ShapeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Rectangle => Self::Rectangle,
            KindArg::Oval => Self::Oval,
        }
    }
}

/// One replayed pointer event. Release events may carry a final position.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Option<Point>),
    Leave(Option<Point>),
}

fn parse_point(raw: &str) -> Result<Point, String> {
    let (x, y) = raw.split_once(',').ok_or_else(|| format!("expected X,Y, got {raw:?}"))?;
    let parse = |v: &str| match v.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(format!("not a coordinate: {v:?}")),
    };
    Ok(Point::new(parse(x)?, parse(y)?))
}

fn parse_size(raw: &str) -> Result<Size, String> {
    parse_container(raw).ok_or_else(|| format!("expected positive WIDTHxHEIGHT, got {raw:?}"))
}

fn parse_dimension(raw: &str) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(format!("not a positive pixel size: {raw:?}")),
    }
}

fn parse_length(raw: &str) -> Result<f64, String> {
    parse_positive_length(raw).ok_or_else(|| format!("not a positive length: {raw:?}"))
}

fn parse_event(raw: &str) -> Result<PointerEvent, String> {
    let (kind, at) = match raw.split_once(':') {
        Some((kind, at)) => (kind, Some(parse_point(at)?)),
        None => (raw, None),
    };
    match (kind.trim().to_ascii_lowercase().as_str(), at) {
        ("down", Some(pt)) => Ok(PointerEvent::Down(pt)),
        ("move", Some(pt)) => Ok(PointerEvent::Move(pt)),
        ("up", at) => Ok(PointerEvent::Up(at)),
        ("leave", at) => Ok(PointerEvent::Leave(at)),
        ("down" | "move", None) => Err(format!("{kind} needs a position, e.g. {kind}:10,20")),
        _ => Err(format!("unknown pointer event {raw:?}")),
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!(error = %e, ".env could not be loaded");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.error_code());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.store_config();
    info!(dir = %config.state_dir.display(), key = %config.state_key, "opening workspace");
    let storage = FileStorage::new(&config.state_dir);
    let mut session = Session::open(storage, config.state_key, config.container)?;
    let mut out = io::stdout().lock();
    execute(cli.command, &mut session, &mut out)
}

fn execute<S: Storage>(command: Command, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        Command::Plan(plan) => run_plan(plan.command, session, out),
        Command::Image(image) => run_image(image.command, session, out),
        Command::Calibrate(args) => run_calibrate(args, session, out),
        Command::Shape(shape) => run_shape(shape.command, session, out),
        Command::Parse { text } => run_parse(&text, out),
        Command::Gesture(args) => run_gesture(args, session, out),
        Command::Render => print_json(out, &serde_json::to_value(session.render())?),
    }
}

fn print_json(out: &mut impl Write, value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    writeln!(out, "{rendered}")?;
    Ok(())
}

// =============================================================================
// COMMANDS
// =============================================================================

fn run_plan<S: Storage>(command: PlanSubcommand, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        PlanSubcommand::List => {
            let active = session.state().active_floor_plan_id;
            let plans: Vec<Value> = session
                .state()
                .floor_plans
                .iter()
                .map(|fp| {
                    json!({
                        "id": fp.id,
                        "name": fp.name,
                        "active": active == Some(fp.id),
                        "imageUrl": fp.image_url(),
                        "scale": fp.scale(),
                        "shapes": fp.shapes.len(),
                    })
                })
                .collect();
            print_json(out, &Value::Array(plans))
        }
        PlanSubcommand::Create => {
            let id = session.create_floor_plan()?;
            writeln!(out, "{id}")?;
            Ok(())
        }
        PlanSubcommand::Delete { id } => Ok(session.delete_floor_plan(id)?),
        PlanSubcommand::Duplicate { id } => {
            let copy = session.duplicate_floor_plan(id)?;
            writeln!(out, "{copy}")?;
            Ok(())
        }
        PlanSubcommand::Rename { id, name } => Ok(session.rename_floor_plan(id, &name)?),
        PlanSubcommand::Select { id } => Ok(session.select_floor_plan(id)?),
    }
}

fn run_image<S: Storage>(command: ImageSubcommand, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        ImageSubcommand::Set { reference, width, height } => {
            // Measured before the swap: a failed read must leave the plan as it was.
            let native = match (width, height) {
                (Some(width), Some(height)) => Some(Size::new(width, height)),
                _ => measure_local_image(&reference)?,
            };
            session.set_image(&reference)?;
            match native {
                Some(size) => {
                    session.resolve_image_dimensions(size)?;
                    writeln!(out, "{}x{}", size.width, size.height)?;
                }
                None => warn!(reference = %reference, "image size unknown; run `image dims` before calibrating"),
            }
            Ok(())
        }
        ImageSubcommand::Dims { width, height } => {
            let changed = session.resolve_image_dimensions(Size::new(width, height))?;
            if !changed {
                writeln!(out, "dimensions already known")?;
            }
            Ok(())
        }
    }
}

/// Native size of a local image file; `None` when `reference` is not a file.
fn measure_local_image(reference: &str) -> Result<Option<Size>, CliError> {
    let path = Path::new(reference);
    if !path.is_file() {
        return Ok(None);
    }
    let (width, height) =
        image::image_dimensions(path).map_err(|source| CliError::Image { path: path.to_path_buf(), source })?;
    debug!(reference, width, height, "image measured");
    Ok(Some(Size::new(f64::from(width), f64::from(height))))
}

fn run_calibrate<S: Storage>(args: CalibrateArgs, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    if args.clear {
        session.clear_calibration()?;
        writeln!(out, "calibration cleared")?;
        return Ok(());
    }
    let (Some(from), Some(to), Some(length)) = (args.from, args.to, args.length) else {
        return Err(CliError::IncompleteCalibration);
    };
    let scale = session.calibrate(from, to, length)?;
    writeln!(out, "{scale} px/in")?;
    Ok(())
}

fn run_shape<S: Storage>(command: ShapeSubcommand, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        ShapeSubcommand::List => {
            let plan = session.active_plan().ok_or(CliError::NoActivePlan)?;
            let shapes: Vec<Value> = plan
                .shapes
                .iter()
                .map(|s| {
                    let inches = s.size_in_inches();
                    json!({
                        "id": s.id,
                        "name": s.name,
                        "type": s.kind.as_str(),
                        "position": s.position,
                        "size": s.size(),
                        "sizeInInches": inches,
                        "label": format!("{} x {}", format_length(inches.width), format_length(inches.height)),
                    })
                })
                .collect();
            print_json(out, &Value::Array(shapes))
        }
        ShapeSubcommand::Add { kind, at, size } => {
            let id = session.add_shape(kind.into(), at, size)?;
            writeln!(out, "{id}")?;
            Ok(())
        }
        ShapeSubcommand::Move { id, to } => Ok(session.move_shape(id, to)?),
        ShapeSubcommand::Resize { id, width, height } => Ok(session.resize_shape_inches(id, Size::new(width, height))?),
        ShapeSubcommand::Rename { id, name } => Ok(session.rename_shape(id, &name)?),
        ShapeSubcommand::Delete { id } => Ok(session.delete_shape(id)?),
    }
}

fn run_parse(text: &str, out: &mut impl Write) -> Result<(), CliError> {
    let input = LengthInput::classify(text);
    if let Some(inches) = input.inches() {
        writeln!(out, "{}", format_length(inches))?;
        return Ok(());
    }
    if input.is_error() {
        Err(CliError::InvalidLength(text.to_string()))
    } else {
        Err(CliError::EmptyLength(text.to_string()))
    }
}

fn run_gesture<S: Storage>(args: GestureArgs, session: &mut Session<S>, out: &mut impl Write) -> Result<(), CliError> {
    session.set_drawing_mode(args.mode.into())?;

    for event in &args.events {
        let actions = match *event {
            PointerEvent::Down(pt) => session.pointer_down(pt)?,
            PointerEvent::Move(pt) => session.pointer_move(pt)?,
            PointerEvent::Up(at) => {
                if let Some(pt) = at {
                    session.pointer_move(pt)?;
                }
                session.pointer_up()?
            }
            PointerEvent::Leave(at) => {
                if let Some(pt) = at {
                    session.pointer_move(pt)?;
                }
                session.pointer_leave()?
            }
        };
        debug!(?event, ?actions, "pointer event replayed");
    }

    // A drawn line only lives for this invocation, so without a length it is dropped.
    let discarded = match args.length {
        Some(length) => {
            if session.pending_calibration().is_none() {
                return Err(CliError::NothingDrawn);
            }
            session.confirm_calibration(length)?;
            None
        }
        None => {
            let pending = session.pending_calibration();
            if pending.is_some() {
                warn!("calibration line discarded; pass --length to apply it");
                session.cancel_calibration();
            }
            pending
        }
    };

    let plan = session.active_plan();
    let summary = json!({
        "mode": session.mode().as_str(),
        "selection": session.selection(),
        "discardedCalibration": discarded.map(|p| json!({ "start": p.start, "end": p.end })),
        "scale": plan.and_then(canvas::doc::FloorPlan::scale),
        "shapes": plan.map_or(0, |p| p.shapes.len()),
    });
    print_json(out, &summary)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
