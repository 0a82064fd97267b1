//! # stance
//!
//! Command line console for the posture subsystem of a humanoid robot. The
//! robot's middleware exposes a posture service on a TCP endpoint (port 9559
//! by convention); `stance` connects to it to list the posture vocabulary,
//! command whole-body transitions, and run a local simulator for development
//! without hardware.
//!
//! ## Usage
//!
//! ```bash
//! # Show usage plus the postures the robot can reach
//! stance
//!
//! # List the posture vocabulary, one name per line
//! stance list --robot 192.168.1.12:9559
//!
//! # Move the robot to a posture at the conventional half speed
//! stance goto Sit --robot 192.168.1.12:9559
//!
//! # Move faster
//! stance goto Stand --speed 0.8
//!
//! # Query the posture currently held
//! stance current
//!
//! # Abort a transition in progress
//! stance stop
//!
//! # Run a local service simulator on the conventional port
//! stance sim
//! ```
//!
//! ## Robot Address
//!
//! The endpoint is resolved in order from the `--robot` flag, the
//! `STANCE_ROBOT` environment variable, and finally the local default
//! `127.0.0.1:9559`.

use std::time::Duration;

use anyhow::Result;
use argh::FromArgs;

use stance_client::PostureProxy;
use stance_common::protocol::Speed;
use stance_common::transport::TcpTransport;

/// Local middleware endpoint, used when neither the `--robot` flag nor the
/// `STANCE_ROBOT` environment variable names one.
const DEFAULT_ROBOT_ADDR: &str = "127.0.0.1:9559";

/// Environment variable consulted for the robot address.
const ROBOT_ADDR_ENV: &str = "STANCE_ROBOT";

/// Default I/O timeout for remote calls, in milliseconds.
const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Main CLI structure parsed from command-line arguments.
///
/// Uses `argh` for declarative argument parsing. Invoked without a
/// subcommand, the console prints usage together with the postures the robot
/// can currently reach.
#[derive(FromArgs)]
/// console for a robot's posture service
struct Cli {
    #[argh(subcommand)]
    command: Option<Commands>,
}

/// Available CLI subcommands.
///
/// - **List**: Print the posture vocabulary
/// - **Goto**: Command a transition to a named posture
/// - **Current**: Print the posture currently held
/// - **Stop**: Abort a transition in progress
/// - **Sim**: Run a local posture service simulator
#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    List(ListArgs),
    Goto(GotoArgs),
    Current(CurrentArgs),
    Stop(StopArgs),
    Sim(SimArgs),
}

/// Arguments for listing the posture vocabulary.
///
/// Prints every posture the service can reach, one name per line, in the
/// service's own order. The output is plain so it can be piped to other
/// tools.
#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
/// list the postures the robot can reach
struct ListArgs {
    /// robot address as host:port
    ///
    /// Defaults to the STANCE_ROBOT environment variable, then 127.0.0.1:9559.
    #[argh(option)]
    robot: Option<String>,

    /// IO timeout for remote calls in milliseconds
    ///
    /// Defaults to 5000ms.
    #[argh(option, long = "timeout-ms", default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
}

/// Arguments for commanding a posture transition.
///
/// The transition is whole-body and blocking on the robot's side: the
/// service replies once the posture is reached or abandoned. Success is
/// silent; an abandoned transition or a service fault is reported on stderr
/// with a non-zero exit code.
///
/// # Example
///
/// ```bash
/// stance goto Crouch --robot 192.168.1.12:9559 --speed 0.3
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "goto")]
/// move the robot to a named posture
struct GotoArgs {
    /// target posture name, as reported by `stance list`
    #[argh(positional)]
    posture: String,

    /// fraction of maximum actuator speed for the transition
    ///
    /// Must be in (0, 1]. Defaults to 0.5, the conventional pace for
    /// scripted transitions.
    #[argh(option, default = "Speed::default()")]
    speed: Speed,

    /// robot address as host:port
    ///
    /// Defaults to the STANCE_ROBOT environment variable, then 127.0.0.1:9559.
    #[argh(option)]
    robot: Option<String>,

    /// IO timeout for remote calls in milliseconds
    ///
    /// Defaults to 5000ms.
    #[argh(option, long = "timeout-ms", default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
}

/// Arguments for querying the posture currently held.
#[derive(FromArgs)]
#[argh(subcommand, name = "current")]
/// print the posture the robot currently holds
struct CurrentArgs {
    /// robot address as host:port
    ///
    /// Defaults to the STANCE_ROBOT environment variable, then 127.0.0.1:9559.
    #[argh(option)]
    robot: Option<String>,

    /// IO timeout for remote calls in milliseconds
    ///
    /// Defaults to 5000ms.
    #[argh(option, long = "timeout-ms", default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
}

/// Arguments for aborting a transition in progress.
///
/// The robot holds whatever pose its actuators are in when the stop lands;
/// no balancing posture is commanded.
#[derive(FromArgs)]
#[argh(subcommand, name = "stop")]
/// abort any posture transition in progress
struct StopArgs {
    /// robot address as host:port
    ///
    /// Defaults to the STANCE_ROBOT environment variable, then 127.0.0.1:9559.
    #[argh(option)]
    robot: Option<String>,

    /// IO timeout for remote calls in milliseconds
    ///
    /// Defaults to 5000ms.
    #[argh(option, long = "timeout-ms", default = "DEFAULT_TIMEOUT_MS")]
    timeout_ms: u64,
}

/// Arguments for running the posture service simulator.
///
/// The simulator speaks the robot's wire protocol so every other subcommand
/// works against it unchanged. Transitions are instantaneous.
///
/// # Example
///
/// ```bash
/// stance sim --bind 127.0.0.1:9559 --postures Stand,Sit,Crouch --initial Crouch
/// ```
#[derive(FromArgs)]
#[argh(subcommand, name = "sim")]
/// run a local posture service simulator
struct SimArgs {
    /// address to bind the simulator to
    ///
    /// Defaults to "127.0.0.1:9559" so client commands work with no flags.
    #[argh(option, default = "\"127.0.0.1:9559\".into()")]
    bind: String,

    /// comma-separated posture table to serve
    ///
    /// Defaults to the standard NAO-class vocabulary (Stand, StandInit,
    /// StandZero, Crouch, Sit, SitRelax, LyingBelly, LyingBack).
    #[argh(option)]
    postures: Option<String>,

    /// posture the simulated robot starts in
    ///
    /// Must be a member of the posture table. Defaults to the first entry.
    #[argh(option)]
    initial: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Initialize tracing only for the simulator. Client commands keep their
    // output clean for unix tool usage (piping the listing to grep, etc.).
    if matches!(cli.command, Some(Commands::Sim(_))) {
        // Set default log level to INFO, but allow RUST_LOG env var to override
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .init();
    }

    match cli.command {
        None => run_usage().await,
        Some(Commands::List(args)) => run_list(args).await,
        Some(Commands::Goto(args)) => run_goto(args).await,
        Some(Commands::Current(args)) => run_current(args).await,
        Some(Commands::Stop(args)) => run_stop(args).await,
        Some(Commands::Sim(args)) => run_sim(args).await,
    }
}

/// Resolves the robot address: CLI flag > STANCE_ROBOT env var > default.
fn robot_addr(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(ROBOT_ADDR_ENV).ok())
        .unwrap_or_else(|| DEFAULT_ROBOT_ADDR.to_string())
}

/// Connects to the posture service, failing fast when it is unreachable.
async fn connect(robot: Option<String>, timeout_ms: u64) -> Result<PostureProxy> {
    let addr = robot_addr(robot);
    let transport = TcpTransport::with_timeout(Duration::from_millis(timeout_ms));
    let proxy = PostureProxy::connect_with(addr, transport).await?;
    Ok(proxy)
}

/// Executes the bare invocation: usage plus the reachable postures.
async fn run_usage() -> Result<()> {
    println!("Usage: stance goto <posture>");
    println!("Postures available:");

    let mut proxy = connect(None, DEFAULT_TIMEOUT_MS).await?;
    for posture in proxy.posture_list().await? {
        println!("{}", posture);
    }

    Ok(())
}

/// Executes the `list` subcommand.
async fn run_list(args: ListArgs) -> Result<()> {
    let mut proxy = connect(args.robot, args.timeout_ms).await?;
    for posture in proxy.posture_list().await? {
        println!("{}", posture);
    }

    Ok(())
}

/// Executes the `goto` subcommand.
///
/// Success is silent. A transition the service reports as not reached is an
/// error: the robot is not in the requested posture and scripts must not
/// carry on as if it were.
async fn run_goto(args: GotoArgs) -> Result<()> {
    let mut proxy = connect(args.robot, args.timeout_ms).await?;
    let reached = proxy.go_to_posture(args.posture.as_str(), args.speed).await?;

    if !reached {
        anyhow::bail!("posture '{}' was not reached", args.posture);
    }

    Ok(())
}

/// Executes the `current` subcommand.
async fn run_current(args: CurrentArgs) -> Result<()> {
    let mut proxy = connect(args.robot, args.timeout_ms).await?;
    println!("{}", proxy.current_posture().await?);

    Ok(())
}

/// Executes the `stop` subcommand.
async fn run_stop(args: StopArgs) -> Result<()> {
    let mut proxy = connect(args.robot, args.timeout_ms).await?;
    proxy.stop_move().await?;

    Ok(())
}

/// Executes the `sim` subcommand.
async fn run_sim(args: SimArgs) -> Result<()> {
    let postures: Vec<String> = match args.postures {
        Some(list) => list
            .split(',')
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        None => stance_cli::sim::DEFAULT_POSTURES
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };

    stance_cli::sim::run_sim(args.bind, postures, args.initial).await
}
