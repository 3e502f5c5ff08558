//! # Cashier Chaos Terminal
//!
//! Runs one [`SessionController`] against stdin.
//!
//! ## Module Organization
//! ```text
//! cashier_cli_lib/
//! ├── command.rs   - Input line parsing
//! ├── error.rs     - CliError / ErrorCode
//! ├── host.rs      - FileHost (config levels, JSON-lines reports)
//! └── render.rs    - Text views and the TerminalEmitter
//! ```

pub mod command;
pub mod error;
pub mod host;
pub mod render;

use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cashier_session::{GameConfig, GameHost, SessionController, SessionControllerBuilder};

pub use command::Command;
pub use error::{CliError, ErrorCode};
pub use host::{default_report_path, FileHost, ReportLine};
pub use render::TerminalEmitter;

/// Environment variable naming the config file (overridden by the first
/// command-line argument).
pub const CONFIG_PATH_ENV: &str = "CASHIER_CONFIG";

/// What the loop does after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Print this (possibly empty) text and read the next line.
    Show(String),
    Quit,
}

/// Entry point called from `main.rs`.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. init_tracing()        - stderr logs, RUST_LOG aware                │
/// │  2. GameConfig::load()    - defaults → cashier.toml → CASHIER_* env    │
/// │  3. FileHost::new()       - levels + report path                       │
/// │  4. SessionController     - TerminalEmitter, game-over listener        │
/// │  5. title + onboarding    - then read commands until quit / EOF        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), CliError> {
    init_tracing();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .map(PathBuf::from);
    let config = GameConfig::load(config_path)?;

    let report_path = config
        .session
        .report_path
        .clone()
        .unwrap_or_else(default_report_path);
    info!(
        levels = config.levels.len(),
        reports = %report_path.display(),
        "Cashier Chaos starting"
    );

    let host = FileHost::new(config.levels.clone(), report_path);
    let controller = SessionControllerBuilder::new(host)
        .config(config.session.clone())
        .emitter(Arc::new(TerminalEmitter::new(config.session.tender())))
        .build();
    controller.on_session_end(|summary| println!("\n{}", render::game_over(summary)));

    println!("{}", render::TITLE);
    show_onboarding(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let reply = match line.parse::<Command>() {
            Ok(command) => execute(&controller, command).await,
            Err(e) => Err(e),
        };

        match reply {
            Ok(Reply::Show(text)) if text.is_empty() => {}
            Ok(Reply::Show(text)) => println!("{}", text),
            Ok(Reply::Quit) => break,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => println!("{}", e),
        }
    }

    controller.reset();
    info!("Cashier Chaos exiting");
    Ok(())
}

/// Applies one command to the controller.
pub async fn execute<H: GameHost>(
    controller: &SessionController<H>,
    command: Command,
) -> Result<Reply, CliError> {
    debug!(?command, "Executing command");

    let text = match command {
        Command::Start => {
            controller.acknowledge_onboarding();
            controller.start().await?;
            String::new()
        }
        Command::Add {
            denomination,
            count,
        } => {
            let held = controller.stage_many(denomination, count)?;
            format!("{} × {} in the tray", held, denomination)
        }
        Command::Remove { denomination } => {
            let held = controller.unstage(denomination)?;
            format!("{} × {} in the tray", held, denomination)
        }
        Command::Submit => {
            controller.submit_staged()?;
            String::new()
        }
        Command::Clear => {
            controller.clear_tray()?;
            "Tray: empty".to_string()
        }
        Command::Status => render::status(&controller.snapshot()),
        Command::Restart => {
            controller.restart().await?;
            String::new()
        }
        Command::Home => {
            controller.return_home();
            let mut text = render::TITLE.to_string();
            if controller.should_show_onboarding() {
                text.push('\n');
                text.push_str(render::ONBOARDING);
            }
            text
        }
        Command::Help => command::HELP.to_string(),
        Command::Quit => return Ok(Reply::Quit),
    };

    Ok(Reply::Show(text))
}

fn show_onboarding<H: GameHost>(controller: &SessionController<H>) {
    if controller.should_show_onboarding() {
        println!("{}", render::ONBOARDING);
    }
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cashier=debug"));

    // try_init: a second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashier_core::{Denomination, LevelTable, SessionPhase};
    use cashier_session::{InMemoryHost, SessionConfig};
    use std::time::Duration;

    fn controller() -> SessionController<InMemoryHost> {
        SessionControllerBuilder::new(InMemoryHost::new(LevelTable::standard()))
            .config(SessionConfig::default())
            .seed(7)
            .build()
    }

    async fn run_line(
        controller: &SessionController<InMemoryHost>,
        line: &str,
    ) -> Result<Reply, CliError> {
        execute(controller, line.parse()?).await
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stage() {
        let controller = controller();
        assert!(controller.should_show_onboarding());

        run_line(&controller, "start").await.unwrap();
        assert!(!controller.should_show_onboarding());
        assert_eq!(controller.snapshot().phase, SessionPhase::Active);

        let reply = run_line(&controller, "+20 x2").await.unwrap();
        assert_eq!(reply, Reply::Show("2 × $20.00 in the tray".to_string()));

        let reply = run_line(&controller, "-20").await.unwrap();
        assert_eq!(reply, Reply::Show("1 × $20.00 in the tray".to_string()));
        assert_eq!(
            controller.snapshot().state.cash.count(Denomination::Twenty),
            1
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_over_limit_leaves_tray_unchanged() {
        let controller = controller();
        run_line(&controller, "start").await.unwrap();
        run_line(&controller, "+5 x2").await.unwrap();

        let err = run_line(&controller, "+5 x998").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GameRule);
        assert_eq!(controller.snapshot().state.cash.count(Denomination::Five), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exact_change_scores() {
        let controller = controller();
        run_line(&controller, "start").await.unwrap();

        let due = controller.amount_due().unwrap().total();
        let mut remaining = due;
        for denomination in Denomination::ALL {
            while remaining >= denomination.face_value() {
                controller.stage(denomination).unwrap();
                remaining = remaining - denomination.face_value();
            }
        }

        run_line(&controller, "submit").await.unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.state.score, 10);
        assert_eq!(snapshot.state.customer_index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_rule_errors_are_not_fatal() {
        let controller = controller();

        let err = run_line(&controller, "submit").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GameRule);
        assert!(!err.is_fatal());

        run_line(&controller, "start").await.unwrap();
        let err = run_line(&controller, "-5").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::GameRule);
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_resets_and_shows_onboarding() {
        let controller = controller();
        run_line(&controller, "start").await.unwrap();

        let Reply::Show(text) = run_line(&controller, "home").await.unwrap() else {
            panic!("home should not quit");
        };
        assert!(text.contains("How to play"));
        assert_eq!(controller.snapshot().phase, SessionPhase::NotStarted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_timeout() {
        let controller = controller();
        run_line(&controller, "start").await.unwrap();
        controller.expire_timer().await;

        let Reply::Show(text) = run_line(&controller, "status").await.unwrap() else {
            panic!("status should not quit");
        };
        assert!(text.contains("You ran out of time!"));

        run_line(&controller, "restart").await.unwrap();
        assert_eq!(controller.snapshot().phase, SessionPhase::Active);
    }

    #[tokio::test]
    async fn test_quit() {
        let controller = controller();
        assert_eq!(run_line(&controller, "quit").await.unwrap(), Reply::Quit);
    }
}
