use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use colored::Colorize;

use scoreboard_gate::{AccessGate, AuthMode, GateConfig};
use scoreboard_ledger::{load, try_load, AppliedDelta, Ledger, LoadOutcome, LoadSource, Session};
use scoreboard_store::TableStore;
use scoreboard_types::{Direction, MemberName, Unit};

use crate::cli::*;
use crate::config::{config_base, ScoreboardConfig, StoreConfig};
use crate::render::{board_line, print_board};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Init(args) => cmd_init(&config_path, args),
        Command::Board(_) => cmd_board(&config_path, &cli.format),
        Command::Add(args) => cmd_delta(&config_path, &cli.format, args, Direction::Add),
        Command::Redeem(args) => cmd_delta(&config_path, &cli.format, args, Direction::Subtract),
        Command::Export(args) => cmd_export(&config_path, args),
        Command::Status(_) => cmd_status(&config_path, &cli.format),
        Command::Shell(args) => cmd_shell(&config_path, args),
    }
}

/// Loaded configuration plus the store it points at.
struct Board {
    config: ScoreboardConfig,
    store: Arc<dyn TableStore>,
}

impl Board {
    fn open(config_path: &Path) -> anyhow::Result<Self> {
        let config = ScoreboardConfig::load(config_path)?;
        let store = config.open_store(&config_base(config_path));
        Ok(Self { config, store })
    }

    fn load(&self) -> LoadOutcome {
        load(self.store.as_ref(), &self.config.roster)
    }

    /// Load for commands that must not act on substitute data.
    fn load_strict(&self) -> anyhow::Result<Ledger> {
        let outcome = self.load();
        if let LoadSource::Fallback { reason } = &outcome.source {
            bail!("{} is unreadable: {reason}", self.store.describe());
        }
        Ok(outcome.ledger)
    }

    fn session(&self) -> anyhow::Result<Session> {
        let gate = AccessGate::from_env(&self.config.auth).context("setting up access gate")?;
        let session = Session::open(self.store.clone(), gate, self.config.session_config());
        if let LoadSource::Fallback { reason } = session.source() {
            bail!(
                "{} is unreadable ({reason}); refusing to overwrite it",
                self.store.describe()
            );
        }
        Ok(session)
    }
}

fn cmd_init(config_path: &Path, args: InitArgs) -> anyhow::Result<()> {
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let roster = args
        .members
        .iter()
        .map(MemberName::new)
        .collect::<Result<Vec<_>, _>>()
        .context("invalid --member")?;

    let store = if args.memory {
        StoreConfig::Memory
    } else {
        StoreConfig::Csv {
            path: args.store.unwrap_or_else(|| PathBuf::from("scoreboard.csv")),
        }
    };
    let auth = if args.no_auth {
        GateConfig::disabled()
    } else {
        GateConfig::default()
    };
    let config = ScoreboardConfig {
        unit: args.unit,
        roster,
        store,
        auth,
        ..Default::default()
    };

    let base = config_base(config_path);
    fs::create_dir_all(&base).with_context(|| format!("creating {}", base.display()))?;
    config.save(config_path)?;

    let store = config.open_store(&base);
    if matches!(config.store, StoreConfig::Csv { .. }) {
        let existing = try_load(store.as_ref())
            .with_context(|| format!("checking {}", store.describe()))?;
        if existing.is_some() {
            println!("  {} {} already has data; left untouched", "note:".yellow(), store.describe());
        } else {
            store
                .write(&Ledger::seeded(&config.roster).to_table())
                .with_context(|| format!("seeding {}", store.describe()))?;
        }
    }

    println!(
        "{} Initialized scoreboard in {}",
        "✓".green().bold(),
        config_path.display().to_string().bold()
    );
    println!("  Members: {}", config.roster.len());
    println!("  Unit: {}", config.unit.to_string().cyan());
    println!("  Store: {}", store.describe());
    if config.auth.mode == AuthMode::Required {
        println!(
            "  Changes require the admin code from {}",
            config.auth.code_env.yellow()
        );
    }
    Ok(())
}

fn cmd_board(config_path: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let board = Board::open(config_path)?;
    let outcome = board.load();
    if let LoadSource::Fallback { reason } = &outcome.source {
        eprintln!("{} showing roster defaults: {reason}", "warning:".yellow().bold());
    }
    let view = outcome.ledger.rank();
    match format {
        OutputFormat::Text => print_board(&view, board.config.unit),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
    }
    Ok(())
}

fn cmd_delta(
    config_path: &Path,
    format: &OutputFormat,
    args: DeltaArgs,
    direction: Direction,
) -> anyhow::Result<()> {
    let board = Board::open(config_path)?;
    let mut session = board.session()?;
    let applied = session.apply_delta(&args.name, args.amount, direction, args.code.as_deref())?;

    match format {
        OutputFormat::Text => print_applied(&applied, board.config.unit),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&applied)?),
    }
    if board.config.store == StoreConfig::Memory {
        eprintln!(
            "{} the store is session memory; this change ends with the process (use `shell`)",
            "note:".yellow()
        );
    }
    Ok(())
}

fn print_applied(applied: &AppliedDelta, unit: Unit) {
    let delta = (applied.current - applied.previous).abs();
    let verb = match applied.direction {
        Direction::Add => "Added",
        Direction::Subtract => "Redeemed",
    };
    println!(
        "{} {verb} {} for {} (now {})",
        "✓".green().bold(),
        unit.format_total(delta),
        applied.name.as_str().bold(),
        unit.format_total(applied.current).yellow()
    );
    if !applied.persisted {
        println!("  {} change was not saved to the store", "warning:".yellow().bold());
    }
}

fn cmd_export(config_path: &Path, args: ExportArgs) -> anyhow::Result<()> {
    let board = Board::open(config_path)?;
    let ledger = board.load_strict()?;
    let out = args.out.unwrap_or_else(default_export_path);
    fs::write(&out, ledger.export_csv(board.config.unit))
        .with_context(|| format!("writing {}", out.display()))?;
    println!(
        "{} Exported {} members to {}",
        "✓".green().bold(),
        ledger.len(),
        out.display().to_string().bold()
    );
    Ok(())
}

fn default_export_path() -> PathBuf {
    PathBuf::from(
        chrono::Local::now()
            .format("scoreboard-%Y%m%d-%H%M%S.csv")
            .to_string(),
    )
}

fn cmd_status(config_path: &Path, format: &OutputFormat) -> anyhow::Result<()> {
    let board = Board::open(config_path)?;
    let outcome = board.load();
    let config = &board.config;
    let code_set = std::env::var(&config.auth.code_env).is_ok_and(|v| !v.is_empty());

    match format {
        OutputFormat::Text => {
            println!("Store: {}", board.store.describe().bold());
            println!("Data: {}", outcome.source);
            println!("Members: {}", outcome.ledger.len());
            println!("Unit: {}", config.unit.to_string().cyan());
            match config.auth.mode {
                AuthMode::Required => println!(
                    "Auth: {} (code from {}: {})",
                    "required".green(),
                    config.auth.code_env,
                    if code_set { "set".green() } else { "missing".red() }
                ),
                AuthMode::Disabled => println!("Auth: {}", "disabled".yellow()),
            }
            println!("On write failure: {:?}", config.on_write_failure);
        }
        OutputFormat::Json => {
            let status = serde_json::json!({
                "store": board.store.describe(),
                "source": outcome.source.to_string(),
                "members": outcome.ledger.len(),
                "unit": config.unit,
                "auth": config.auth.mode,
                "code_set": code_set,
                "on_write_failure": config.on_write_failure,
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

fn cmd_shell(config_path: &Path, args: ShellArgs) -> anyhow::Result<()> {
    let board = Board::open(config_path)?;
    let mut session = board.session()?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_shell(
        &mut session,
        board.config.unit,
        args.code.as_deref(),
        stdin.lock(),
        stdout.lock(),
    )
}

const SHELL_HELP: &str = "commands: add <name> <amount> | redeem <name> <amount> | board | reload | export [path] | help | quit";

/// Drive a session from line-oriented input.
///
/// Errors from individual commands are reported and the loop continues; only
/// I/O failures on `input` or `output` end it early.
pub fn run_shell(
    session: &mut Session,
    unit: Unit,
    code: Option<&str>,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    writeln!(output, "{SHELL_HELP}")?;
    for line in input.lines() {
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, rest)) = words.split_first() else {
            continue;
        };

        match verb {
            "quit" | "exit" => break,
            "help" => writeln!(output, "{SHELL_HELP}")?,
            "board" => write_board(session, unit, &mut output)?,
            "reload" => {
                let source = session.reload();
                writeln!(output, "reloaded: {source}")?;
            }
            "export" => {
                let csv = session.export_csv(unit);
                if rest.is_empty() {
                    write!(output, "{csv}")?;
                } else {
                    // The rest of the line is the path, spaces included.
                    let path = line.trim_start()[verb.len()..].trim();
                    match fs::write(path, csv) {
                        Ok(()) => writeln!(output, "exported to {path}")?,
                        Err(e) => writeln!(output, "error: writing {path}: {e}")?,
                    }
                }
            }
            "add" | "redeem" => {
                let direction = if verb == "add" {
                    Direction::Add
                } else {
                    Direction::Subtract
                };
                match parse_delta(rest) {
                    Some((name, amount)) => {
                        match session.apply_delta(&name, amount, direction, code) {
                            Ok(applied) => writeln!(
                                output,
                                "{}: {}",
                                applied.name,
                                unit.format_total(applied.current)
                            )?,
                            Err(e) => writeln!(output, "error: {e}")?,
                        }
                    }
                    None => writeln!(output, "usage: {verb} <name> <amount>")?,
                }
            }
            other => writeln!(output, "unknown command: {other}")?,
        }
    }
    Ok(())
}

/// Split `<name words...> <amount>`; names may contain spaces.
fn parse_delta(words: &[&str]) -> Option<(String, f64)> {
    let (amount, name) = words.split_last()?;
    if name.is_empty() {
        return None;
    }
    let amount = amount.parse::<f64>().ok()?;
    Some((name.join(" "), amount))
}

fn write_board(session: &Session, unit: Unit, output: &mut impl Write) -> io::Result<()> {
    let view = session.rank();
    if view.is_empty() {
        return writeln!(output, "No members on the board.");
    }
    let name_width = view
        .iter()
        .map(|entry| entry.name.as_str().chars().count())
        .max()
        .unwrap_or(0);
    for entry in &view {
        writeln!(output, "{}", board_line(entry, unit, name_width))?;
    }
    Ok(())
}
