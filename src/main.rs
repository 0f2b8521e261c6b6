use carpool_plan::{DrivingPlan, PlanConfig, Roster, calculate_driving_plan};
use clap::Parser;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod display;

#[derive(Parser)]
#[command(version, about = "Plans who drives whom over a two-week A/B school cycle")]
struct Args {
    /// Path to the JSON roster file
    #[arg(short, long, value_name = "FILE", default_value = "data/roster.json")]
    roster: PathBuf,

    /// Maximum minutes between two times that may share a car
    #[arg(short, long)]
    tolerance: Option<u16>,

    #[arg(long)]
    max_drives_full_time: Option<usize>,

    #[arg(long)]
    max_drives_part_time: Option<usize>,

    /// Write the plan as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Browse the plan in a prompt after planning
    #[arg(short, long)]
    interactive: bool,

    /// Log every planning decision
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn config(&self, file: PlanConfig) -> PlanConfig {
        PlanConfig {
            tolerance_minutes: self.tolerance.unwrap_or(file.tolerance_minutes),
            max_drives_full_time: self.max_drives_full_time.unwrap_or(file.max_drives_full_time),
            max_drives_part_time: self.max_drives_part_time.unwrap_or(file.max_drives_part_time),
        }
    }
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
    pub initials: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words, prefix) = match line.strip_prefix("member ") {
            Some(rest) => (line.len() - rest.len(), &self.initials, rest),
            None => (0, &self.commands, line),
        };
        let candidates = words
            .iter()
            .filter(|w| w.starts_with(prefix))
            .map(|w| Pair { display: w.clone(), replacement: format!("{} ", w) })
            .collect();
        Ok((start, candidates))
    }
}

fn paginate(content: String) {
    let pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn());
    let Ok(mut pager) = pager else {
        println!("{}", content);
        return;
    };

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // the user may quit the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                eprintln!("Error writing to pager: {}", e);
            }
        }
    }

    let _ = pager.wait();
}

fn show(content: String) {
    if content.lines().count() > 40 {
        paginate(content);
    } else {
        println!("{}", content);
    }
}

fn parse_day(arg: Option<&str>) -> Option<u8> {
    arg.and_then(|s| s.parse::<u8>().ok()).filter(|d| (1..=10).contains(d))
}

fn browse(plan: &DrivingPlan, members: &BTreeMap<&str, &carpool_plan::Member>) -> rustyline::Result<()> {
    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: ["ls", "day", "member", "summary", "help", "exit"]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        initials: members.keys().map(|i| i.to_string()).collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" | "day" => match (parts.get(1), parse_day(parts.get(1).copied())) {
                        (None, _) if parts[0] == "ls" => show(display::overview_table(plan)),
                        (Some(_), Some(day)) => match plan.day_plans.get(&day) {
                            Some(day_plan) => show(display::day_table(day_plan, members)),
                            None => println!("No plan for day {}.", day),
                        },
                        _ => println!("Usage: {} <1-10>", parts[0]),
                    },
                    "member" => match parts.get(1) {
                        Some(initials) if members.contains_key(initials) => {
                            show(display::member_table(plan, initials));
                            println!("Drives {} times.", plan.drive_count(initials));
                        }
                        Some(initials) => println!("Unknown member: {}", initials),
                        None => println!("Usage: member <initials>"),
                    },
                    "summary" => print!("{}", plan.summary),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [day]            - List all days, or the parties of one day (1-10)");
                        println!("  day <n>             - Show the parties of day <n>");
                        println!("  member <initials>   - Show where a member sits on every day");
                        println!("  summary             - Show how often everybody drives");
                        println!("  help / ?            - Show this help menu");
                        println!("  exit / quit         - Leave the browser\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let roster = Roster::load_from_file(&args.roster)?;
    info!(roster = %args.roster.display(), members = roster.persons.len(), "loaded roster");
    let config = args.config(roster.config);
    let plan = calculate_driving_plan(roster.persons.clone(), config)?;

    if let Some(path) = &args.output {
        std::fs::write(path, serde_json::to_string_pretty(&plan)?)?;
        info!(path = %path.display(), "wrote plan");
    }

    let members = roster
        .persons
        .iter()
        .map(|m| (&*m.initials, m))
        .collect::<BTreeMap<&str, _>>();

    if args.interactive {
        browse(&plan, &members)?;
    } else {
        println!("{}", display::overview_table(&plan));
        for day in plan.day_plans.values() {
            println!("\n{}", carpool_plan::time::day_name((day.day_of_week_ab_combo.unique_number - 1) as usize));
            println!("{}", display::day_table(day, &members));
        }
        print!("\n{}", plan.summary);
    }
    Ok(())
}
