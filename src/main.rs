use clap::Parser;
use colored::*;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use tone_survey::cli::Args;
use tone_survey::config::{Config, DEFAULT_DATASET_PATH};
use tone_survey::questionnaire::{InputKind, CONSENT_PROMPT, CONSENT_TEXT};
use tone_survey::store::{DatasetStore, HfDatasetStore, MemoryStore};
use tone_survey::table::Table;
use tone_survey::upload::{submit, DatasetLocation};
use tone_survey::voices::{Tone, VOICE_CATALOG};
use tone_survey::{AnswerValue, Step, SurveyError, SurveySession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.voices {
        print_voices();
        return Ok(());
    }

    // Dry runs never touch the network or the environment.
    let memory = MemoryStore::new();
    let hf;
    let (store, dataset): (&dyn DatasetStore, DatasetLocation) = if args.dry_run {
        (
            &memory,
            DatasetLocation::new("dry-run", DEFAULT_DATASET_PATH),
        )
    } else {
        let config = Config::from_env()?;
        hf = HfDatasetStore::new(config.token.clone());
        let mut dataset = config.dataset();
        if let Some(repo) = args.repo {
            dataset.repo_id = repo;
        }
        if let Some(path) = args.path {
            dataset.path = path;
        }
        (&hf, dataset)
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut session = SurveySession::new();

    loop {
        render_step(&mut session);
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "q" | "quit" => break,
            "b" | "back" => {
                if session.go_back().is_none() {
                    println!("{}", "Already at the first step.".yellow());
                }
            }
            "c" | "continue" => match session.try_continue() {
                Ok(_) => {}
                Err(SurveyError::ConsentRequired) => {
                    println!(
                        "{}",
                        "Consent is required to continue. Answer `yes` first.".yellow()
                    );
                }
                Err(SurveyError::EndOfSurvey(_)) => {
                    println!("{}", "This is the last step. Use `submit`.".yellow());
                }
                Err(e) => println!("{} {}", "Error:".red().bold(), e),
            },
            "yes" if session.current_step() == Step::Consent => {
                session.set_consent(true);
                println!("{}", "Consent recorded.".green());
            }
            "no" if session.current_step() == Step::Consent => {
                session.set_consent(false);
                println!("{}", "Consent withdrawn.".yellow());
            }
            "submit" => match submit(&session, store, &dataset).await {
                Ok(receipt) => {
                    println!(
                        "{} dataset now holds {} response(s).",
                        "Uploaded:".green().bold(),
                        receipt.rows
                    );
                    if args.dry_run {
                        if let Some(csv) = memory.contents("dry-run", DEFAULT_DATASET_PATH) {
                            print_dry_run_table(&csv);
                        }
                    }
                    break;
                }
                Err(SurveyError::NotAtReview(step)) => {
                    println!(
                        "{} submit is only available at the review step (currently at {}).",
                        "Error:".red().bold(),
                        step
                    );
                }
                Err(e) => {
                    // Answers are intact; the participant can retry.
                    println!(
                        "{} {}. Your answers are preserved; type `submit` to retry.",
                        "Upload failed:".red().bold(),
                        e
                    );
                }
            },
            other => {
                if let Err(msg) = handle_answer(&mut session, other) {
                    println!("{} {}", "Error:".red().bold(), msg);
                }
            }
        }
    }

    Ok(())
}

fn print_voices() {
    println!("{}", "Voice catalog".bold());
    for voice in VOICE_CATALOG.iter() {
        println!(
            "  {} — {} ({} rate, {} pitch)",
            voice.label.cyan(),
            voice.description,
            voice.rate,
            voice.pitch
        );
    }
}

fn render_step(session: &mut SurveySession) {
    let just_navigated = session.take_just_navigated();
    let (position, total) = session.progress();
    println!();
    println!(
        "{} {}",
        format!("[{}/{}]", position, total).dimmed(),
        session.current_step().to_string().bold()
    );
    if just_navigated {
        println!("{}", "(new step)".dimmed());
    }

    match session.current_step() {
        Step::Consent => {
            println!("{}", CONSENT_TEXT);
            println!("{} (`yes` / `no`, then `c` to continue)", CONSENT_PROMPT);
        }
        Step::Review => {
            let answered = session.answers.answered_count();
            println!(
                "Review: {} field(s) answered. `b` to revise, `submit` to upload.",
                answered
            );
        }
        step => {
            for (i, widget) in session.widgets().iter().enumerate() {
                let current = session
                    .answers
                    .get(&widget.field)
                    .map(|v| v.as_cell())
                    .unwrap_or_default();
                println!(
                    "  {} {} {}",
                    format!("{}.", i + 1).dimmed(),
                    widget.prompt,
                    format_hint(&widget.kind, &current).dimmed()
                );
            }
            println!(
                "{}",
                "Answer with `<number> <value>`; `c` to continue, `b` to go back.".dimmed()
            );
            if step == Step::SessionEmp || step == Step::SessionNeu {
                println!(
                    "{}",
                    "`play` shows the voice playback request for this session.".dimmed()
                );
            }
        }
    }
}

fn format_hint(kind: &InputKind, current: &str) -> String {
    let range = match kind {
        InputKind::Number { min, max } => format!("[{}-{}]", min, max),
        InputKind::Scale { min, max } => format!("[scale {}-{}]", min, max),
        InputKind::Choice(options) => format!("[{}]", options.join(" | ")),
        InputKind::Text => "[text]".to_string(),
        InputKind::TextArea => "[free text]".to_string(),
    };
    if current.is_empty() {
        range
    } else {
        format!("{} (current: {})", range, truncate(current, 40))
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{}…", head)
    }
}

fn handle_answer(session: &mut SurveySession, input: &str) -> Result<(), String> {
    if input == "play" {
        let tone = match session.current_step() {
            Step::SessionEmp => Tone::Empathetic,
            Step::SessionNeu => Tone::Neutral,
            _ => return Err("`play` only works during a voice session step".to_string()),
        };
        match session.playback_for(tone) {
            Some(req) => {
                println!("{} {} ({})", "Playing:".green(), req.voice.label, req.tone);
                println!("{}", req.script.italic());
            }
            None => return Err("chosen voice is not in the catalog".to_string()),
        }
        return Ok(());
    }

    let widgets = session.widgets();
    let (index, value_text) = split_answer(input, widgets.len())?;
    let widget = &widgets[index];
    let value = parse_answer(&widget.kind, value_text)?;
    session.set_answer(&widget.field, value);
    Ok(())
}

/// Split `"3 some value"` into the zero-based widget index and the raw value.
fn split_answer(input: &str, widget_count: usize) -> Result<(usize, &str), String> {
    let (head, rest) = input
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("Unknown command: {}", input))?;
    let number: usize = head
        .parse()
        .map_err(|_| format!("Unknown command: {}", input))?;
    if number == 0 || number > widget_count {
        return Err(format!(
            "No question {} on this step (1-{})",
            number, widget_count
        ));
    }
    Ok((number - 1, rest.trim()))
}

/// Validate raw terminal input against the widget's input kind.
fn parse_answer(kind: &InputKind, raw: &str) -> Result<AnswerValue, String> {
    match kind {
        InputKind::Number { min, max } | InputKind::Scale { min, max } => {
            let n: u32 = raw
                .parse()
                .map_err(|_| format!("Expected a number, got `{}`", raw))?;
            if n < *min || n > *max {
                return Err(format!("{} is outside {}-{}", n, min, max));
            }
            Ok(AnswerValue::Number(n))
        }
        InputKind::Choice(options) => {
            let matched = options
                .iter()
                .find(|opt| opt.eq_ignore_ascii_case(raw))
                .ok_or_else(|| format!("Pick one of: {}", options.join(" | ")))?;
            Ok(AnswerValue::Choice(matched.to_string()))
        }
        InputKind::Text | InputKind::TextArea => Ok(AnswerValue::Text(raw.to_string())),
    }
}

fn print_dry_run_table(csv: &str) {
    println!();
    println!("{}", "Dry-run dataset contents:".bold());
    match Table::from_csv(csv) {
        Ok(table) => {
            for column in table.columns() {
                let cell = table.cell(table.row_count() - 1, column).unwrap_or("");
                if !cell.is_empty() {
                    println!("  {}: {}", column.cyan(), cell);
                }
            }
        }
        Err(_) => println!("{}", csv),
    }
}
