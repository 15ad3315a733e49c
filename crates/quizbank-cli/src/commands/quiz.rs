//! The `quizbank quiz` command.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use quizbank_core::history::{QuizHistory, SessionTally};
use quizbank_core::{Question, Scheduler};

use crate::SessionArgs;

/// Typed on its own line to skip the current question.
const SKIP: &str = ":skip";
/// Typed on its own line to end the session early.
const QUIT: &str = ":quit";

pub fn execute(args: SessionArgs) -> Result<()> {
    let (config, mut scheduler) = super::open_session(&args, true)?;

    println!(
        "Quiz: {} ({} questions)",
        scheduler.libraries_used_description(),
        scheduler.current_question_count()
    );
    println!("Type the answer and press enter. Empty line or {SKIP} skips, {QUIT} ends.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let tally = run_session(&mut scheduler, stdin.lock(), &mut stdout, args.limit)?;

    println!(
        "\nSession complete: {} answered, {} skipped, {} / {} marks ({}%)",
        tally.answered,
        tally.skipped,
        tally.marks_awarded,
        tally.marks_available,
        tally.percentage()
    );

    if tally.answered + tally.skipped > 0 {
        let entry = tally.into_entry(scheduler.libraries_used_description());
        QuizHistory::append(&config.history_file, entry).with_context(|| {
            format!("failed to record history in {}", config.history_file.display())
        })?;
        tracing::debug!(path = %config.history_file.display(), "session recorded");
    }

    Ok(())
}

/// Ask questions until the pool runs out, the limit is hit, the user quits,
/// or input ends. An unreadable line ends the session like end of input, so
/// answers already persisted still reach the tally.
pub fn run_session<R: BufRead, W: Write>(
    scheduler: &mut Scheduler,
    mut input: R,
    output: &mut W,
    limit: Option<usize>,
) -> Result<SessionTally> {
    let mut tally = SessionTally::default();
    let mut asked = 0usize;
    let mut line = String::new();

    while limit.map_or(true, |max| asked < max) {
        let Some(mut question) = scheduler.next_question() else {
            break;
        };
        let remaining = scheduler.current_question_count();
        asked += 1;

        writeln!(output, "[{asked}] ({remaining} left) {}", question.prompt())?;
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("cannot read answer, ending session: {e}");
                break;
            }
        }
        let reply = line.trim();

        if reply == QUIT {
            break;
        }
        if reply.is_empty() || reply == SKIP {
            writeln!(output, "Skipped. Answer: {}\n", question.answer())?;
            tally.record_skip();
            continue;
        }

        let available = question.marks_per_correct_answer();
        let awarded = if is_correct(reply, question.answer()) {
            writeln!(output, "Correct!")?;
            available
        } else {
            writeln!(output, "Incorrect. Answer: {}", question.answer())?;
            0
        };
        if let Some(note) = question.post_answer() {
            writeln!(output, "{note}")?;
        }
        writeln!(output)?;

        question.record_answer(awarded, available);
        tally.record_answer(awarded, available);
        save(scheduler, &question);
    }

    Ok(tally)
}

fn save(scheduler: &Scheduler, question: &Question) {
    if let Err(e) = scheduler.persist(question) {
        tracing::error!(question = %question.key(), "answer not saved: {e:#}");
    }
}

/// Compare answers ignoring case and runs of whitespace.
pub fn is_correct(given: &str, expected: &str) -> bool {
    normalize(given) == normalize(expected)
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
