//! The `quizbank plan` command.

use anyhow::Result;

use quizbank_core::Band;

use crate::SessionArgs;

pub fn execute(args: SessionArgs) -> Result<()> {
    let (_, mut scheduler) = super::open_session(&args, false)?;

    println!(
        "Plan for {} ({} questions, {})",
        scheduler.libraries_used_description(),
        scheduler.current_question_count(),
        if scheduler.is_randomized() {
            "biased"
        } else {
            "sequential"
        }
    );

    let limit = args.limit.unwrap_or(usize::MAX);
    let mut n = 0;
    while n < limit {
        let Some(question) = scheduler.next_question() else {
            break;
        };
        n += 1;
        println!(
            "{n:>4}  {}  {:<24} {}",
            Band::of(&question),
            question.key(),
            question.prompt()
        );
    }

    Ok(())
}
