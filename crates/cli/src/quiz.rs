// FILE: crates/cli/src/quiz.rs
//! Interactive quiz on stdin

use crate::content;
use anyhow::Result;
use console::style;
use std::io::{BufRead, Write};
use vinylcast_config::Config;
use vinylcast_core::QuizSession;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn take_quiz(config: &Config) -> Result<()> {
    let quiz = content::quiz(config.app.catalog_path.as_deref())?;
    let mut session = QuizSession::new(quiz);

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    run_quiz(&mut session, stdin.lock(), &mut stdout)
}

/// Parses `B`, `b` or `2` into an option index
pub fn parse_choice(input: &str) -> Option<usize> {
    let input = input.trim();
    let mut chars = input.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return input.parse::<usize>().ok()?.checked_sub(1);
    }

    let upper = first.to_ascii_uppercase();
    if let Some(index) = OPTION_LABELS.iter().position(|&label| label == upper) {
        return Some(index);
    }
    first.to_digit(10)?.checked_sub(1).map(|d| d as usize)
}

fn label(index: usize) -> String {
    OPTION_LABELS
        .get(index)
        .map(|c| c.to_string())
        .unwrap_or_else(|| (index + 1).to_string())
}

/// Runs questions until the quiz finishes or input ends
pub fn run_quiz<R, W>(session: &mut QuizSession, input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(question) = session.current_question().cloned() {
        writeln!(
            out,
            "\nQuestion {}/{}: {}",
            session.current_index() + 1,
            session.total(),
            style(&question.question).bold()
        )?;
        for (index, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}. {}", label(index), option)?;
        }

        let outcome = loop {
            write!(out, "Your answer: ")?;
            out.flush()?;

            let Some(line) = lines.next() else {
                writeln!(out)?;
                return Ok(());
            };
            let line = line?;

            match parse_choice(&line).and_then(|choice| session.answer(choice)) {
                Some(outcome) => break outcome,
                None => writeln!(out, "Please pick one of the listed options.")?,
            }
        };

        if outcome.correct {
            writeln!(out, "{} Correct!", style("✓").green().bold())?;
        } else {
            writeln!(
                out,
                "{} Wrong. The answer is {}.",
                style("✗").red().bold(),
                label(outcome.correct_answer)
            )?;
        }
        writeln!(out, "  {}", outcome.explanation)?;

        session.advance();
    }

    let tier = session.score_tier();
    writeln!(
        out,
        "\nScore: {}/{}. {} {}",
        session.score(),
        session.total(),
        style(tier.title()).bold(),
        tier.message()
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use vinylcast_core::Quiz;

    fn session() -> QuizSession {
        QuizSession::new(content::quiz(None).unwrap())
    }

    fn answers_for(quiz: &Quiz, correct: usize) -> String {
        (0..quiz.len())
            .map(|i| {
                let q = quiz.get(i).unwrap();
                let pick = if i < correct {
                    q.correct_answer
                } else {
                    (q.correct_answer + 1) % q.options.len()
                };
                format!("{}\n", pick + 1)
            })
            .collect()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("a"), Some(0));
        assert_eq!(parse_choice(" C "), Some(2));
        assert_eq!(parse_choice("4"), Some(3));
        assert_eq!(parse_choice("12"), Some(11));
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice(""), None);
        assert_eq!(parse_choice("xyz"), None);
    }

    #[test]
    fn test_perfect_run() {
        let quiz = content::quiz(None).unwrap();
        let input = answers_for(&quiz, quiz.len());
        let mut session = session();
        let mut out = Vec::new();

        run_quiz(&mut session, Cursor::new(input), &mut out).unwrap();

        assert!(session.is_finished());
        assert_eq!(session.score(), 8);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Score: 8/8"));
        assert!(text.contains("Excellent!"));
    }

    #[test]
    fn test_invalid_input_reprompts() {
        let quiz = content::quiz(None).unwrap();
        let input = format!("z\n9\n{}", answers_for(&quiz, 4));
        let mut session = session();
        let mut out = Vec::new();

        run_quiz(&mut session, Cursor::new(input), &mut out).unwrap();

        assert_eq!(session.score(), 4);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Please pick one of the listed options.").count(), 2);
        assert!(text.contains("Score: 4/8"));
        assert!(text.contains("Not bad!"));
    }

    #[test]
    fn test_input_ending_early_stops_quietly() {
        let mut session = session();
        let mut out = Vec::new();

        run_quiz(&mut session, Cursor::new("C\n"), &mut out).unwrap();

        assert!(!session.is_finished());
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.score(), 1);
    }
}
