//! Console frontend: plays a quiz session over a line-based reader and writer.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};

use comfy_table::{Cell, Table};

use quizmark_core::driver::QuizFrontend;
use quizmark_core::evaluator::Outcome;
use quizmark_core::model::SessionConfig;
use quizmark_core::report::{SessionOutcome, SessionSummary};
use quizmark_core::session::{AnswerResult, RenderRequest};
use quizmark_core::similarity::Comparison;

const STARS: &str = "********************************************************";
const RULE: &str = "=======================================================";
const DIVIDER: &str = "-------------------------------------------------------";

/// Interactive frontend over stdin/stdout (or any reader and writer).
///
/// End of input is not an error: `read_answer` returns an empty answer and
/// `input_closed` starts reporting `true`, which lets the driver stop a
/// restart loop. The first write error is kept and returned by [`finish`].
///
/// [`finish`]: ConsoleFrontend::finish
pub struct ConsoleFrontend<R, W> {
    input: R,
    out: W,
    title: String,
    closed: bool,
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> ConsoleFrontend<R, W> {
    pub fn new(input: R, out: W, title: impl Into<String>) -> Self {
        Self {
            input,
            out,
            title: title.into(),
            closed: false,
            error: None,
        }
    }

    /// Flush the writer and hand it back, or return the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn emit(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let written = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write to console");
            self.error = Some(e);
            self.closed = true;
        }
    }

    fn read_line(&mut self) -> String {
        if self.closed {
            return String::new();
        }
        // Bytes, not `read_line`: a stray non-UTF-8 byte is a bad answer,
        // not the end of input.
        let mut buf = Vec::new();
        match self.input.read_until(b'\n', &mut buf) {
            Ok(0) => {
                tracing::debug!("input closed");
                self.closed = true;
                String::new()
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                if let Cow::Owned(_) = line {
                    tracing::debug!("replaced invalid UTF-8 in input");
                }
                line.trim_end_matches(['\n', '\r']).to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                self.closed = true;
                String::new()
            }
        }
    }
}

impl<R: BufRead, W: Write> QuizFrontend for ConsoleFrontend<R, W> {
    fn on_session_start(&mut self, config: &SessionConfig, _question_count: usize) {
        let text = banner(&self.title, config);
        self.emit(&text);
    }

    fn on_attempt_start(&mut self, attempt: u32, config: &SessionConfig) {
        self.emit(&attempt_header(attempt, config));
    }

    fn present(&mut self, request: &RenderRequest) {
        self.emit(&question_block(request));
    }

    fn read_answer(&mut self) -> String {
        self.emit("\n>> ");
        self.read_line()
    }

    fn show_result(&mut self, _request: &RenderRequest, result: &AnswerResult) {
        self.emit(&result_block(result));
    }

    fn on_restart(&mut self, _failed_attempt: u32) {
        self.emit("\nQuiz reset. Press ENTER to begin again.\n\n\n");
        self.read_line();
    }

    fn on_complete(&mut self, summary: &SessionSummary) {
        let text = completion(summary);
        self.emit(&text);
    }

    fn input_closed(&self) -> bool {
        self.closed
    }
}

const BANNER_WIDTH: usize = 52;

/// One boxed banner row; text wider than the box is cut with "...".
fn banner_line(text: &str) -> String {
    if text.chars().count() > BANNER_WIDTH {
        let cut: String = text.chars().take(BANNER_WIDTH - 3).collect();
        return format!("* {cut}... *\n");
    }
    format!("* {text:<width$} *\n", width = BANNER_WIDTH)
}

fn banner(title: &str, config: &SessionConfig) -> String {
    let mode = if config.randomize_order {
        "RANDOMIZED (-r)"
    } else {
        "SEQUENTIAL"
    };
    let matching = if config.skip_mode {
        "KNOWLEDGE/SKIP (-k) ACTIVE".to_string()
    } else {
        format!(
            "STRICT MATCH REQUIRED ({}%)",
            threshold_percent(config.threshold)
        )
    };

    let mut text = format!("\n\n\n{STARS}\n");
    text.push_str(&banner_line(&format!("{title}: STICKLER MASTERY MODE")));
    text.push_str(&banner_line(&format!("Mode: {mode}")));
    text.push_str(&banner_line(&matching));
    text.push_str(&banner_line(
        "Failure on ANY question forces a complete restart!",
    ));
    text.push_str(STARS);
    text.push('\n');
    text
}

fn attempt_header(attempt: u32, config: &SessionConfig) -> String {
    let skip = if config.skip_mode { " / SKIP (-k)" } else { "" };
    format!(
        "\nStarting Quiz Attempt {attempt} (Mode: {}{skip})...\n",
        config.order_mode()
    )
}

fn question_block(request: &RenderRequest) -> String {
    let (tag, instruction) = if request.skip_mode {
        (" [SKIP MODE]", "Press ENTER to continue:")
    } else {
        ("", "Please input the reading:")
    };
    format!(
        "\n\n\n{RULE}\n{}. {}{tag}\n{RULE}\n\n\n{}\n\n{instruction} \n",
        request.number(),
        request.name,
        request.prompt,
    )
}

fn result_block(result: &AnswerResult) -> String {
    let mut text = format!("\n{DIVIDER}\n\n");

    match &result.verdict {
        None => {
            text.push_str("[SKIP MODE ACTIVE]\n");
            if !result.input.is_empty() {
                text.push_str(&format!("Input received: '{}'\n", result.input));
            }
            if let Some(reference) = &result.reference_answer {
                text.push_str(&format!("The correct reading was: \"{reference}\"\n"));
            }
            text.push_str("\n*** ADVANCING *** (Skipping similarity check...)\n");
        }
        Some(verdict) => {
            text.push_str("[RESULT CHECK]\n");
            text.push_str(&format!(
                "Calculated Similarity: {:.2}%\n",
                verdict.score * 100.0
            ));
            if result.outcome == Outcome::Pass {
                text.push_str(&format!(
                    "\n*** CORRECT! *** (Required {}% match met. Proceeding...)\n",
                    threshold_percent(verdict.threshold)
                ));
            } else {
                text.push_str("\n*** INCORRECT ***\n\n");
                if let Some(reference) = &result.reference_answer {
                    text.push_str(&format!("The correct reading was: \"{reference}\"\n"));
                }
                if let Some(comparison) = &result.comparison {
                    text.push_str(&breakdown(comparison));
                }
                text.push_str(&format!(
                    "\nYour answer needs to match the content closer than {:.2}%. \n",
                    verdict.threshold * 100.0
                ));
            }
        }
    }

    text.push_str(&format!("\n{DIVIDER}\n\n"));
    text
}

fn breakdown(comparison: &Comparison) -> String {
    let mut text = format!(
        "\nMatched {} of {} words.\n",
        comparison.matched.len(),
        comparison.union_size()
    );
    if !comparison.missing.is_empty() {
        text.push_str(&format!("Missing: {}\n", comparison.missing.join(", ")));
    }
    if !comparison.extra.is_empty() {
        text.push_str(&format!(
            "Not in the reading: {}\n",
            comparison.extra.join(", ")
        ));
    }
    text
}

fn completion(summary: &SessionSummary) -> String {
    let mut text = String::from("\n\n\n");

    match summary.outcome {
        SessionOutcome::InputClosed => {
            text.push_str(&format!(
                "Input closed. Quiz stopped after {} attempt(s).\n",
                summary.attempt_count()
            ));
        }
        SessionOutcome::Completed => {
            let message = if summary.skip_mode {
                "QUIZ COMPLETE (Knowledge/Skip Mode -k).".to_string()
            } else {
                format!(
                    "CONGRATULATIONS! You mastered all {} parts in order.",
                    summary.question_count
                )
            };
            text.push_str(STARS);
            text.push('\n');
            text.push_str(&banner_line(&message));
            text.push_str(STARS);
            text.push('\n');
        }
    }

    text.push_str(&format!("\n{}\n", summary_table(summary)));
    let started = summary.started_at.with_timezone(&chrono::Local);
    text.push_str(&format!(
        "Order: {} | Threshold: {}% | Started: {} | Elapsed: {:.1}s\n",
        summary.order_mode,
        threshold_percent(summary.threshold),
        started.format("%H:%M:%S"),
        summary.duration_ms as f64 / 1000.0,
    ));
    text
}

fn summary_table(summary: &SessionSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Attempt", "Answered", "Result"]);

    for record in &summary.attempts {
        let result = match (&record.failed_question, record.failed_score) {
            (None, _) => "passed".to_string(),
            (Some(id), Some(score)) => format!("failed at {id} ({:.2}%)", score * 100.0),
            (Some(id), None) => format!("failed at {id}"),
        };
        table.add_row(vec![
            Cell::new(record.attempt),
            Cell::new(format!("{}/{}", record.answered, summary.question_count)),
            Cell::new(result),
        ]);
    }

    table
}

/// `0.75` -> `"75"`, `0.825` -> `"82.5"`.
fn threshold_percent(threshold: f64) -> String {
    let text = format!("{:.2}", threshold * 100.0);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
