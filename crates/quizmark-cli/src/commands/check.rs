//! The `quizmark check` command.

use anyhow::Result;

use quizmark_core::evaluator::{evaluate, DEFAULT_THRESHOLD};
use quizmark_core::model::SessionConfig;
use quizmark_core::similarity::compare;
use quizmark_core::text::normalize;

pub fn execute(answer: String, reference: String, threshold: Option<f64>, json: bool) -> Result<()> {
    let threshold = threshold.unwrap_or(DEFAULT_THRESHOLD);
    SessionConfig {
        threshold,
        ..SessionConfig::default()
    }
    .validate()?;

    let verdict = evaluate(&answer, &reference, threshold);
    let comparison = compare(&answer, &reference);

    if json {
        let report = serde_json::json!({
            "answer": normalize(&answer),
            "reference": normalize(&reference),
            "verdict": verdict,
            "comparison": comparison,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Answer:    {}", normalize(&answer));
    println!("Reference: {}", normalize(&reference));
    println!("Calculated Similarity: {:.2}%", verdict.score * 100.0);
    println!(
        "Result: {} (threshold {:.2}%)",
        verdict.outcome.to_string().to_uppercase(),
        threshold * 100.0
    );
    println!(
        "Matched {} of {} words.",
        comparison.matched.len(),
        comparison.union_size()
    );
    if !comparison.missing.is_empty() {
        println!("Missing: {}", comparison.missing.join(", "));
    }
    if !comparison.extra.is_empty() {
        println!("Not in the reference: {}", comparison.extra.join(", "));
    }

    Ok(())
}
