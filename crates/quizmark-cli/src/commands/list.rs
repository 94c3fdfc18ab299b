//! The `quizmark list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::bank;

pub fn execute(bank_path: Option<PathBuf>, tags: Option<String>) -> Result<()> {
    let mut bank = bank::resolve(bank_path.as_deref())?;
    bank::filter_tags(&mut bank, tags.as_deref())?;

    println!("Bank: {} ({} questions)", bank.name, bank.questions.len());
    if !bank.description.is_empty() {
        println!("{}", bank.description);
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Id", "Name", "Tags"]);
    for (i, question) in bank.questions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&question.id),
            Cell::new(&question.name),
            Cell::new(question.tags.join(", ")),
        ]);
    }

    println!("\n{table}");
    Ok(())
}
