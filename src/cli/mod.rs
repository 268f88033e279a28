// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
// This is the only layer that prints to stdout.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EncodeArgs, PrepareArgs};

use crate::application::prepare_use_case::PrepSummary;

#[derive(Parser, Debug)]
#[command(
    name = "caption-prep",
    version,
    about = "Build a caption vocabulary and padded caption sequences from COCO annotations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Encode(args)  => run_encode(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    tracing::info!("Preparing captions from '{}'", args.annotations_dir.display());

    let summary = PrepareUseCase::new(args.into()).execute()?;
    print!("{}", prepare_report(&summary));
    Ok(())
}

/// The stdout report for a finished `prepare` run, one count per line.
fn prepare_report(summary: &PrepSummary) -> String {
    let mut lines = vec![format!(
        "Total image-caption pairs with cached features: {}",
        summary.total_pairs
    )];
    if summary.used_pairs != summary.total_pairs {
        lines.push(format!("Using subset: {}", summary.used_pairs));
    }
    lines.push(format!("Total captions: {}", summary.used_pairs));
    lines.push(format!("Distinct images: {}", summary.distinct_images));
    lines.push(format!("Indexed words: {}", summary.vocab_words));
    lines.push(format!("Tokenizer saved to {}", summary.tokenizer_path.display()));
    lines.push(format!("Using max_len = {}", summary.max_len));
    lines.push(format!("Caption dataset saved to {}", summary.data_path.display()));

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    use crate::application::encode_use_case::EncodeUseCase;

    let rows = EncodeUseCase::new(args.tokenizer, args.max_len).encode(&args.captions)?;

    for (caption, row) in args.captions.iter().zip(rows.rows()) {
        let ids: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        println!("{caption}\t[{}]", ids.join(", "));
    }
    Ok(())
}
