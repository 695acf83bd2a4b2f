use std::path::PathBuf;

use clap::Parser;

use localqa_core::samples::write_sample_documents;

/// Writes the sample corpus (two product manuals, an employee handbook and a
/// return policy) as .txt files.
#[derive(Parser)]
#[command(name = "localqa-sample-docs", version, about = "Create sample documents for localqa")]
struct Cli {
    /// Target directory, created if missing
    #[arg(long, default_value = "docs")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let written = write_sample_documents(&cli.out)?;
    for path in &written {
        println!("Created: {}", path.display());
    }
    println!("\nSuccessfully created {} sample documents in '{}' directory", written.len(), cli.out.display());
    Ok(())
}
