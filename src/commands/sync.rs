use anyhow::Result;
use colored::Colorize;

use crate::clients::git::RemoteOps;
use crate::index::TopologyIndex;
use crate::indexer::Indexer;

/// Run one index refresh and print what is known afterwards.
pub async fn cmd_sync<R: RemoteOps>(
    indexer: &Indexer<R>,
    stdout: &mut impl std::io::Write,
) -> Result<()> {
    let report = indexer.sync_once().await?;
    writeln!(
        stdout,
        "Indexed {} folder{}, {} new file{}",
        report.folders,
        if report.folders == 1 { "" } else { "s" },
        report.files_added,
        if report.files_added == 1 { "" } else { "s" },
    )?;
    for folder in &report.skipped {
        writeln!(stdout, "{} {}", "Skipped unreadable folder".yellow(), folder)?;
    }
    print_index(indexer.index(), stdout)
}

pub fn print_index(index: &TopologyIndex, stdout: &mut impl std::io::Write) -> Result<()> {
    for (folder, files) in index.snapshot() {
        writeln!(stdout, "{}/", folder.cyan().bold())?;
        for file in files {
            writeln!(stdout, "  {}", file)?;
        }
    }
    Ok(())
}
