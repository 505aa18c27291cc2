use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

use alphatrie::{run_script, run_script_lenient, Outcome, Trie};
use anyhow::Context;
use clap::Args;
use tokio::io::AsyncReadExt;

use crate::*;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script to run. Read from stdin when omitted.
    #[arg(name = "SCRIPT")]
    script: Option<PathBuf>,
    /// Log and skip bad lines instead of stopping at the first one.
    #[arg(short, long)]
    keep_going: bool,
    /// Keys to insert before the script runs.
    #[arg(short, long)]
    preload: Option<Vec<String>>,
}

pub async fn execute_run(args: RunArgs, json: bool) -> anyhow::Result<()> {
    let script = match &args.script {
        Some(path) => read_script(path).await?,
        None => {
            if std::io::stdin().is_terminal() {
                anyhow::bail!("no script given, pass a path or pipe one on stdin");
            }
            let mut buf = Vec::with_capacity(256);
            tokio::io::stdin().read_to_end(&mut buf).await?;
            String::from_utf8_lossy(&buf).to_string()
        }
    };

    let outcomes = run_with_preload(&script, args.preload.unwrap_or_default(), args.keep_going)?;
    print_outcomes(&outcomes, json)
}

async fn read_script(path: &Path) -> anyhow::Result<String> {
    let script = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read script {}", path.display()))?;
    info!("Loaded {} lines from {}", script.lines().count(), path.display());
    Ok(script)
}

fn run_with_preload(
    script: &str,
    preload: Vec<String>,
    keep_going: bool,
) -> anyhow::Result<Vec<Outcome>> {
    let mut trie = Trie::new();
    for key in preload {
        trie.insert(&key)
            .with_context(|| format!("cannot preload {:?}", key))?;
    }
    debug!("Preloaded trie has {} nodes", trie.node_count());

    if keep_going {
        Ok(run_script_lenient(&mut trie, script))
    } else {
        Ok(run_script(&mut trie, script)?)
    }
}
