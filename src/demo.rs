use std::time::Instant;

use alphatrie::{run_script, Trie, REFERENCE_SCRIPT};
use clap::Args;

use crate::*;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print the reference script instead of running it.
    #[arg(long)]
    show_script: bool,
}

pub async fn execute_demo(args: DemoArgs, json: bool) -> anyhow::Result<()> {
    if args.show_script {
        print!("{}", REFERENCE_SCRIPT);
        return Ok(());
    }

    let mut trie = Trie::new();
    let outcomes = {
        let start = Instant::now();
        let res = run_script(&mut trie, REFERENCE_SCRIPT)?;
        debug!("Reference script took {} us", start.elapsed().as_micros());
        res
    };
    info!("Trie holds {} nodes after the demo", trie.node_count());

    print_outcomes(&outcomes, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_demo() {
        let _ = tracing_subscriber::fmt::try_init();
        execute_demo(DemoArgs { show_script: false }, false)
            .await
            .unwrap();
        execute_demo(DemoArgs { show_script: true }, false)
            .await
            .unwrap();
    }
}
