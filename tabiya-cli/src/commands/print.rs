use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use tabiya_graph::codec;
use tabiya_graph::render::render;

#[derive(Args, Debug)]
pub struct PrintArgs {
    /// Path of a graph file written by `tabiya fetch`
    pub path: PathBuf,

    /// Annotate leaf moves with the date they were last played
    #[arg(long)]
    pub dates: bool,
}

pub fn run(args: &PrintArgs) -> anyhow::Result<()> {
    let graph = codec::load(&args.path)
        .with_context(|| format!("cannot load graph from {}", args.path.display()))?;
    print!("{}", render(&graph, args.dates));
    Ok(())
}
