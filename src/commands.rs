//! CLI command implementations

use anyhow::Context;
use std::path::Path;
use tracegraph_core::document::load_json;
use tracegraph_core::{
    CommandScript, EngineConfig, Expansion, ExpansionRequest, GraphDocument, GraphStore,
    VolumeScale,
};
use tracegraph_layout::{LongestPathLayout, layout_store};

pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Cannot load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

pub fn expand(
    graph: &Path,
    paths: &Path,
    incoming: bool,
    out: Option<&Path>,
    config: EngineConfig,
) -> anyhow::Result<()> {
    let mut store = open_store(graph, config)?;

    let mut request: ExpansionRequest = load_json(paths)
        .with_context(|| format!("Cannot read expansion request {}", paths.display()))?;
    request.incoming |= incoming;

    let expanded = store
        .expand(&Expansion::from(request))
        .context("Expansion rejected")?;

    println!("{}", expanded.diff.summary());
    println!("final node: {}", expanded.final_node);
    save_store(&store, out.unwrap_or(graph))
}

pub fn layout(graph: &Path, out: Option<&Path>, config: EngineConfig) -> anyhow::Result<()> {
    let mut store = open_store(graph, config)?;

    let diff = layout_store(&mut store, &LongestPathLayout).context("Layout failed")?;

    println!("{}", diff.summary());
    save_store(&store, out.unwrap_or(graph))
}

pub fn scale(graph: &Path, volume: f64, config: &EngineConfig) -> anyhow::Result<()> {
    let document = GraphDocument::load(graph)
        .with_context(|| format!("Cannot read graph {}", graph.display()))?;

    let stats = VolumeScale::from_edges(&document.nodes, &document.edges);
    let style = stats.style(volume, &config.stroke);
    tracing::debug!(
        "Volume stats over {} edges: mean {}, std dev {}",
        stats.samples,
        stats.mean,
        stats.std_dev
    );

    println!("scale: {:.4}", stats.scale(volume));
    println!("width: {:.2}", style.width);
    println!("opacity: {:.2}", style.opacity);
    Ok(())
}

pub fn replay(
    graph: &Path,
    script: &Path,
    out: Option<&Path>,
    config: EngineConfig,
) -> anyhow::Result<()> {
    let mut store = open_store(graph, config)?;

    let CommandScript(commands) = load_json(script)
        .with_context(|| format!("Cannot read script {}", script.display()))?;
    tracing::info!("Replaying {} command(s)", commands.len());

    for (i, command) in commands.into_iter().enumerate() {
        let diff = store
            .apply(command)
            .with_context(|| format!("Command {} failed", i + 1))?;
        tracing::info!("[{}] {}", i + 1, diff.summary());
    }

    println!(
        "{} nodes, {} edges, undo {}, redo {}",
        store.nodes().len(),
        store.edges().len(),
        store.can_undo(),
        store.can_redo()
    );
    save_store(&store, out.unwrap_or(graph))
}

fn open_store(graph: &Path, config: EngineConfig) -> anyhow::Result<GraphStore> {
    let document = GraphDocument::load(graph)
        .with_context(|| format!("Cannot read graph {}", graph.display()))?;
    Ok(GraphStore::from_parts(document.nodes, document.edges, config)?)
}

fn save_store(store: &GraphStore, path: &Path) -> anyhow::Result<()> {
    GraphDocument::from_store(store)
        .save(path)
        .with_context(|| format!("Cannot write graph {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}
