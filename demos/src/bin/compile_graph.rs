//! # Compile Graph
//!
//! Loads a render graph description, compiles it against the dummy backend
//! and prints the execution order, resource report and recorded commands.
//!
//! ```bash
//! # Built-in deferred lighting graph
//! compile_graph --verbose
//!
//! # Graph from file, naive strategy, two frames
//! compile_graph --graph demos/graphs/blur_chain.ron --naive --frames 2
//!
//! # Write the built-in graph out as a starting point
//! compile_graph --write-default my_graph.ron
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use redlilium_render_graph::compiler::report;
use redlilium_render_graph::{
    CommandStream, CompileContext, CompileStrategy, CompilerConfig, ConfigError,
    DefaultNodeFactory, DummyBackend, EditorError, Extent2d, GraphDescription, GraphEditor,
    RecordedCommand, RenderGraphCompiler, RenderPathSlot, SceneHandles,
};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("compile failed: {0}")]
    Compile(String),
}

/// Compiler strategy selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CliStrategy {
    /// One physical resource per output port.
    Naive,
    /// Alias compatible images with disjoint lifetimes.
    Optimized,
}

impl From<CliStrategy> for CompileStrategy {
    fn from(cli: CliStrategy) -> Self {
        match cli {
            CliStrategy::Naive => CompileStrategy::Naive,
            CliStrategy::Optimized => CompileStrategy::Optimized,
        }
    }
}

/// RedLilium render graph compiler.
#[derive(Parser, Debug)]
#[command(name = "compile_graph", about = "Compile a RedLilium render graph")]
struct Args {
    /// Graph description (RON). Defaults to the built-in deferred lighting graph.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Compiler configuration (RON). Command line flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resource assignment strategy.
    #[arg(long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Shorthand for `--strategy naive`.
    #[arg(long, conflicts_with = "strategy")]
    naive: bool,

    /// Log inputs, culling, order and resource reports.
    #[arg(short, long)]
    verbose: bool,

    /// Render resolution width.
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Render resolution height.
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Directory for verbose reports.
    #[arg(long)]
    dump_dir: Option<PathBuf>,

    /// Fail on resources of unknown type.
    #[arg(long)]
    strict: bool,

    /// Number of frames to execute after compiling.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Write the built-in graph description to this file and exit.
    #[arg(long)]
    write_default: Option<PathBuf>,
}

impl Args {
    fn compiler_config(&self) -> Result<CompilerConfig, DemoError> {
        let mut config = match &self.config {
            Some(path) => CompilerConfig::load(path)?,
            None => CompilerConfig::default(),
        };
        if self.naive {
            config.strategy = CompileStrategy::Naive;
        } else if let Some(strategy) = self.strategy {
            config.strategy = strategy.into();
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            config.render_resolution = Extent2d::new(width, height);
        }
        if let Some(dir) = &self.dump_dir {
            config.dump_dir = Some(dir.clone());
        }
        config.verbose |= self.verbose;
        config.strict_resource_types |= self.strict;
        Ok(config)
    }

    fn graph(&self) -> Result<GraphEditor, DemoError> {
        let description = match &self.graph {
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|source| DemoError::Io {
                    path: path.clone(),
                    source,
                })?;
                GraphDescription::from_ron(&source)?
            }
            None => GraphDescription::deferred_lighting(),
        };
        Ok(GraphEditor::from_description(&description)?)
    }
}

fn run(args: &Args) -> Result<(), DemoError> {
    if let Some(path) = &args.write_default {
        let text = GraphDescription::deferred_lighting().to_ron()?;
        std::fs::write(path, text).map_err(|source| DemoError::Io {
            path: path.clone(),
            source,
        })?;
        log::info!("Wrote default graph to {}", path.display());
        return Ok(());
    }

    let config = args.compiler_config()?;
    let verbose = config.verbose;
    let editor = args.graph()?;
    log::info!(
        "Loaded graph with {} node(s) and {} edge(s)",
        editor.nodes().len(),
        editor.edges().len()
    );

    let backend = DummyBackend::new();
    let ctx = CompileContext::new(&backend, &DefaultNodeFactory, SceneHandles::default());
    let (nodes, edges) = editor.snapshot();
    let result = RenderGraphCompiler::new(config).compile(&nodes, &edges, false, &ctx);

    for line in &result.logs {
        println!("{line}");
    }
    // Verbose compiles already carry the timeline in their logs.
    if let Some(optimization) = result.optimization.as_ref().filter(|_| !verbose) {
        println!();
        print!("{}", report::optimization_timeline(optimization));
    }

    let slot = RenderPathSlot::new();
    slot.adopt(result).map_err(|e| DemoError::Compile(e.to_string()))?;
    let Some(path) = slot.current() else {
        return Err(DemoError::Compile("no render path installed".to_string()));
    };

    println!();
    println!("Render path: {}", path.node_names().join(" -> "));
    println!(
        "Resources: {} ({} image(s) allocated by {})",
        path.resources().len(),
        path.resources().image_count(),
        backend.created_count()
    );

    for frame in 0..args.frames {
        let mut commands = CommandStream::new();
        path.execute(&mut commands, frame);
        println!();
        println!("Frame {frame}:");
        for command in commands.commands() {
            match command {
                RecordedCommand::BeginPass { name, .. } => println!("  {name}"),
                RecordedCommand::Read { port, resource } => {
                    println!("    read  {port:<20} <- resource {resource}")
                }
                RecordedCommand::Write { port, resource } => {
                    println!("    write {port:<20} -> resource {resource}")
                }
                RecordedCommand::EndPass => {}
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
