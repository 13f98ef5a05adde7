use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use config::{EmbedMode, FileConfig, Overrides, Settings};
use serde::Serialize;
use specforge_chunker::{Chunk, Chunker, ChunkerConfig};
use specforge_document::{DocumentStore, FileDocumentStore, InitOutcome};
use specforge_protocol::{parse_batch, response_schema_json, serialize_json};
use specforge_resolver::UpdatePipeline;
use specforge_vector_store::{
    EmbeddingIndex, EmbeddingProvider, OllamaEmbedder, RebuildPolicy, StubEmbedder,
};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

mod config;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "specforge")]
#[command(about = "Resolve protocol change batches against a Markdown specification", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// TOML file with defaults for the options below
    #[arg(long, global = true, env = "SPECFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding `<name>.md` documents (default: ./data)
    #[arg(long, global = true, env = "SPECFORGE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory for `<name>_vectors.json` caches (default: the data directory)
    #[arg(long, global = true, env = "SPECFORGE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Ollama base URL
    #[arg(long, global = true, env = "OLLAMA_HOST")]
    ollama_host: Option<String>,

    /// Embedding model name
    #[arg(long, global = true, env = "SPECFORGE_EMBED_MODEL")]
    embed_model: Option<String>,

    /// Embedding backend
    #[arg(long, global = true, value_enum, env = "SPECFORGE_EMBED_MODE")]
    embed_mode: Option<EmbedMode>,

    /// Seconds to wait for one embedding request (default: 30)
    #[arg(long, global = true, env = "SPECFORGE_EMBED_TIMEOUT_SECS")]
    embed_timeout_secs: Option<u64>,

    /// When the section index is re-embedded: always|on-change
    #[arg(long, global = true, env = "SPECFORGE_REBUILD_POLICY")]
    rebuild_policy: Option<RebuildPolicy>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            cache_dir: self.cache_dir.clone(),
            ollama_host: self.ollama_host.clone(),
            embed_model: self.embed_model.clone(),
            embed_mode: self.embed_mode,
            embed_timeout_secs: self.embed_timeout_secs,
            rebuild_policy: self.rebuild_policy,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the update intents of a protocol batch
    Parse(BatchArgs),

    /// Print each intent of a batch split into change units
    Chunk(BatchArgs),

    /// Print the section structure of a document
    Structure(DocArgs),

    /// Create a document from the default skeleton
    Init(InitArgs),

    /// Resolve a batch against a document and print the response envelope
    Resolve(ResolveArgs),

    /// Print the JSON schema of the resolve output
    Schema,
}

#[derive(Args)]
struct BatchArgs {
    /// Batch file, or `-` for stdin
    batch: String,
}

#[derive(Args)]
struct DocArgs {
    /// Document name
    #[arg(long, default_value = "default")]
    doc: String,
}

#[derive(Args)]
struct InitArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Overwrite an existing document with the skeleton
    #[arg(long)]
    reset: bool,
}

#[derive(Args)]
struct ResolveArgs {
    #[command(flatten)]
    doc: DocArgs,

    /// Batch file, or `-` for stdin
    batch: String,
}

#[derive(Serialize)]
struct ChunkedIntent {
    target_path: String,
    change_summary: String,
    chunks: Vec<Chunk>,
}

#[derive(Serialize)]
struct InitOutput {
    document: String,
    path: PathBuf,
    status: &'static str,
    message: String,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let file_config = match &cli.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(cli.overrides(), file_config);
    log::debug!("Settings: {settings:?}");

    match cli.command {
        Commands::Parse(args) => run_parse(&args)?,
        Commands::Chunk(args) => run_chunk(&args)?,
        Commands::Structure(args) => run_structure(&args, &settings).await?,
        Commands::Init(args) => run_init(&args, &settings).await?,
        Commands::Resolve(args) => run_resolve(&args, &settings).await?,
        Commands::Schema => print_stdout(&response_schema_json()?)?,
    }

    Ok(())
}

fn read_batch(source: &str) -> Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read batch from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(source).with_context(|| format!("Failed to read batch from {source}"))
}

fn run_parse(args: &BatchArgs) -> Result<()> {
    let text = read_batch(&args.batch)?;
    let intents = parse_batch(&text)?;
    print_stdout(&serialize_json(&intents)?)
}

fn run_chunk(args: &BatchArgs) -> Result<()> {
    let text = read_batch(&args.batch)?;
    let chunker = Chunker::new(ChunkerConfig::for_intents())?;
    let chunked: Vec<ChunkedIntent> = parse_batch(&text)?
        .into_iter()
        .map(|intent| ChunkedIntent {
            chunks: chunker.chunk(&intent.raw_body),
            target_path: intent.target_path,
            change_summary: intent.change_summary,
        })
        .collect();
    print_stdout(&serialize_json(&chunked)?)
}

fn open_store(settings: &Settings) -> Result<FileDocumentStore> {
    FileDocumentStore::open(&settings.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            settings.data_dir.display()
        )
    })
}

async fn run_structure(args: &DocArgs, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let structure = store.get_structure(&args.doc).await?;
    print_stdout(&serialize_json(&structure)?)
}

async fn run_init(args: &InitArgs, settings: &Settings) -> Result<()> {
    let store = open_store(settings)?;
    let name = &args.doc.doc;
    let outcome = store.init_document(name, args.reset).await?;
    let (status, message) = match outcome {
        InitOutcome::Initialized { reset } => (
            "initialized",
            format!("Document '{name}' initialized (Reset: {reset})."),
        ),
        InitOutcome::Loaded => ("loaded", format!("Document '{name}' loaded.")),
    };
    let output = InitOutput {
        document: name.clone(),
        path: store.document_path(name),
        status,
        message,
    };
    print_stdout(&serialize_json(&output)?)
}

fn build_embedder(settings: &Settings) -> Result<Arc<dyn EmbeddingProvider>> {
    match settings.embed_mode {
        EmbedMode::Stub => Ok(Arc::new(StubEmbedder::default())),
        EmbedMode::Ollama => {
            let embedder = OllamaEmbedder::new(
                &settings.ollama_host,
                settings.embed_model.clone(),
                settings.embed_timeout,
            )?;
            log::debug!("Embedding via {}", embedder.endpoint());
            Ok(Arc::new(embedder))
        }
    }
}

async fn run_resolve(args: &ResolveArgs, settings: &Settings) -> Result<()> {
    let text = read_batch(&args.batch)?;
    let documents: Arc<dyn DocumentStore> = Arc::new(open_store(settings)?);
    let index = EmbeddingIndex::new(documents.clone(), build_embedder(settings)?)
        .with_policy(settings.rebuild_policy)
        .with_cache_dir(&settings.cache_dir);
    let pipeline = UpdatePipeline::new(documents, Arc::new(index));

    let response = pipeline
        .process(&args.doc.doc, &text)
        .await
        .context("Resolution failed")?;
    print_stdout(&serialize_json(&response)?)
}
