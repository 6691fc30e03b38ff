use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "newscard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default card state for a template as JSON.
    Defaults(DefaultsArgs),
    /// Load every image a card references, render it and export a PNG.
    Render(RenderArgs),
    /// List a map catalog file.
    Maps(MapsArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindChoice {
    Interview,
    Connection,
}

impl From<KindChoice> for newscard::TemplateKind {
    fn from(k: KindChoice) -> Self {
        match k {
            KindChoice::Interview => newscard::TemplateKind::Interview,
            KindChoice::Connection => newscard::TemplateKind::Connection,
        }
    }
}

#[derive(Parser, Debug)]
struct DefaultsArgs {
    #[arg(long, value_enum, default_value_t = KindChoice::Interview)]
    kind: KindChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Card state JSON. Relative image paths resolve against its directory.
    #[arg(long)]
    state: PathBuf,

    /// Render config JSON (font files, clear color).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// File name without extension. Defaults to one derived from the card's names.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Parser, Debug)]
struct MapsArgs {
    /// Map catalog JSON: {"category": [{"name": ..., "url": ...}]}.
    #[arg(long)]
    catalog: PathBuf,

    /// Only list this category.
    #[arg(long)]
    category: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Defaults(args) => cmd_defaults(args),
        Command::Render(args) => cmd_render(args),
        Command::Maps(args) => cmd_maps(args),
    }
}

fn cmd_defaults(args: DefaultsArgs) -> anyhow::Result<()> {
    let state = newscard::CardState::defaults(args.kind.into());
    println!("{}", state.to_json_pretty()?);
    Ok(())
}

fn read_state(path: &Path) -> anyhow::Result<newscard::CardState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read card state '{}'", path.display()))?;
    Ok(newscard::CardState::from_json(&json)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let state = read_state(&args.state)?;
    let config = match &args.config {
        Some(path) => newscard::RenderConfig::load(path)?,
        None => newscard::RenderConfig::default(),
    };

    let base_dir = args.state.parent().unwrap_or_else(|| Path::new("."));
    let fetcher = newscard::DefaultFetcher::new()?.with_base_dir(base_dir);
    let mut loader = newscard::AssetLoader::new(fetcher);
    loader.sync(&state);
    for event in loader.load_all() {
        if let newscard::LoadEvent::FailedFinal(source) = event {
            eprintln!("warning: could not load image '{}'", newscard::short_source(&source));
        }
    }

    let text = config.text_engine()?;
    let mut backend = newscard::create_backend(
        newscard::BackendKind::Cpu,
        &config.render_settings(),
        text,
    );
    let frame = newscard::render_card(&state, &loader, backend.as_mut())?;

    let name = args
        .name
        .unwrap_or_else(|| newscard::default_filename(&state));
    let path = newscard::export_png(&frame, &args.out, &name)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_maps(args: MapsArgs) -> anyhow::Result<()> {
    let catalog = newscard::MapCatalog::load(&args.catalog)?;
    let categories: Vec<&str> = match &args.category {
        Some(c) => {
            if !catalog.categories().any(|known| known == c) {
                anyhow::bail!("unknown category '{c}'");
            }
            vec![c.as_str()]
        }
        None => catalog.categories().collect(),
    };
    for category in categories {
        println!("{category}");
        for entry in catalog.maps_in(category) {
            println!("  {}\t{}", entry.name, entry.url);
        }
    }
    Ok(())
}
