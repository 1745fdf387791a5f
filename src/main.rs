use clap::{Parser, Subcommand};
use gallery_manifest::client::ManifestClient;
use gallery_manifest::config::{self, SiteConfig};
use gallery_manifest::fetch::HttpFetcher;
use gallery_manifest::scan::ScanLayout;
use gallery_manifest::source::LocalTree;
use gallery_manifest::types::Language;
use gallery_manifest::{manifest, output};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "gallery-manifest")]
#[command(about = "Manifest generator for a bilingual project-gallery website")]
#[command(long_about = "\
Manifest generator for a bilingual project-gallery website

Each folder under the gallery directory is a project. Its images are listed
in manifest.json so the site can render the gallery without scanning the
server at page load.

Site structure:

  Gallery/
  ├── Villa Compound-فيلا كومباوند/   # \"English-Arabic\" folder name → both display names
  │   ├── thumb.jpg                    # Project thumbnail (else: first image found)
  │   ├── 1.jpg
  │   └── interior/2.png               # Nested folders are included
  └── برج الشروق/                      # Arabic-only name → English name synthesized
  images/                              # Hero banner images (flat; no thumb/logo files)
  manifest.json                        # Written by `generate`

Categories come from keywords in the folder name: commercial (commercial,
shop, mall, compound, complex), restoration (restoration, renovation,
repair), otherwise residential.

Run 'gallery-manifest gen-config' to generate a documented site.toml.")]
#[command(version)]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Gallery directory (overrides paths.gallery)
    #[arg(long, global = true)]
    gallery: Option<PathBuf>,

    /// Hero images directory (overrides paths.images)
    #[arg(long, global = true)]
    images: Option<PathBuf>,

    /// Manifest output file (overrides paths.output)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scan the gallery and images directories and write the manifest (default)
    Generate,
    /// Scan and report without writing the manifest
    Check,
    /// Resolve the live site the way a visitor's page does
    Resolve(ResolveArgs),
    /// Print a stock site.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// Site root URL, e.g. https://example.com/
    #[arg(long)]
    base_url: String,

    /// Display language
    #[arg(long, value_enum, default_value_t = Language::Ar)]
    lang: Language,

    /// Show a single project by folder name instead of the whole site
    #[arg(long)]
    project: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Command::Generate);
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let mut site_config = config::load_config(&cli.config)?;
    if let Some(gallery) = &cli.gallery {
        site_config.paths.gallery = gallery.to_string_lossy().into_owned();
    }
    if let Some(images) = &cli.images {
        site_config.paths.images = images.to_string_lossy().into_owned();
    }
    if let Some(output) = &cli.output {
        site_config.paths.output = output.to_string_lossy().into_owned();
    }

    match command {
        Command::Generate => {
            init_thread_pool(&site_config.processing);
            let layout = ScanLayout::from_config(&site_config);
            let output_path = PathBuf::from(&site_config.paths.output);
            let manifest = manifest::generate(&LocalTree, &layout, &output_path)?;
            output::print_generate_output(&manifest, Some(&output_path));
        }
        Command::Check => {
            init_thread_pool(&site_config.processing);
            let layout = ScanLayout::from_config(&site_config);
            let manifest = manifest::build(&LocalTree, &layout);
            output::print_generate_output(&manifest, None);
        }
        Command::Resolve(args) => resolve(&site_config, args)?,
        Command::GenConfig => {}
    }

    Ok(())
}

fn resolve(site_config: &SiteConfig, args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fetcher = HttpFetcher::new(&args.base_url, &site_config.client)?;
    let client = ManifestClient::new(fetcher, site_config);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match args.project {
        Some(folder) => {
            let project = runtime.block_on(client.resolve_project(&folder));
            output::print_project(project.as_ref(), &folder, args.lang);
        }
        None => {
            let view = runtime.block_on(client.resolve_site());
            output::print_resolution(&view, args.lang);
        }
    }
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
