use clap::{Parser, Subcommand};
use reelfolio::catalog::Catalog;
use reelfolio::filter::RoleFilter;
use reelfolio::lightbox::ViewportSize;
use reelfolio::state::{Action, Gallery};
use reelfolio::{config, embed, generate, output};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelfolio")]
#[command(about = "Portfolio gallery engine for video editors and colorists")]
#[command(long_about = "\
Portfolio gallery engine for video editors and colorists

One JSON catalog drives a filterable project grid, reel and color-group
carousels, and video / still lightboxes. The build renders every state as
static HTML.

Content structure:

  content/
  ├── config.toml      # Site config (optional)
  ├── catalog.json     # {\"projects\": [...], \"colorGroups\": [...]}
  ├── about.md         # About section (optional)
  └── thumbnails/      # {title}.jpg, with {title}.png as fallback

Set RUST_LOG=debug to trace engine transitions.

Run 'reelfolio gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config and catalog, print the content inventory
    Check,
    /// Render the static site
    Build,
    /// Show the project list for one filter, page and viewport width
    Page {
        /// Role filter: all, color-grading, video-editing, directing, production
        #[arg(long, default_value = "all")]
        filter: RoleFilter,
        /// 1-indexed page (only meaningful below the mobile breakpoint)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Viewport width in CSS pixels
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
    },
    /// Print the canonical embed URL for a video link
    Embed {
        url: String,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            let gallery = Gallery::new(catalog, &site_config);
            output::print_check_output(&gallery, &site_config);
            println!("==> Content is valid");
        }
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let summary = generate::generate(&cli.source, &cli.output)?;
            output::print_generate_output(&summary);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Page {
            filter,
            page,
            width,
        } => {
            let site_config = config::load_config(&cli.source)?;
            let catalog = Catalog::load(&cli.source)?;
            let mut gallery = Gallery::new(catalog, &site_config);
            gallery.dispatch(Action::ViewportResized(ViewportSize {
                width,
                height: 800.0,
            }));
            gallery.dispatch(Action::SetFilter(filter));
            if gallery.dispatch(Action::GoToPage(page)).is_empty() && page != 1 {
                eprintln!("page {page} is out of range, showing page 1");
            }
            output::print_page_view(&gallery.view());
        }
        Command::Embed { url } => {
            println!("{}", embed::canonical_embed_url(&url));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
