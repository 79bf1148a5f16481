use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use cam_site::{collect, config, generate, logging, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cam-site")]
#[command(about = "Static browsing site for security camera uploads")]
#[command(long_about = "\
Static browsing site for security camera uploads

Cameras upload stills and clips over FTP into a dated tree. `collect` makes
thumbnails and links the originals into the web root; `build` writes the
HTML pages that browse them.

Source tree (read only):

  <root>/
  └── <camera>/2022/02/16/
      ├── front_01_20220216143000.jpg
      └── front_01_20220216143004.mp4

Web root (written):

  <web-root>/
  ├── index.html                         # Latest captures + calendar archive
  ├── style.css
  ├── <camera>/2022-02-16.html           # One gallery page per camera and day
  ├── images/<camera>/2022-02-16/...     # Symlinks to the originals
  └── thumbnails/<camera>/2022-02-16/... # JPEG thumbnails

Run 'cam-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (stock defaults when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Thumbnail and link one day of camera uploads into the web root
    Collect {
        /// Root of the camera upload tree
        #[arg(long)]
        root: PathBuf,
        /// Web root to populate
        #[arg(long)]
        web_root: PathBuf,
        /// Camera directory names, in display order
        #[arg(long, required = true, num_args = 1..)]
        cameras: Vec<String>,
        /// Day to collect, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Write the index and gallery pages from collected media
    Build {
        /// Site name shown in titles and headings
        #[arg(long)]
        name: String,
        /// Web root produced by `collect`
        #[arg(long)]
        dir: PathBuf,
        /// Camera directory names, in display order
        #[arg(long, required = true, num_args = 1..)]
        cameras: Vec<String>,
        /// Day to build, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Regenerate the gallery page of every collected day
        #[arg(long)]
        all: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(logging::level_for(cli.verbose, cli.quiet))?;

    match cli.command {
        Command::Collect {
            root,
            web_root,
            cameras,
            date,
        } => {
            let site_config = config::load_config(cli.config.as_deref())?;
            let date = date.unwrap_or_else(today);
            let report = collect::collect(&root, &web_root, &cameras, date, &site_config)?;
            output::print_collect_output(&report);
        }
        Command::Build {
            name,
            dir,
            cameras,
            date,
            all,
        } => {
            let site_config = config::load_config(cli.config.as_deref())?;
            let date = date.unwrap_or_else(today);
            let report = if all {
                generate::build_all(&dir, &name, &cameras, date, &site_config)?
            } else {
                generate::build_site(&dir, &name, &cameras, date, &site_config)?
            };
            output::print_build_output(&report, &dir);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
