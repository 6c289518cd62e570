//! iconscan CLI - Figma icon inventory tool

mod figma_api;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use iconscan::{
    parse_file_with_options, select_nodes, IconScan, JsonFormat, LibraryCatalog, PageSelection,
    ParseOptions, RecordingViewport, ScanOptions,
};

use figma_api::{FigmaClient, TOKEN_ENV};

#[derive(Parser)]
#[command(name = "iconscan")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Find icons in Figma files", long_about = None)]
struct Cli {
    /// Input Figma JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a Figma file for icons
    Scan {
        /// Input Figma JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Page selection (e.g., "1-3", "1,4", "Icons")
        #[arg(long)]
        pages: Option<String>,

        /// Skip color extraction
        #[arg(long)]
        no_colors: bool,

        /// Extra case-insensitive name pattern (regex)
        #[arg(long, value_name = "REGEX")]
        pattern: Vec<String>,

        /// Library catalog written by `iconscan fetch --libraries`
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Group output by page or library
        #[arg(long, value_enum, default_value = "none")]
        group: GroupBy,

        /// Scan pages in parallel
        #[arg(long)]
        parallel: bool,

        /// Include YAML frontmatter (markdown only)
        #[arg(long)]
        frontmatter: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// File key used to build node links
        #[arg(long, env = "FIGMA_FILE_KEY")]
        file_key: Option<String>,

        /// Skip malformed nodes instead of failing
        #[arg(long)]
        lenient: bool,

        /// Ignore hidden layers
        #[arg(long)]
        skip_hidden: bool,
    },

    /// Show file information
    Info {
        /// Input Figma JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Resolve node ids to their page and selection
    Locate {
        /// Input Figma JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Node ids to select
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,

        /// Page id the viewer starts on
        #[arg(long)]
        page: Option<String>,
    },

    /// Download a file from the Figma API
    Fetch {
        /// Figma file key
        #[arg(value_name = "KEY")]
        file_key: String,

        /// Personal access token
        #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
        token: String,

        /// Output file (defaults to <KEY>.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Also resolve remote components and write a library catalog
        #[arg(long, value_name = "FILE")]
        libraries: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text listing
    Text,
    /// Markdown tables
    Markdown,
    /// JSON report
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum GroupBy {
    /// Single list in scan order
    None,
    /// One section per page
    Page,
    /// One section per library
    Library,
}

impl From<GroupBy> for iconscan::Grouping {
    fn from(group: GroupBy) -> Self {
        match group {
            GroupBy::None => iconscan::Grouping::None,
            GroupBy::Page => iconscan::Grouping::Page,
            GroupBy::Library => iconscan::Grouping::Library,
        }
    }
}

/// Settings for the `scan` command.
struct ScanArgs {
    format: OutputFormat,
    pages: Option<String>,
    no_colors: bool,
    patterns: Vec<String>,
    catalog: Option<PathBuf>,
    group: GroupBy,
    parallel: bool,
    frontmatter: bool,
    compact: bool,
    file_key: Option<String>,
    lenient: bool,
    skip_hidden: bool,
}

impl Default for ScanArgs {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pages: None,
            no_colors: false,
            patterns: Vec::new(),
            catalog: None,
            group: GroupBy::None,
            parallel: false,
            frontmatter: false,
            compact: false,
            file_key: None,
            lenient: true,
            skip_hidden: false,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Scan {
            input,
            format,
            output,
            pages,
            no_colors,
            pattern,
            catalog,
            group,
            parallel,
            frontmatter,
            compact,
            file_key,
            lenient,
            skip_hidden,
        }) => cmd_scan(
            &input,
            output.as_deref(),
            ScanArgs {
                format,
                pages,
                no_colors,
                patterns: pattern,
                catalog,
                group,
                parallel,
                frontmatter,
                compact,
                file_key,
                lenient,
                skip_hidden,
            },
        ),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Locate { input, ids, page }) => cmd_locate(&input, &ids, page.as_deref()),
        Some(Commands::Fetch {
            file_key,
            token,
            output,
            libraries,
        }) => cmd_fetch(&file_key, &token, output.as_deref(), libraries.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: scan if input is provided
            if let Some(input) = cli.input {
                cmd_scan(&input, None, ScanArgs::default())
            } else {
                println!("{}", "Usage: iconscan <FILE>".yellow());
                println!("       iconscan --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

fn cmd_scan(
    input: &Path,
    output: Option<&Path>,
    args: ScanArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let mut scan = IconScan::new()
        .with_pages(page_selection(args.pages.as_deref())?)
        .with_colors(!args.no_colors)
        .with_grouping(args.group.into());

    if args.lenient {
        scan = scan.lenient();
    }
    if args.skip_hidden {
        scan = scan.skip_hidden();
    }
    if args.parallel {
        scan = scan.parallel();
    }
    if args.frontmatter {
        scan = scan.with_frontmatter();
    }
    match args.file_key.or_else(|| file_key_from_path(input)) {
        Some(key) => scan = scan.with_file_key(key),
        None => eprintln!(
            "{} no file key; links will be incomplete (pass --file-key)",
            "Hint:".yellow()
        ),
    }
    for pattern in args.patterns {
        scan = scan.with_name_pattern(pattern);
    }
    if let Some(path) = args.catalog {
        pb.set_message("Loading library catalog...");
        scan = scan.with_catalog(LibraryCatalog::from_path(&path)?);
    }

    pb.set_message("Scanning...");
    let result = scan.scan(input)?;
    pb.finish_and_clear();

    let rendered = match args.format {
        OutputFormat::Text => result.to_text()?,
        OutputFormat::Markdown => result.to_markdown()?,
        OutputFormat::Json => result.to_json(if args.compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        })?,
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} icons)",
            "Saved to".green(),
            path.display(),
            result.icons().len()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// File key taken from a `<KEY>.json` name, as written by `iconscan fetch`.
fn file_key_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let looks_like_key = (16..=64).contains(&stem.len())
        && stem.chars().all(|c| c.is_ascii_alphanumeric());
    looks_like_key.then(|| stem.to_string())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Lenient so metadata still shows for files with a few broken nodes
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;
    let report = iconscan::scan_document(&doc, ScanOptions::default().with_colors(false))?;

    println!("{}", "File Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Name".bold(), doc.metadata.name);
    if let Some(ref key) = doc.metadata.file_key {
        println!("{}: {}", "Key".bold(), key);
    }
    if let Some(ref modified) = doc.metadata.last_modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    if let Some(ref version) = doc.metadata.version {
        println!("{}: {}", "Version".bold(), version);
    }
    if let Some(ref editor) = doc.metadata.editor_type {
        println!("{}: {}", "Editor".bold(), editor);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());
    println!("{}: {}", "Components".bold(), doc.components.len());
    println!(
        "{}: {}",
        "Remote components".bold(),
        doc.components.values().filter(|c| c.remote).count()
    );

    println!();
    println!("{}", "Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &doc.pages {
        let icons = report.icons.iter().filter(|i| i.page_id == page.id).count();
        println!(
            "{:>3}. {} {} ({} nodes, {} icons)",
            page.index,
            page.name,
            page.id.dimmed(),
            page.node_count(),
            icons
        );
    }

    let stats = &report.stats;
    println!();
    println!("{}", "Icon Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Icons".bold(), stats.icon_count);
    println!("{}: {}", "By name".bold(), stats.by_name);
    println!("{}: {}", "By component".bold(), stats.by_component);
    println!("{}: {}", "Remote instances".bold(), stats.by_remote_instance);
    println!("{}: {}", "Vector groups".bold(), stats.by_vector_container);
    println!("{}: {}", "From libraries".bold(), stats.external_count);

    Ok(())
}

fn cmd_locate(
    input: &Path,
    ids: &[String],
    page: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;

    let mut viewport = match page {
        Some(id) => RecordingViewport::on_page(id),
        None => RecordingViewport::new(),
    };

    let selection = select_nodes(&doc, &mut viewport, ids)?;

    for notice in &viewport.notices {
        if notice.error {
            println!("{}", notice.message.red());
        } else {
            println!("{}", notice.message.green());
        }
    }

    match selection {
        Some(selection) => {
            let page_name = doc
                .page_by_id(&selection.page_id)
                .map(|p| p.name.as_str())
                .unwrap_or_default();
            println!("{}: {} {}", "Page".bold(), page_name, selection.page_id.dimmed());
            for id in &selection.node_ids {
                println!("  {} {}", "├─".dimmed(), id);
            }
            let missing = ids.len().saturating_sub(selection.len());
            if missing > 0 {
                println!("{} {} ids not found", "Skipped".yellow(), missing);
            }
        }
        None => println!("{}", "No matching nodes".yellow()),
    }

    Ok(())
}

fn cmd_fetch(
    file_key: &str,
    token: &str,
    output: Option<&Path>,
    libraries: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", file_key)));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let client = FigmaClient::new(token)?;

        pb.set_message(format!("Downloading {}...", file_key));
        let data = client.file(file_key).await?;
        fs::write(&output, &data)?;

        if let Some(path) = libraries {
            pb.set_message("Resolving libraries...");
            let options = ParseOptions::new().lenient().with_file_key(file_key);
            let doc = iconscan::parse_bytes_with_options(&data, options)?;
            let catalog = client.library_catalog(&doc).await;
            fs::write(path, catalog.to_json()?)?;
            pb.println(format!(
                "{} {} ({} components)",
                "Catalog saved to".green(),
                path.display(),
                catalog.len()
            ));
        }

        pb.finish_and_clear();
        println!("{} {}", "Saved to".green(), output.display());
        if file_key_from_path(&output).as_deref() != Some(file_key) {
            println!(
                "{} iconscan scan {} --file-key {}",
                "Scan with:".dimmed(),
                output.display(),
                file_key
            );
        }

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn cmd_version() {
    println!("{} {}", "iconscan".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Figma icon inventory tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/iconscan".dimmed());
    println!("License: MIT");
}
