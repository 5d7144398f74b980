//! pdf2tex CLI - rebuild LaTeX source from scanned PDF pages

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2tex::{
    default_asset_dir, default_page_dir, document_name, list_pdfs, rasterizer_for,
    ConvertOptions, Document, DocumentBuilder, DocumentStats, JsonFormat, RenderOptions,
    SegmentOptions, TesseractCli, DEFAULT_DPI,
};

#[derive(Parser)]
#[command(name = "pdf2tex")]
#[command(version)]
#[command(about = "Rebuild LaTeX source from scanned PDF pages", long_about = None)]
struct Cli {
    /// Input PDF file or directory of page images
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    #[command(flatten)]
    args: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF or page image directory to LaTeX
    Convert {
        /// Input PDF file or directory of page images
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Convert every PDF in a folder
    Batch {
        /// Folder containing PDF files
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Directory for the `.tex` files and asset folders (default: FOLDER)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Dump the reconstructed layout as JSON
    Json {
        /// Input PDF file or directory of page images
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Show the detected layout without keeping any output
    Info {
        /// Input PDF file or directory of page images
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Rasterization resolution for PDFs
        #[arg(long, default_value_t = DEFAULT_DPI)]
        dpi: u32,

        /// Tesseract language (e.g. "eng", "deu+eng")
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Output file (`<name>.tex` if not specified; stdout for `json`)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Figure asset folder (`<output dir>/<name>assets` if not specified)
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Replace unreadable pages with empty ones instead of failing
    #[arg(long)]
    lenient: bool,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,

    /// Write into an existing asset folder
    #[arg(long)]
    reuse_assets: bool,

    /// Omit the LaTeX preamble
    #[arg(long)]
    no_preamble: bool,

    /// Rasterization resolution for PDFs
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,

    /// Minimum band height in pixels
    #[arg(long)]
    min_text_size: Option<u32>,

    /// Keep bands whose pure-white pixel fraction is below this value
    #[arg(long, value_name = "FRACTION")]
    max_white_fraction: Option<f64>,

    /// Tesseract language (e.g. "eng", "deu+eng")
    #[arg(long)]
    lang: Option<String>,

    /// Tesseract binary
    #[arg(long, env = "PDF2TEX_TESSERACT", value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// Average OCR confidence over every TSV row, not just words
    #[arg(long)]
    ocr_all_levels: bool,

    /// Keep PDF page renders in `<DIR>/<name>pages`
    #[arg(long, value_name = "DIR")]
    keep_pages: Option<PathBuf>,
}

impl ConvertArgs {
    fn convert_options(&self) -> ConvertOptions {
        let mut options = ConvertOptions::new();
        if self.lenient {
            options = options.lenient();
        }
        if self.sequential {
            options = options.sequential();
        }
        if self.reuse_assets {
            options = options.reuse_assets();
        }
        let mut segment = SegmentOptions::new();
        if let Some(size) = self.min_text_size {
            segment = segment.with_min_text_size(size);
        }
        if let Some(fraction) = self.max_white_fraction {
            segment = segment.with_max_white_fraction(fraction);
        }
        options.with_segment_options(segment)
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions::new().with_preamble(!self.no_preamble)
    }

    fn ocr(&self) -> TesseractCli {
        let ocr = ocr_engine(self.tesseract.as_deref(), self.lang.as_deref());
        if self.ocr_all_levels {
            ocr.with_all_levels()
        } else {
            ocr
        }
    }

    fn page_dir(&self, name: &str) -> Option<PathBuf> {
        self.keep_pages
            .as_deref()
            .map(|dir| default_page_dir(dir, name))
    }
}

fn ocr_engine(binary: Option<&Path>, lang: Option<&str>) -> TesseractCli {
    let mut ocr = TesseractCli::new();
    if let Some(binary) = binary {
        ocr = ocr.with_binary(binary);
    }
    if let Some(lang) = lang {
        ocr = ocr.with_language(lang);
    }
    ocr
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, args }) => cmd_convert(&input, &args),
        Some(Commands::Batch {
            folder,
            out_dir,
            args,
        }) => cmd_batch(&folder, out_dir.as_deref(), &args),
        Some(Commands::Json {
            input,
            compact,
            args,
        }) => cmd_json(&input, compact, &args),
        Some(Commands::Info { input, dpi, lang }) => cmd_info(&input, dpi, lang.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, &cli.args)
            } else {
                println!("{}", "Usage: pdf2tex <INPUT> [-o FILE]".yellow());
                println!("       pdf2tex --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn progress_bar(steps: u64) -> ProgressBar {
    let pb = ProgressBar::new(steps);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Rasterize `input` and build the document, reporting progress on `pb`.
fn build_document(
    input: &Path,
    asset_dir: &Path,
    dpi: u32,
    page_dir: Option<&Path>,
    ocr: &TesseractCli,
    options: ConvertOptions,
    pb: &ProgressBar,
) -> Result<Document, Box<dyn std::error::Error>> {
    let name = document_name(input);

    pb.set_message("Rasterizing pages...");
    let rasterizer = rasterizer_for(input, dpi, page_dir)?;
    let pages = rasterizer.rasterize(input)?;
    pb.inc(1);

    pb.set_message(format!("Analyzing {} pages...", pages.len()));
    let doc = DocumentBuilder::new(ocr, options).build(&name, asset_dir, pages.pages())?;
    pb.inc(1);

    Ok(doc)
}

fn cmd_convert(input: &Path, args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let name = document_name(input);
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}.tex", name)));
    let output_dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&output_dir)?;
    let asset_dir = args
        .assets
        .clone()
        .unwrap_or_else(|| default_asset_dir(&output_dir, &name));

    let pb = progress_bar(3);
    let doc = build_document(
        input,
        &asset_dir,
        args.dpi,
        args.page_dir(&name).as_deref(),
        &args.ocr(),
        args.convert_options(),
        &pb,
    )?;

    pb.set_message("Writing LaTeX...");
    pdf2tex::render::write_tex(&doc, &output, &args.render_options())?;
    pb.inc(1);
    pb.finish_with_message("Done!");

    let stats = DocumentStats::from_document(&doc);
    println!("\n{}", "Output files:".green().bold());
    println!("  {} {}", "├─".dimmed(), output.display());
    println!(
        "  {} {} ({} figures)",
        "└─".dimmed(),
        doc.asset_dir().display(),
        stats.figure_count
    );

    if stats.failed_page_count > 0 {
        println!(
            "\n{} {} page(s) could not be processed",
            "Warning:".yellow().bold(),
            stats.failed_page_count
        );
    }

    Ok(())
}

/// Input PDF and output `.tex` path for each document of a batch.
fn batch_jobs(folder: &Path, out_dir: &Path) -> pdf2tex::Result<Vec<(PathBuf, PathBuf)>> {
    Ok(list_pdfs(folder)?
        .into_iter()
        .map(|pdf| {
            let tex = out_dir.join(format!("{}.tex", document_name(&pdf)));
            (pdf, tex)
        })
        .collect())
}

fn cmd_batch(
    folder: &Path,
    out_dir: Option<&Path>,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.is_some() || args.assets.is_some() {
        return Err("batch writes one file per PDF; use --out-dir instead of -o/--assets".into());
    }

    let out_dir = out_dir.unwrap_or(folder);
    let jobs = batch_jobs(folder, out_dir)?;
    if jobs.is_empty() {
        println!("{} no PDF files in {}", "Note:".yellow().bold(), folder.display());
        return Ok(());
    }

    let mut failed = 0;
    for (index, (pdf, tex)) in jobs.iter().enumerate() {
        println!(
            "\n{} [{}/{}] {}",
            "Converting".cyan().bold(),
            index + 1,
            jobs.len(),
            pdf.display()
        );
        let job_args = ConvertArgs {
            output: Some(tex.clone()),
            ..args.clone()
        };
        if let Err(e) = cmd_convert(pdf, &job_args) {
            eprintln!("{}: {}: {}", "Error".red().bold(), pdf.display(), e);
            failed += 1;
        }
    }

    println!(
        "\n{} {} of {} documents converted",
        "Batch:".green().bold(),
        jobs.len() - failed,
        jobs.len()
    );
    if failed > 0 {
        return Err(format!("{} document(s) failed", failed).into());
    }
    Ok(())
}

fn cmd_json(
    input: &Path,
    compact: bool,
    args: &ConvertArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = document_name(input);
    let output_dir = args
        .output
        .as_deref()
        .and_then(Path::parent)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let asset_dir = args
        .assets
        .clone()
        .unwrap_or_else(|| default_asset_dir(&output_dir, &name));

    let pb = progress_bar(2);
    let doc = build_document(
        input,
        &asset_dir,
        args.dpi,
        args.page_dir(&name).as_deref(),
        &args.ocr(),
        args.convert_options(),
        &pb,
    )?;
    pb.finish_and_clear();

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = pdf2tex::render::to_json(&doc, format)?;

    if let Some(ref path) = args.output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    dpi: u32,
    lang: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let scratch = tempfile::tempdir()?;
    let name = document_name(input);

    // Lenient so the summary covers every page even if some fail
    let pb = progress_bar(2);
    let doc = build_document(
        input,
        &default_asset_dir(scratch.path(), &name),
        dpi,
        None,
        &ocr_engine(None, lang),
        ConvertOptions::new().lenient(),
        &pb,
    )?;
    pb.finish_and_clear();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Input".bold(), input.display());
    if let Ok(format) = pdf2tex::detect_format_from_path(input) {
        println!("{}: {}", "Format".bold(), format);
    }
    println!("{}: {}", "Pages".bold(), doc.page_count());

    println!();
    println!("{}", "Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for page in &doc.pages {
        if let Some(ref error) = page.error {
            println!("{} {}: {}", "Page".bold(), page.number, error.as_str().red());
            continue;
        }
        println!(
            "{} {} ({}x{}): {} blocks, {} figures",
            "Page".bold(),
            page.number,
            page.width,
            page.height,
            page.block_count(),
            page.figure_count()
        );
        for block in &page.blocks {
            println!("  {} {} {}", "·".dimmed(), block.kind(), block.bbox);
        }
    }

    let stats = DocumentStats::from_document(&doc);
    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Text blocks".bold(), stats.text_block_count);
    println!("{}: {}", "Figures".bold(), stats.figure_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    if stats.failed_page_count > 0 {
        println!("{}: {}", "Failed pages".bold(), stats.failed_page_count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdf2tex".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Scanned PDF to LaTeX reconstruction tool");
    println!();
    println!("License: MIT");
}
