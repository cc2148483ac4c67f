use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use template_gen::{
    BackgroundFetcher, Canvas, CommandFetcher, FetchConfig, NoFetch, TemplateDoc,
    paint_fallback_background, render_templates,
};

#[derive(Parser, Debug)]
#[command(name = "template-gen", version)]
struct Cli {
    /// Log debug detail to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one or more JSON template documents to PNG.
    Render(RenderArgs),
    /// Produce a standalone background image (fetched, else procedural).
    Background(BackgroundArgs),
}

#[derive(Args, Debug)]
struct FetchArgs {
    /// Background generator program (overrides TEMPLATE_GEN_BG_PROGRAM).
    #[arg(long)]
    bg_program: Option<String>,

    /// Argument passed to the generator before theme and output; repeatable.
    #[arg(long = "bg-arg", allow_hyphen_values = true)]
    bg_args: Vec<String>,

    /// Generator timeout in seconds (overrides TEMPLATE_GEN_BG_TIMEOUT_SECS).
    #[arg(long)]
    bg_timeout_secs: Option<u64>,
}

impl FetchArgs {
    fn fetcher(&self) -> anyhow::Result<CommandFetcher> {
        let mut cfg = FetchConfig::from_env();
        if let Some(program) = &self.bg_program {
            cfg = cfg.with_program(program.as_str());
        }
        if !self.bg_args.is_empty() {
            cfg = cfg.with_args(self.bg_args.iter().cloned());
        }
        if let Some(secs) = self.bg_timeout_secs {
            cfg = cfg.with_timeout(Duration::from_secs(secs));
        }
        Ok(CommandFetcher::new(cfg)?)
    }
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Template JSON files.
    #[arg(required = true)]
    templates: Vec<PathBuf>,

    /// Output PNG path (single template only; overrides the document's `output`).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Skip the background generator and always paint the fallback background.
    #[arg(long, default_value_t = false)]
    no_fetch: bool,

    #[command(flatten)]
    fetch: FetchArgs,
}

#[derive(Args, Debug)]
struct BackgroundArgs {
    /// Theme handed to the generator.
    #[arg(long)]
    theme: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Do not run the generator; paint the procedural background directly.
    #[arg(long, default_value_t = false)]
    simple: bool,

    /// Seed for the procedural background.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Side length in pixels of the procedural background.
    #[arg(long, default_value_t = 1024)]
    size: u32,

    #[command(flatten)]
    fetch: FetchArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Background(args) => cmd_background(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.out.is_some() && args.templates.len() != 1 {
        anyhow::bail!("--out can only be used with a single template");
    }

    let mut docs = Vec::with_capacity(args.templates.len());
    for path in &args.templates {
        let mut doc = TemplateDoc::from_json_file(path)
            .with_context(|| format!("load template '{}'", path.display()))?;
        if let Some(out) = &args.out {
            doc.output = out.clone();
        }
        docs.push(doc);
    }

    let fetcher: Box<dyn BackgroundFetcher> = if args.no_fetch {
        Box::new(NoFetch)
    } else {
        Box::new(args.fetch.fetcher()?)
    };

    let mut failed = 0usize;
    for (path, res) in args.templates.iter().zip(render_templates(&docs, fetcher.as_ref())) {
        match res {
            Ok(out) => eprintln!("wrote {}", out.display()),
            Err(e) => {
                failed += 1;
                eprintln!("error: {}: {e}", path.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} templates failed", args.templates.len());
    }
    Ok(())
}

fn cmd_background(args: BackgroundArgs) -> anyhow::Result<()> {
    if !args.simple && args.fetch.fetcher()?.fetch_background(&args.theme, &args.out) {
        eprintln!("wrote {}", args.out.display());
        return Ok(());
    }

    let mut canvas = Canvas::new(args.size, args.size)?;
    paint_fallback_background(&mut canvas, args.seed)?;
    canvas
        .save_png(&args.out)
        .with_context(|| format!("write background '{}'", args.out.display()))?;
    canvas.release();
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
