use clap::{ArgAction, Parser, Subcommand};
use newsroom::config;
use newsroom::element::{Reference, split_tokens};
use newsroom::library::Library;
use newsroom::render::{self, MarkdownConverter, RenderOptions};
use newsroom::warning::Warnings;
use newsroom::{article, frontmatter, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shared flags for commands that enrich a document.
#[derive(clap::Args, Clone)]
struct ElementArgs {
    /// Elements to apply: `category/name` or `preset:name`, comma-separated or repeated
    #[arg(short, long = "elements")]
    elements: Vec<String>,

    /// Replace fields the document already has
    #[arg(long)]
    overwrite: bool,

    /// Run the library's automation rules after the elements
    #[arg(long)]
    auto: bool,
}

impl ElementArgs {
    fn tokens(&self) -> Vec<String> {
        self.elements.iter().flat_map(|e| split_tokens(e)).collect()
    }
}

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(about = "Element library, Markdown renderer and article post-processor for a newsroom site")]
#[command(long_about = "\
Element library, Markdown renderer and article post-processor for a newsroom site

Articles are Markdown files with YAML frontmatter. Reusable metadata elements
(analytics, social cards, navigation includes, snippets) are merged into the
frontmatter without overwriting what the author wrote.

Project structure:

  newsroom/
  ├── config.toml                  # Tool config (optional, see gen-config)
  ├── biblioteca_config.yaml       # Custom elements, presets, snippets, rules
  ├── components/                  # Include fragments
  │   ├── globalheader.html
  │   └── localnav.html
  ├── templates/artigo/html/body.html
  └── artigos/
      ├── artigo.md                # → output/index.html
      └── img/grafico.png          # → output/src/grafico.png

References:
  category/name     one element, e.g. social/twitter_completo
  preset:name       a preset from the library

Run 'newsroom gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project directory holding config.toml, the library and components
    #[arg(long, default_value = ".", global = true)]
    base_dir: PathBuf,

    /// Element library file (overrides `library` in config.toml)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    /// Extra element file to merge in (YAML or TOML, repeatable)
    #[arg(long = "import", global = true)]
    imports: Vec<PathBuf>,

    /// More output (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List categories, or the elements of one category
    List { category: Option<String> },
    /// Show the full definition of one element
    Show {
        /// `category/name` or `preset:name`
        reference: String,
    },
    /// Find elements whose name or description contains a term
    Search { term: String },
    /// List the presets defined in the library
    Presets,
    /// Apply elements to a Markdown file's frontmatter
    Apply {
        file: PathBuf,
        #[command(flatten)]
        elements: ElementArgs,
        /// Write the result back instead of printing it
        #[arg(long)]
        write: bool,
    },
    /// Render Markdown to HTML
    Render {
        /// Markdown file, or a directory with --batch
        input: PathBuf,
        /// Output file (single-file mode only)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render every *.md in the input directory
        #[arg(short, long)]
        batch: bool,
        #[command(flatten)]
        elements: ElementArgs,
    },
    /// Pour a rendered article into the article template
    Article {
        /// Rendered HTML page
        #[arg(long)]
        input: PathBuf,
        /// Directory that receives index.html, img/ and src/
        #[arg(long)]
        output: PathBuf,
        /// Template page (overrides `article.template` in config.toml)
        #[arg(long)]
        template: Option<PathBuf>,
    },
    /// Write every element in the store to a YAML or TOML file
    Export { file: PathBuf },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        base_dir,
        library,
        imports,
        verbose,
        command,
    } = Cli::parse();
    init_tracing(verbose);

    let command = match command {
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        other => other,
    };

    let config = config::load_config(&base_dir)?;
    let paths = config.paths(&base_dir);
    let library = load_library(library.as_deref().unwrap_or(paths.library.as_path()), &imports)?;

    match command {
        Command::List { category } => match category {
            Some(category) => {
                output::print_category(&category, &library.store.list_category(&category))
            }
            None => output::print_categories(&library.store.categories()),
        },
        Command::Show { reference } => {
            let parsed = Reference::parse(&reference).ok_or_else(|| {
                format!("invalid reference '{reference}': use 'category/name' or 'preset:name'")
            })?;
            let element = library
                .store
                .resolve(&parsed)
                .ok_or_else(|| format!("'{reference}' not found in library"))?;
            let (category, name) = parsed.key();
            output::print_element(category, name, element);
        }
        Command::Search { term } => {
            output::print_search(&term, &library.store.search(&term));
        }
        Command::Presets => {
            output::print_presets(library.store.presets());
        }
        Command::Apply {
            file,
            elements,
            write,
        } => {
            let mut warnings = Warnings::new();
            let (document, body) = frontmatter::read_file(&file, &mut warnings)
                .map_err(|e| format!("{}: {e}", file.display()))?;
            let mut document =
                library.apply_references(&document, &elements.tokens(), elements.overwrite, &mut warnings);
            if elements.auto {
                document = library.apply_automations(&document, &mut warnings);
            }
            let text = frontmatter::join(&document, &body)?;
            if write {
                std::fs::write(&file, text)?;
                println!("Updated {}", file.display());
            } else {
                print!("{text}");
            }
        }
        Command::Render {
            input,
            output: explicit_output,
            batch,
            elements,
        } => {
            init_thread_pool(&config.processing);
            let converter = MarkdownConverter::new(&config.render.lang, &config.render.site_name);
            let options = RenderOptions {
                default_elements: config.render.default_elements.clone(),
                elements: elements.tokens(),
                overwrite: elements.overwrite,
                auto_apply: elements.auto || config.render.auto_apply,
                components_dir: paths.components,
                output_dir: paths.output,
            };
            if batch {
                if explicit_output.is_some() {
                    return Err("--output cannot be combined with --batch".into());
                }
                let outcomes = render::render_batch(&library, &converter, &options, &input)?;
                output::print_batch(&outcomes);
                let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
                if failed > 0 {
                    return Err(format!("{failed} of {} files failed", outcomes.len()).into());
                }
            } else {
                let report = render::render_file(
                    &library,
                    &converter,
                    &options,
                    &input,
                    explicit_output.as_deref(),
                )?;
                output::print_render_report(&report);
            }
        }
        Command::Article {
            input,
            output: output_dir,
            template,
        } => {
            let template = template.unwrap_or(paths.template);
            let report = article::post_process(&input, &output_dir, &template)?;
            output::print_article_report(&report);
        }
        Command::Export { file } => {
            library.store.export(&file)?;
            let total: usize = library.store.categories().iter().map(|(_, n)| n).sum();
            println!("Exported {total} elements to {}", file.display());
        }
        Command::GenConfig => {}
    }

    Ok(())
}

/// The library file plus every `--import` on top.
///
/// Library problems are warnings (logged as they are recorded); a bad
/// `--import` file is an error since the user named it explicitly.
fn load_library(path: &Path, imports: &[PathBuf]) -> Result<Library, Box<dyn std::error::Error>> {
    let mut warnings = Warnings::new();
    let mut library = Library::load(path, &mut warnings);
    for import in imports {
        library.store.import(import)?;
    }
    Ok(library)
}

/// Install the tracing subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise warnings only, `-v` debug, `-vv` trace.
fn init_tracing(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("newsroom=debug,warn"),
            _ => EnvFilter::new("trace"),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores: the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
