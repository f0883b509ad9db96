use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use jarpoison::telemetry::init_tracing;
use jarpoison::{
    ArchiveRewriter, JavacCompiler, PayloadSource, PoisonError, ResolvedPayload, RunReport,
    TemplateRegistry,
};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "jarpoison")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Poison a JAR file", long_about = None)]
struct Cli {
    /// JAR file to poison
    #[arg(required_unless_present = "list_templates")]
    input: Option<PathBuf>,

    /// Output JAR file
    #[arg(required_unless_present = "list_templates")]
    output: Option<PathBuf>,

    /// Payload to inject
    #[arg(short, long)]
    payload: Option<String>,

    /// Payload template
    #[arg(short, long)]
    template: Option<String>,

    /// Payload template arguments (key=value)
    #[arg(short = 'a', long, num_args = 0..)]
    template_args: Vec<String>,

    /// List available payload templates
    #[arg(short, long)]
    list_templates: bool,

    /// Java compiler executable
    #[arg(long, env = "JAVAC", default_value = "javac")]
    javac: PathBuf,

    /// Extra argument passed to the compiler (repeatable)
    #[arg(long = "javac-arg", allow_hyphen_values = true)]
    javac_args: Vec<String>,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    let registry = TemplateRegistry::builtin().context("Failed to build template registry")?;

    if cli.list_templates {
        print_templates(&registry);
        return Ok(());
    }

    let source = match PayloadSource::from_options(cli.payload, cli.template, cli.template_args) {
        Ok(source) => source,
        Err(PoisonError::Usage(message)) => {
            Cli::command().error(ErrorKind::ArgumentConflict, message).exit()
        }
        Err(e) => return Err(e.into()),
    };

    let (Some(input), Some(output)) = (cli.input, cli.output) else {
        Cli::command()
            .error(ErrorKind::MissingRequiredArgument, "input and output are required")
            .exit()
    };

    let payload =
        ResolvedPayload::resolve(&registry, &source).context("Failed to resolve payload")?;

    let compiler = JavacCompiler::new(cli.javac).with_args(cli.javac_args);
    let rewriter = ArchiveRewriter::new(&payload, compiler);

    let summary = match rewriter.rewrite_file(&input, &output) {
        Ok(summary) => summary,
        Err(PoisonError::Usage(message)) => {
            Cli::command().error(ErrorKind::ValueValidation, message).exit()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to poison {}", input.display()))
        }
    };

    if let Some(report_path) = cli.report {
        RunReport::new(&input, &output, &payload, summary)
            .write_to_file(&report_path)
            .context("Failed to write run report")?;
    }

    Ok(())
}

fn print_templates(registry: &TemplateRegistry) {
    println!("Available payload templates:");
    for template in registry.iter() {
        println!("{}", "-".repeat(20));
        println!("Name: {}", template.name());
        println!("Template:");
        println!("------");
        println!("{}", template.body().trim());
    }
}
