mod cli;

use anyhow::Context;
use unitsh::document::Document;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("UNITSH_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    let command_result = if cli.dry_run {
        dry_run(&cli)
    } else {
        compile(&cli)
    };

    if let Err(e) = command_result {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

fn load(cli: &cli::Cli) -> anyhow::Result<Document> {
    Document::load_file(&cli.file)
        .with_context(|| format!("Failed to load {}", cli.file.display()))
}

pub fn compile(cli: &cli::Cli) -> anyhow::Result<()> {
    let mut document = load(cli)?;
    let functions = unitsh::compile(&mut document)?;

    let mut stdout = std::io::stdout().lock();
    unitsh::emit::write_functions(&mut stdout, functions)?;
    Ok(())
}

/// Run the pipeline without emitting and print the processed document
pub fn dry_run(cli: &cli::Cli) -> anyhow::Result<()> {
    let mut document = load(cli)?;
    unitsh::pipeline::Pipeline::default().run(&mut document)?;

    match cli.format {
        cli::OutputFormat::Yaml => serde_yaml::to_writer(std::io::stdout(), &document)?,
        cli::OutputFormat::Json => serde_json::to_writer_pretty(std::io::stdout(), &document)?,
    };

    Ok(())
}
