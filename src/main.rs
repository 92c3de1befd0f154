use clap::Parser;
use std::io::{Read, Write};
use tracing::Level;
use valcss::{build, init, pipe, watch, BuildOptions, BuildResult, Builder, Cli, Commands, ValcssError};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Build(args) if args.verbose);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Build(args) => {
            args.validate().map_err(ValcssError::InvalidInput)?;
            let options = BuildOptions::from(&args);

            if args.watch {
                let mut builder = Builder::new(options);
                watch::watch(&mut builder, report)?;
                return Ok(());
            }

            match build(&options) {
                Ok(result) => {
                    report(&result);
                    if args.dry_run {
                        println!("{}", result.css);
                    }
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Init(args) => {
            let cwd = std::env::current_dir()?;
            let path = init(&cwd, &args)?;
            tracing::info!("Created {}", path.display());
            Ok(())
        }
        Commands::Pipe(args) => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;

            let output = pipe(&input, &args);
            for diagnostic in &output.diagnostics {
                diagnostic.log();
            }

            let mut stdout = std::io::stdout().lock();
            if !output.css.is_empty() {
                writeln!(stdout, "{}", output.css)?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}

fn report(result: &BuildResult) {
    for diagnostic in &result.diagnostics {
        diagnostic.log();
    }
    tracing::info!(
        "Processed {} files, compiled {} of {} classes",
        result.files_processed,
        result.compiled,
        result.tokens
    );
}
