use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use sitehost::{load_config, render_site, viewer_request, SiteError};

#[derive(Parser)]
#[command(name = "sitehost")]
#[command(about = "Static website hosting on cloudfront + S3", long_about = None)]
struct Cli {
    /// log filter, eg: `debug` or `sitehost=trace`. Defaults to RUST_LOG, then info
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the template, the edge function and deploy.sh
    Render {
        #[arg(short, long, default_value = "site.toml")]
        config: PathBuf,
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },
    /// Show how the viewer request function routes each uri
    Route {
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Run the viewer request function on an event (json), from a file or stdin
    HandleEvent {
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the edge function source
    FunctionCode,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    sitehost::logging::init(cli.log_level.as_deref());
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), SiteError> {
    match command {
        Commands::Render { config, out_dir } => {
            let config = load_config(&config)?;
            let site = render_site(&config)?;
            for path in site.write_to(&out_dir)? {
                println!("{}", path.display());
            }
        }
        Commands::Route { uris } => {
            for uri in uris {
                println!("{}", sitehost::route_report(&uri));
            }
        }
        Commands::HandleEvent { file } => {
            let input = match file {
                Some(path) => std::fs::read_to_string(&path).map_err(|source| SiteError::Read { path, source })?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).map_err(|source| SiteError::Read {
                        path: PathBuf::from("<stdin>"),
                        source,
                    })?;
                    buf
                }
            };
            println!("{}", sitehost::handle_event_json(&input)?);
        }
        Commands::FunctionCode => {
            print!("{}", viewer_request::function_code());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_subcommand() {
        let cli = Cli::try_parse_from(["sitehost", "render", "--config", "my.toml"]).unwrap();
        assert!(matches!(cli.command, Commands::Render { ref config, ref out_dir }
            if config == &PathBuf::from("my.toml") && out_dir == &PathBuf::from("out")));

        let cli = Cli::try_parse_from(["sitehost", "route", "/a", "/b.js"]).unwrap();
        assert!(matches!(cli.command, Commands::Route { ref uris } if uris == &["/a", "/b.js"]));

        let cli = Cli::try_parse_from(["sitehost", "--log-level", "debug", "handle-event", "-f", "event.json"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::HandleEvent { file: Some(_) }));

        let cli = Cli::try_parse_from(["sitehost", "function-code"]).unwrap();
        assert!(matches!(cli.command, Commands::FunctionCode));
    }

    #[test]
    fn route_needs_a_uri() {
        assert!(Cli::try_parse_from(["sitehost", "route"]).is_err());
    }
}
