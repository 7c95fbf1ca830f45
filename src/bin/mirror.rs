use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use mirror::{
    Capabilities, Host, HostConfig, Interpreter, MirrorError, Repl, Value, script,
};

#[derive(Parser)]
#[command(author, version, about = "Embeddable interpreter host and inspection example")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    host: HostArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Run the bundled inspection script
    Run,
    /// Evaluate a snippet, or the contents of --file
    Eval {
        #[arg(
            required_unless_present = "file",
            conflicts_with = "file",
            allow_hyphen_values = true
        )]
        source: Option<String>,
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Start an interactive session
    Repl,
}

#[derive(Args)]
struct HostArgs {
    /// Description line exposed to scripts
    #[arg(long, global = true, env = "MIRROR_DESCRIPTION")]
    description: Option<String>,
    /// Copyright line exposed to scripts
    #[arg(long, global = true, env = "MIRROR_COPYRIGHT")]
    copyright: Option<String>,
    /// Run without an output capability
    #[arg(long, global = true)]
    no_output: bool,
}

impl HostArgs {
    fn into_host(self) -> Host {
        let defaults = HostConfig::default();
        let config = HostConfig::new(
            self.description.unwrap_or(defaults.description),
            self.copyright.unwrap_or(defaults.copyright),
        );
        let capabilities = if self.no_output {
            Capabilities::sandboxed()
        } else {
            Capabilities::console()
        };
        Host::stdout(config, capabilities)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "mirror=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let host = cli.host.into_host();
    match execute(cli.command.unwrap_or(Command::Run), host) {
        Ok(value) => exit_code(&value),
        Err(err) => {
            eprintln!("mirror: {err}");
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Command, mut host: Host) -> Result<Value, MirrorError> {
    match command {
        Command::Run => script::run(&mut host),
        Command::Eval { source, file } => {
            let source = match (source, file) {
                (Some(source), _) => source,
                (None, Some(path)) => fs::read_to_string(path)?,
                (None, None) => String::new(),
            };
            let mut interpreter = Interpreter::with_host(host);
            interpreter.eval_source(&source)
        }
        Command::Repl => {
            Repl::with_host(host).run()?;
            Ok(Value::nil())
        }
    }
}

/// Integer results become the process status, truncated the way the OS does.
fn exit_code(value: &Value) -> ExitCode {
    match value.as_int() {
        Some(n) => {
            tracing::debug!(result = n, "reporting script result as exit status");
            ExitCode::from(n.rem_euclid(256) as u8)
        }
        None => ExitCode::SUCCESS,
    }
}
