mod cmd;

use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand};
use cmd::config::{DialectArgs, Effective};
use cmd::error::CliError;

#[derive(Parser)]
#[command(name = "simplecsv", about = "Потоковый декодер/энкодер CSV")]
struct Cli {
    #[command(flatten)]
    args: DialectArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Печать событий декодера (begin_row / "cell" / (null) / end_row)
    Events {
        /// Входной файл, `-` для stdin
        file: String,
    },
    /// Перекодировать из диалекта [input] в диалект [output]
    Recode {
        file: String,
        /// Пропустить данные через таблицу
        #[arg(long)]
        via_table: bool,
    },
    /// Проверить, что вход разбирается без ошибок
    Check { file: String },
    /// Вывести строки как JSON-объекты
    Json { file: String },
}

fn run(cli: &Cli, eff: &Effective, out: &mut dyn Write) -> Result<(), CliError> {
    match &cli.command {
        Command::Events { file } => cmd::events::run(eff, file, out),
        Command::Recode { file, via_table } => cmd::recode::run(eff, file, *via_table, out),
        Command::Check { file } => cmd::check::run(eff, file, out).map(|_| ()),
        Command::Json { file } => cmd::json::run(eff, file, out),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut out = BufWriter::new(io::stdout().lock());
    let result = run(&cli, &eff, &mut out).and_then(|()| out.flush().map_err(CliError::from));
    if let Err(e) = result {
        let _ = out.flush();
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
