use env_logger::Env;
use pairtrim::{cli, commands};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");

    let args = match cli::Args::try_parse_normalized(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => cli::exit_with_usage(e),
    };

    if let Err(e) = commands::trim_pe::run(args, &command_line) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
