use clap::Parser;
use cli::Cli;
use error::{exit, Error};
use supervisor::Supervisor;

pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod stdio;
pub mod supervisor;
pub mod timer;

fn fail(err: Error) -> ! {
    log::error!("{}", err);
    std::process::exit(err.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print().ok();
            std::process::exit(match err.use_stderr() {
                true => exit::USAGE,
                false => exit::OK,
            });
        }
    };

    let config = init::new(cli).unwrap_or_else(|err| fail(err));

    let mut stdout = tokio::io::stdout();
    let report = Supervisor::new(&config)
        .run(&mut stdout)
        .await
        .unwrap_or_else(|err| fail(err));

    log::info!("pid {} finished, exit code {}", report.pid, report.exit_code());
    // the child's status is ours, pending alarms are abandoned
    std::process::exit(report.exit_code());
}
