use std::io::stdout;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use miette::Result;

use nonde::{MsgColor, Output, Program, RunEnvironment, Source};

/// nonde runs scripts made of commands, variables and labels.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Script file to run
    path: PathBuf,

    /// Load the script and report errors without running it
    #[arg(long, conflicts_with = "list")]
    check: bool,

    /// Print the commands and labels of the loaded script instead of running it
    #[arg(long)]
    list: bool,

    /// Print status messages to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Show errors as full diagnostics with the offending source
    #[arg(long)]
    explain: bool,

    /// Stop with an error after this many commands have run
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    max_steps: Option<u64>,
}

fn main() -> ExitCode {
    // Usage errors exit with 1, not clap's default of 2
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    nonde::env::init();
    Output::set_verbose(args.verbose || nonde::env::is_verbose());

    let _ = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(nonde::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }));

    let res = if args.check {
        check(&args.path)
    } else if args.list {
        list(&args.path)
    } else {
        run(&args.path, args.max_steps.or_else(nonde::env::max_steps))
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            if args.explain {
                eprintln!("{report:?}");
            } else {
                eprintln!("{report}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(name: &Path, max_steps: Option<u64>) -> Result<()> {
    let program = load(name)?;

    Output::message(MsgColor::Green, "Running", format_args!("{} commands", program.len()));
    let mut env = RunEnvironment::new(program, stdout().lock()).with_step_limit(max_steps);
    env.run()?;

    Output::message(MsgColor::Green, "Completed", format_args!("{} steps", env.steps()));
    Ok(())
}

fn check(name: &Path) -> Result<()> {
    let _ = load(name)?;
    Output::message(MsgColor::Green, "Success", "no errors found!");
    Ok(())
}

fn list(name: &Path) -> Result<()> {
    let program = load(name)?;
    print!("{program}");
    Ok(())
}

/// Read and parse a script file.
fn load(name: &Path) -> Result<Program> {
    Output::file_message(MsgColor::Green, "Loading", name);
    let program = Program::load(Source::read(name)?)?;
    Output::message(
        MsgColor::Cyan,
        "Loaded",
        format_args!(
            "{} commands, {} labels",
            program.len(),
            program.labels().len()
        ),
    );
    Ok(program)
}
