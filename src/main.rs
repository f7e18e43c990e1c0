//! dldocker CLI - build and run deep learning images and containers

use std::io;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use dldocker::cli::{Args, SubCommand};
use dldocker::engine::update_path;
use dldocker::project::{executable_dir, Project};
use dldocker::{
    format_output, host, BuildOptions, Dispatcher, ExecutionContext, OutputFormat, SystemRunner,
};

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let Args {
        command,
        config,
        dry_run,
        autoports,
        root,
    } = args;
    let project = Project::locate(root)?;

    let dispatcher = || -> anyhow::Result<Dispatcher<SystemRunner>> {
        let user = host::current_user();
        let resolved = project
            .configs()
            .load(&config, &user)
            .with_context(|| format!("loading configuration '{}'", config))?;
        let ctx = ExecutionContext { dry_run, autoports };
        Ok(Dispatcher::new(resolved, project.clone(), ctx, SystemRunner::new()))
    };

    match command {
        SubCommand::UpdatePath => {
            let home = dirs::home_dir().context("cannot determine the home directory")?;
            let dir = executable_dir()
                .context("cannot determine the directory of this executable")?;
            update_path(&home, &dir, dry_run, &mut io::stdout())?;
        }

        SubCommand::Configs => {
            let configs = project.configs();
            let names = configs
                .list()
                .with_context(|| format!("reading {}", configs.path().display()))?;
            for name in names {
                println!("{}", name);
            }
        }

        SubCommand::Build {
            skip_base,
            no_cache,
        } => dispatcher()?.build(BuildOptions {
            skip_base,
            no_cache,
        })?,

        SubCommand::RunJl {
            mounts,
            notebook_dir,
        } => dispatcher()?.run_jl(&mounts.into(), notebook_dir.as_deref())?,

        SubCommand::RunItRm {
            mounts,
            container_command,
        } => dispatcher()?.run_it_rm(&mounts.into(), &container_command)?,

        SubCommand::Rmc => dispatcher()?.rmc()?,

        SubCommand::Rmi { with_base } => dispatcher()?.rmi(with_base)?,

        SubCommand::Start => dispatcher()?.start()?,

        SubCommand::Stop => dispatcher()?.stop()?,

        SubCommand::Exec { container_command } => dispatcher()?.exec(&container_command)?,

        SubCommand::Info { json } => {
            let report = dispatcher()?.info()?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Human
            };
            println!("{}", format_output(&report, &format));
        }
    }

    Ok(())
}
