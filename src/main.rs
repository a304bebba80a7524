use clap::Parser;
use miette::Result;
use stk::cli::commands::{
    add, adjust, completions, config, export, import, init, list, report, rm, shell, sync,
};
use stk::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate silently on a closed pipe (`stk list | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    stk::logging::init(global.verbose, global.quiet);

    match cli.command {
        Commands::Init(args) => init::run(args),
        Commands::Add(args) => add::run(args, &global),
        Commands::List(args) => list::run(args, &global),
        Commands::Show(args) => list::run_show(args, &global),
        Commands::Inc(args) => adjust::run_inc(args, &global),
        Commands::Dec(args) => adjust::run_dec(args, &global),
        Commands::Set(args) => adjust::run_set(args, &global),
        Commands::Rm(args) => rm::run(args, &global),
        Commands::Import(args) => import::run(args, &global),
        Commands::Export(args) => export::run(args, &global),
        Commands::Pull(args) => sync::run_pull(args, &global),
        Commands::Push(args) => sync::run_push(args, &global),
        Commands::Report(args) => report::run(args, &global),
        Commands::Shell => shell::run(&global),
        Commands::Config(cmd) => config::run(cmd, &global),
        Commands::Completions(args) => completions::run(args),
    }
}
