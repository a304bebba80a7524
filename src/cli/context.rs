//! Per-invocation context shared by commands and the interactive shell

use clap::ValueEnum;
use miette::Result;

use crate::cli::view::ConsoleView;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::item::today;
use crate::core::{Config, HeaderMap, ReportOptions, Session, Workspace};

/// Workspace, effective configuration and output settings
pub struct Context {
    pub workspace: Workspace,
    pub config: Config,
    pub format: OutputFormat,
    pub quiet: bool,
}

impl Context {
    /// Discover the workspace and load its configuration
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let workspace = Workspace::open(global.workspace.as_deref())?;
        let config = Config::load_for(Some(&workspace));

        let format = match global.format {
            OutputFormat::Auto => config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
                .unwrap_or(OutputFormat::Auto),
            f => f,
        };

        Ok(Self {
            workspace,
            config,
            format,
            quiet: global.quiet,
        })
    }

    /// Load the saved inventory into a new session
    pub fn session(&self, view: ConsoleView) -> Result<Session> {
        let store = self.workspace.load_store()?;
        Ok(Session::new(store, Box::new(view)))
    }

    /// Save the session's store if it has unsaved changes
    pub fn save(&self, session: &mut Session) -> Result<()> {
        if session.is_dirty() {
            self.workspace.save_store(session.store())?;
            session.mark_saved();
        }
        Ok(())
    }

    pub fn headers(&self) -> Result<HeaderMap> {
        Ok(self.config.header_map()?)
    }

    pub fn report_options(&self, title: Option<&str>) -> ReportOptions {
        ReportOptions {
            title: title.unwrap_or(self.config.report_title()).to_string(),
            date: today(),
            placeholder_image: self.config.placeholder_image().to_string(),
        }
    }

    pub fn status_view(&self) -> ConsoleView {
        ConsoleView::status(self.quiet)
    }
}

/// Run a one-shot command against the saved inventory
///
/// The store is saved afterwards when the command changed it, including
/// when the command itself failed after an earlier successful step.
pub fn with_session<F>(global: &GlobalOpts, f: F) -> Result<()>
where
    F: FnOnce(&Context, &mut Session) -> Result<()>,
{
    let ctx = Context::open(global)?;
    let mut session = ctx.session(ctx.status_view())?;
    let result = f(&ctx, &mut session);
    ctx.save(&mut session)?;
    result
}
