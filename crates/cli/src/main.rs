use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use codescope::commands::{
    analyze_command, history_command, init_project_command, project_info_command,
    set_widget_command, show_command, widgets_command, AnalyzeArgs, OutputFormat,
};
use codescope::init_tracing;

/// Heuristic source analysis with a terminal dashboard.
///
/// This CLI is a thin wrapper around `codescope-core` (exposed in code as
/// `codescope_core`). Scoring, the result store, the widgets and persistence all
/// live in the library.
#[derive(Parser, Debug)]
#[command(name = "codescope", version, about = "Heuristic source analysis dashboard", long_about = None)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new codescope project at the given root.
    ///
    /// This will:
    /// - Create a `.codescope` metadata directory and a `reports` directory.
    /// - Create the project database and a project row.
    /// - Write a `.codescope/project.json` config file.
    InitProject {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional project name. If omitted, the name is derived from the root directory.
        #[arg(long)]
        name: Option<String>,

        /// Language/kind label recorded for the project. Defaults to `python`.
        #[arg(long)]
        kind: Option<String>,
    },

    /// Show basic information about an existing project.
    ProjectInfo {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Score source text, save it as the project's latest analysis and render it.
    ///
    /// Reads `--file`, or stdin when omitted. If saving fails the result is
    /// still shown and a warning is printed.
    Analyze {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Source file to analyze (`-` for stdin).
        #[arg(long)]
        file: Option<String>,

        /// Skip complexity scoring (scores are reported as zero).
        #[arg(long, default_value_t = false)]
        skip_complexity: bool,

        /// Skip security checks.
        #[arg(long, default_value_t = false)]
        skip_security: bool,

        /// Skip style checks.
        #[arg(long, default_value_t = false)]
        skip_style: bool,

        /// Skip documentation checks.
        #[arg(long, default_value_t = false)]
        skip_documentation: bool,

        /// Render only this widget (codeTree, complexity, dependency, performance).
        #[arg(long)]
        widget: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Also write a JSON report under `reports/`.
        #[arg(long, default_value_t = false)]
        report: bool,
    },

    /// Render the latest saved analysis.
    Show {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Render only this widget.
        #[arg(long)]
        widget: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Change one widget display setting in the local project config.
    SetWidget {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Widget name (codeTree, complexity, dependency, performance).
        #[arg(long)]
        widget: String,

        /// Setting key, e.g. `showPercentages`.
        #[arg(long)]
        key: String,

        /// New value.
        #[arg(long, action = ArgAction::Set)]
        value: bool,
    },

    /// List effective widget settings.
    Widgets {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List saved analyses, oldest first.
    History {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // No subcommand: show the latest analysis for the current directory.
    match cli.command.unwrap_or(Command::Show {
        root: ".".to_string(),
        widget: None,
        format: OutputFormat::Text,
    }) {
        Command::InitProject { root, name, kind } => init_project_command(&root, name, kind)?,
        Command::ProjectInfo { root, json } => project_info_command(&root, json)?,
        Command::Analyze {
            root,
            file,
            skip_complexity,
            skip_security,
            skip_style,
            skip_documentation,
            widget,
            format,
            report,
        } => {
            let args = AnalyzeArgs {
                file,
                skip_complexity,
                skip_security,
                skip_style,
                skip_documentation,
                widget,
                format,
                report,
            };
            analyze_command(&root, &args)?
        }
        Command::Show { root, widget, format } => show_command(&root, widget, format)?,
        Command::SetWidget { root, widget, key, value } => {
            set_widget_command(&root, &widget, &key, value)?
        }
        Command::Widgets { root, json } => widgets_command(&root, json)?,
        Command::History { root, json } => history_command(&root, json)?,
    }

    Ok(())
}
