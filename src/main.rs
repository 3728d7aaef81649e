//! inkpaste - Main Entry Point
//!
//! Renders a Markdown file (or standard input) to inline-styled HTML and
//! writes it to standard output, a file, or the clipboard.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{debug, error, info};

use inkpaste::config::{load_config, save_config, Settings, ThemeFile};
use inkpaste::export::{self, ExportFormat, ExportOptions};
use inkpaste::fonts;
use inkpaste::{MarkdownParser, Result, ThemeResolver};

/// Application name constant.
const APP_NAME: &str = "inkpaste";

/// Convert Markdown into self-contained, inline-styled HTML.
#[derive(Parser, Debug)]
#[command(name = "inkpaste", author, version, about)]
struct Cli {
    /// Markdown file to render (default: standard input)
    input: Option<PathBuf>,

    /// Write the HTML to this file instead of standard output
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Color theme id
    #[arg(long, value_name = "ID")]
    theme: Option<String>,

    /// TOML file defining a color and/or code theme
    #[arg(long, value_name = "TOML")]
    theme_file: Option<PathBuf>,

    /// Code theme id
    #[arg(long, value_name = "ID")]
    code_theme: Option<String>,

    /// Theme system id (classic, capsule, magazine, ...)
    #[arg(long, value_name = "ID")]
    system: Option<String>,

    /// Font family id or a CSS family list
    #[arg(long, value_name = "ID")]
    font: Option<String>,

    /// Base font size in pixels
    #[arg(long, value_name = "N")]
    font_size: Option<f32>,

    /// Unitless line height
    #[arg(long, value_name = "N")]
    line_height: Option<f32>,

    /// Letter spacing in pixels
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    letter_spacing: Option<f32>,

    /// Render for preview: bare headings, no wrapping or font normalization
    #[arg(long, action = ArgAction::SetTrue)]
    preview: bool,

    /// Strip newlines between tags, empty paragraphs and internal markers
    #[arg(long, action = ArgAction::SetTrue)]
    clean: bool,

    /// Wrap the output in a standalone HTML document
    #[arg(long, action = ArgAction::SetTrue)]
    document: bool,

    /// Copy the output to the clipboard
    #[arg(long, action = ArgAction::SetTrue)]
    copy: bool,

    /// Store the theme and font options as the new defaults
    #[arg(long, action = ArgAction::SetTrue)]
    save_defaults: bool,

    /// List the known theme, code theme, theme system and font ids
    #[arg(long, action = ArgAction::SetTrue)]
    list_themes: bool,
}

impl Cli {
    /// Overlay the command-line choices onto the stored defaults.
    fn apply_to(&self, settings: &mut Settings) {
        if let Some(theme) = &self.theme {
            settings.theme = theme.clone();
        }
        if let Some(code_theme) = &self.code_theme {
            settings.code_theme = code_theme.clone();
        }
        if let Some(system) = &self.system {
            settings.theme_system = system.clone();
        }
        if let Some(font) = &self.font {
            settings.font_family = font.clone();
        }
        if let Some(size) = self.font_size {
            settings.font_size = size;
        }
        if self.line_height.is_some() {
            settings.line_height = self.line_height;
        }
        if self.letter_spacing.is_some() {
            settings.letter_spacing = self.letter_spacing;
        }
        if self.clean {
            settings.clean_html = true;
        }
        settings.sanitize();
    }

    /// Destinations for the rendered output, in delivery order.
    fn destinations(&self) -> Vec<ExportOptions> {
        let title = self.document_title();
        let finish = |options: ExportOptions| {
            if self.document {
                options.with_document(title.clone())
            } else {
                options
            }
        };

        let mut destinations = Vec::new();
        if let Some(path) = &self.output {
            destinations.push(finish(ExportOptions::html_file(path)));
        }
        if self.copy {
            destinations.push(finish(ExportOptions::clipboard()));
        }
        if destinations.is_empty() {
            destinations.push(finish(ExportOptions::default()));
        }
        destinations
    }

    fn document_title(&self) -> Option<String> {
        self.input
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .map(str::to_string)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    debug!("Starting {} with {:?}", APP_NAME, cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("{}: {}", APP_NAME, err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = load_config();
    cli.apply_to(&mut settings);

    let mut resolver = ThemeResolver::default();
    if let Some(path) = &cli.theme_file {
        let file = ThemeFile::load(path)?;
        // A theme file's records are used unless another id was asked for
        if cli.theme.is_none() {
            if let Some(id) = file.color_id() {
                settings.theme = id;
            }
        }
        if cli.code_theme.is_none() {
            if let Some(id) = file.code_id() {
                settings.code_theme = id;
            }
        }
        resolver = file.install(resolver);
    }

    if cli.list_themes {
        print_themes(&resolver);
        return Ok(());
    }

    if cli.save_defaults {
        save_config(&settings)?;
        info!("Saved defaults");
        if cli.input.is_none() && io::stdin().is_terminal() {
            return Ok(());
        }
    }

    let markdown = read_input(cli.input.as_deref())?;

    let mut options = settings.to_parse_options();
    options.is_preview = cli.preview;

    let parser = MarkdownParser::new().with_resolver(resolver);
    let html = parser.parse(&markdown, &options)?;

    let mut stdout = io::stdout().lock();
    for destination in cli.destinations() {
        export::deliver(&html, &destination, &mut stdout)?;
        if destination.format == ExportFormat::Clipboard {
            eprintln!("Copied {} bytes of HTML to the clipboard", html.len());
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading {}", path.display());
            Ok(fs::read_to_string(path)?)
        }
        None => {
            let mut markdown = String::new();
            io::stdin().read_to_string(&mut markdown)?;
            Ok(markdown)
        }
    }
}

fn print_themes(resolver: &ThemeResolver) {
    let fonts: Vec<&str> = fonts::family_ids().collect();
    println!("themes:        {}", resolver.color_theme_ids().join(", "));
    println!("code themes:   {}", resolver.code_theme_ids().join(", "));
    println!("systems:       {}", resolver.theme_system_ids().join(", "));
    println!("fonts:         {}", fonts.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("inkpaste").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_override_settings() {
        let mut settings = Settings::default();
        cli(&[
            "--theme",
            "ocean",
            "--system",
            "magazine",
            "--font-size",
            "18",
            "--letter-spacing",
            "-1",
            "--clean",
        ])
        .apply_to(&mut settings);
        assert_eq!(settings.theme, "ocean");
        assert_eq!(settings.theme_system, "magazine");
        assert_eq!(settings.font_size, 18.0);
        assert_eq!(settings.letter_spacing, Some(-1.0));
        assert!(settings.clean_html);
        assert_eq!(settings.code_theme, "github-light");
    }

    #[test]
    fn test_default_destination_is_stdout() {
        let destinations = cli(&[]).destinations();
        assert_eq!(destinations, vec![ExportOptions::default()]);
    }

    #[test]
    fn test_file_and_clipboard_destinations() {
        let destinations = cli(&["post.md", "-o", "out.html", "--copy", "--document"]).destinations();
        assert_eq!(destinations.len(), 2);
        assert_eq!(destinations[0].format, ExportFormat::HtmlFile);
        assert_eq!(destinations[1].format, ExportFormat::Clipboard);
        assert!(destinations.iter().all(|d| d.as_document));
        assert_eq!(destinations[0].title.as_deref(), Some("post"));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
