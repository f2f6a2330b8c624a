use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "Open-Meteo weather TUI";

const LONG_ABOUT: &str = "
TUI for searching a location and viewing its daily forecast, sourced from
the Open-Meteo APIs (no API key required).

Type to search; the forecast updates as you type. The last searched location
is saved, so subsequent runs of `omw` start from it unless another location
is given on the command line. Press Esc to quit.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "Location to search for (e.g. Berlin, Lisbon, etc.)")]
    pub location: Option<String>,
}
