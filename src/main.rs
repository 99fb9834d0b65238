use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod contents_json;
mod face;
mod icon_gen;

#[derive(Debug, Parser)]
#[clap(
    name = "gotoshell-icon",
    about = "Draw the GoToShell face icon and write the macOS app icon sets"
)]
struct Args {
    /// Directory the GoToShell and GoToShellHelper asset catalogs live in.
    #[clap(short = 'o', long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Color of the face strokes (opaque CSS color)
    #[clap(long, default_value = "#505050")]
    color: String,

    /// Also write Contents.json into each AppIcon.appiconset
    #[clap(long)]
    contents_json: bool,

    /// Also bundle the icon set into an .icns file at this path
    #[clap(long, value_name = "FILE")]
    icns: Option<PathBuf>,
}

impl From<Args> for icon_gen::Options {
    fn from(args: Args) -> Self {
        Self {
            root: args.root,
            color: args.color,
            contents_json: args.contents_json,
            icns: args.icns,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reproduce_the_fixed_icon_set() {
        let args = Args::parse_from(["gotoshell-icon"]);
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.color, "#505050");
        assert!(!args.contents_json);
        assert!(args.icns.is_none());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "gotoshell-icon",
            "-o",
            "checkout",
            "--color",
            "white",
            "--contents-json",
            "--icns",
            "AppIcon.icns",
        ]);
        let options = icon_gen::Options::from(args);
        assert_eq!(options.root, PathBuf::from("checkout"));
        assert_eq!(options.color, "white");
        assert!(options.contents_json);
        assert_eq!(options.icns, Some(PathBuf::from("AppIcon.icns")));
    }
}
