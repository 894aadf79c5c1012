//! Command-line surface applied before the interactive session starts.

use clap::{ArgAction, Parser};
use tracing::{info, warn};
use wurld_core::{ClockRegistry, DisplaySettings, UtcOffset};

#[derive(Parser, Debug)]
#[command(
    name = "wurld",
    version,
    about = "Terminal world clock tracking fixed UTC offsets"
)]
pub struct Cli {
    /// Use 12-hour time format.
    #[arg(long = "12")]
    pub use_12h: bool,

    /// Use 24-hour time format.
    #[arg(long = "24")]
    pub use_24h: bool,

    /// Add a clock with the given label and UTC offset (repeatable).
    #[arg(
        short = 'a',
        long = "add",
        num_args = 2,
        value_names = ["LABEL", "OFFSET"],
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    pub add: Vec<String>,

    /// Remove a clock by exact label (repeatable).
    #[arg(short = 'r', long = "remove", value_name = "LABEL", action = ArgAction::Append)]
    pub remove: Vec<String>,
}

/// Apply startup arguments to the loaded state.
///
/// Returns whether anything changed, in which case the caller persists
/// immediately. An unparsable offset silently skips that entry; `--24`
/// wins over `--12` when both are given.
pub fn apply(cli: &Cli, settings: &mut DisplaySettings, registry: &mut ClockRegistry) -> bool {
    let mut changed = false;
    if cli.use_12h {
        settings.use_24h = false;
        changed = true;
    }
    if cli.use_24h {
        settings.use_24h = true;
        changed = true;
    }
    for pair in cli.add.chunks_exact(2) {
        let (label, text) = (&pair[0], &pair[1]);
        match UtcOffset::parse(text) {
            Ok(offset) => {
                if registry.add(label, offset) {
                    info!(%label, %offset, "clock added from command line");
                    changed = true;
                }
            }
            Err(err) => {
                warn!(%label, %err, "ignoring clock with invalid offset");
            }
        }
    }
    for label in &cli.remove {
        if registry.remove(label) {
            info!(%label, "clock removed from command line");
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("wurld").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    fn fresh_state() -> (DisplaySettings, ClockRegistry) {
        let mut registry = ClockRegistry::new();
        registry.add("local", UtcOffset::Local);
        (DisplaySettings::default(), registry)
    }

    #[test]
    fn format_flags_mark_state_changed() {
        let (mut settings, mut registry) = fresh_state();
        assert!(apply(&parse(&["--24"]), &mut settings, &mut registry));
        assert!(settings.use_24h);
        assert!(apply(&parse(&["--12"]), &mut settings, &mut registry));
        assert!(!settings.use_24h);
    }

    #[test]
    fn add_and_remove_are_repeatable() {
        let (mut settings, mut registry) = fresh_state();
        let cli = parse(&[
            "-a", "tokyo", "+9", "-a", "bombay", "+5:30", "-r", "local",
        ]);
        assert!(apply(&cli, &mut settings, &mut registry));

        let labels: Vec<&str> = registry.labels().collect();
        assert_eq!(labels, vec!["tokyo", "bombay"]);
        assert_eq!(
            registry.get("bombay").map(|clock| clock.offset),
            Some(UtcOffset::Hours(5.5))
        );
    }

    #[test]
    fn negative_offsets_parse_despite_the_leading_hyphen() {
        let (mut settings, mut registry) = fresh_state();
        let cli = parse(&["-a", "nfl", "-3:30", "-a", "est", "-5"]);
        assert!(apply(&cli, &mut settings, &mut registry));

        assert_eq!(
            registry.get("nfl").map(|clock| clock.offset),
            Some(UtcOffset::Hours(-3.5))
        );
        assert_eq!(
            registry.get("est").map(|clock| clock.offset),
            Some(UtcOffset::Hours(-5.0))
        );
    }

    #[test]
    fn invalid_offset_skips_that_entry_only() {
        let (mut settings, mut registry) = fresh_state();
        let cli = parse(&["-a", "bogus", "abc", "-a", "tokyo", "+9"]);
        assert!(apply(&cli, &mut settings, &mut registry));

        assert!(!registry.contains("bogus"));
        assert!(registry.contains("tokyo"));
    }

    #[test]
    fn no_arguments_leaves_state_untouched() {
        let (mut settings, mut registry) = fresh_state();
        assert!(!apply(&parse(&[]), &mut settings, &mut registry));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn removing_unknown_label_does_not_mark_changed() {
        let (mut settings, mut registry) = fresh_state();
        assert!(!apply(&parse(&["-r", "tokyo"]), &mut settings, &mut registry));
    }
}
