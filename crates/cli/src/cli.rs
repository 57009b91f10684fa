use buildlib_core::{Mode, Precedence, WatchKind};
use buildlib_core_full::rc::OptionOverrides;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Dist,
    Dev,
    Test,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dist => Mode::Dist,
            ModeArg::Dev => Mode::Dev,
            ModeArg::Test => Mode::Test,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WatchArg {
    Memory,
    File,
}

impl From<WatchArg> for WatchKind {
    fn from(watch: WatchArg) -> Self {
        match watch {
            WatchArg::Memory => WatchKind::Memory,
            WatchArg::File => WatchKind::File,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PreferArg {
    Serve,
    Watch,
}

impl From<PreferArg> for Precedence {
    fn from(prefer: PreferArg) -> Self {
        match prefer {
            PreferArg::Serve => Precedence::Serve,
            PreferArg::Watch => Precedence::Watch,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct BuildOptions {
    /// The output mode [default: dist]
    #[clap(short, long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Watch for file changes
    #[clap(short, long, value_enum, num_args = 0..=1, default_missing_value = "file")]
    pub watch: Option<WatchArg>,
    /// Build with legacy TypeScript settings
    #[clap(short, long)]
    pub legacy: bool,
    /// Start a web server
    #[clap(short, long)]
    pub serve: bool,
    /// Port to serve on [default: 9999]
    #[clap(short, long)]
    pub port: Option<u16>,
    /// Which of serve and watch wins when both are given
    #[clap(long, value_enum)]
    pub prefer: Option<PreferArg>,
    /// Options file to use instead of .dojorc
    #[clap(long)]
    pub config: Option<PathBuf>,
}

impl BuildOptions {
    pub fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            mode: self.mode.map(Mode::from),
            watch: self.watch.map(WatchKind::from),
            legacy: self.legacy,
            serve: self.serve,
            port: self.port,
            precedence: self.prefer.map(Precedence::from),
        }
    }
}

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Create a build of your library
    Build(BuildOptions),

    /// Move the build options out of .dojorc and stage a standalone build script
    Eject,

    /// Print the options this command registers, as JSON
    Options,
}

/// build-lib Command
#[derive(Parser)]
#[command(version, about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_options(args: &[&str]) -> BuildOptions {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        match cli.cmd {
            Commands::Build(options) => options,
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn test_build_defaults() {
        let options = build_options(&["build-lib", "build"]);
        assert_eq!(options.overrides(), OptionOverrides::default());
        assert!(options.config.is_none());
    }

    #[test]
    fn test_build_flags() {
        let options = build_options(&[
            "build-lib", "build", "-m", "test", "-l", "-s", "-p", "8080", "--prefer", "watch",
        ]);
        let overrides = options.overrides();
        assert_eq!(overrides.mode, Some(Mode::Test));
        assert!(overrides.legacy);
        assert!(overrides.serve);
        assert_eq!(overrides.port, Some(8080));
        assert_eq!(overrides.precedence, Some(Precedence::Watch));
    }

    #[test]
    fn test_bare_watch_is_file() {
        let options = build_options(&["build-lib", "build", "--watch"]);
        assert_eq!(options.overrides().watch, Some(WatchKind::File));

        let options = build_options(&["build-lib", "build", "--watch", "memory"]);
        assert_eq!(options.overrides().watch, Some(WatchKind::Memory));
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["build-lib", "build", "--mode", "prod"]).is_err());
    }

    #[test]
    fn test_config_path() {
        let options = build_options(&["build-lib", "build", "--config", "config/build-options.json"]);
        assert_eq!(
            options.config,
            Some(PathBuf::from("config/build-options.json"))
        );
    }
}
