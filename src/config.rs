use std::time::{Duration, Instant};

use tracing::Level;

use crate::{error::ConfigError, storage::Signaling};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub unit: Duration,    // 単位時間
    pub interval: u32,     // チップ生成の間隔 (単位時間)
    pub duration: u32,     // producer が動き続ける時間 (単位時間)
    pub signaling: Signaling,
    pub level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            unit: Duration::from_secs(1),
            interval: 2,
            duration: 20,
            signaling: Signaling::Count,
            level: Level::INFO,
        }
    }
}

impl Config {
    // from_matches で桁あふれしないことは確認済み
    pub fn interval(&self) -> Duration {
        self.unit.saturating_mul(self.interval)
    }

    pub fn duration(&self) -> Duration {
        self.unit.saturating_mul(self.duration)
    }

    pub fn from_matches(args: &clap::ArgMatches) -> Result<Self, ConfigError> {
        let unit_ms = args.get_one::<u64>("unit").copied().unwrap_or(1000);
        if unit_ms == 0 {
            return Err(ConfigError::ZeroUnit);
        }

        let interval = args.get_one::<u32>("interval").copied().unwrap_or(2);
        if interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let duration = args.get_one::<u32>("duration").copied().unwrap_or(20);

        let signaling = if args.get_flag("legacy-flag") {
            Signaling::Flag
        } else {
            Signaling::Count
        };

        let level = args.get_one::<Level>("level").copied().unwrap_or(Level::INFO);

        // producer は Instant::now() + duration (+ interval) を計算するので、
        // Duration の掛け算と Instant の足し算の両方があふれないこと
        let unit = Duration::from_millis(unit_ms);
        let interval_time = unit.checked_mul(interval).ok_or(ConfigError::TooLong)?;
        let duration_time = unit.checked_mul(duration).ok_or(ConfigError::TooLong)?;
        Instant::now()
            .checked_add(duration_time)
            .and_then(|deadline| deadline.checked_add(interval_time))
            .ok_or(ConfigError::TooLong)?;

        Ok(Config {
            unit,
            interval,
            duration,
            signaling,
            level,
        })
    }
}

pub fn command() -> clap::Command {
    clap::Command::new("chip_storage")
        .about("solders randomly sized chips handed over through a shared storage")
        .arg(
            clap::Arg::new("unit")
                .short('u')
                .long("unit-ms")
                .help("length of one time unit in milliseconds")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u64))
                .default_value("1000"),
        )
        .arg(
            clap::Arg::new("interval")
                .short('i')
                .long("interval")
                .help("units between two generated chips")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u32))
                .default_value("2"),
        )
        .arg(
            clap::Arg::new("duration")
                .short('d')
                .long("duration")
                .help("units the producer keeps generating chips")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(u32))
                .default_value("20"),
        )
        .arg(
            clap::Arg::new("legacy-flag")
                .long("legacy-flag")
                .help("wake the consumer with a single availability flag")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("level")
                .short('l')
                .long("level")
                .help("log level: error, warn, info, debug or trace")
                .action(clap::ArgAction::Set)
                .value_parser(clap::value_parser!(Level))
                .default_value("info"),
        )
}
