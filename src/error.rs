use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChipError {
    // 乱数が 1..=3 の範囲外
    #[error("incorrect random value for chip size: {0}")]
    InvalidSize(u32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("time unit must be longer than 0ms")]
    ZeroUnit,

    #[error("producer interval must be at least one unit")]
    ZeroInterval,

    #[error("interval or duration does not fit in a time value")]
    TooLong,
}
