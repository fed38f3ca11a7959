pub type ParseResult<T> = core::result::Result<T, WireError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    InsufficientData { needed: usize, available: usize },
    InvalidErrorFlag(u8),
    InvalidErrorCode(u8),
    PartialRecord { extra: usize },
}
