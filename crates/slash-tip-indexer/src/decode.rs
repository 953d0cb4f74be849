//! Strict ABI decoding of tip transaction inputs.
//!
//! Legacy `TransferSingle` events do not carry user ids, so ingestion
//! recovers them from the transaction input. Two call shapes exist in the
//! wild:
//!
//! - per-org contracts: `tip(string _fromId, string _toId, uint256 _amount,
//!   string _data)`
//! - the legacy global contract: `tip(string from, string to, uint256
//!   tokenId, uint256 amount, bytes data)`
//!
//! Shapes are tried in that order. No selector hashing is involved: a shape
//! either structurally decodes (offsets in bounds, lengths consistent,
//! strings valid UTF-8, uint256 within 128 bits) or it is rejected, and the
//! next shape is tried. Inputs matching neither shape are undecodable and
//! the event is skipped upstream.

use slash_tip_core::TokenAmount;

/// Errors that can occur decoding a transaction input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The input is not valid hex.
    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    /// The input is shorter than the shape's head.
    #[error("input too short")]
    TooShort,

    /// A dynamic offset or length points outside the input.
    #[error("offset or length out of bounds")]
    OutOfBounds,

    /// A string argument is not valid UTF-8.
    #[error("string argument is not valid UTF-8")]
    InvalidUtf8,

    /// A uint256 word does not fit the expected integer width.
    #[error("integer argument too large: {0}")]
    Overflow(String),

    /// The input matches none of the known tip-call shapes.
    #[error("input matches no known tip-call shape")]
    NoMatchingShape,
}

/// A tip call recovered from a transaction input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTipCall {
    /// Sender's external user id.
    pub from_user_id: String,

    /// Recipient's external user id.
    pub to_user_id: String,

    /// Token id, when the call shape carries one.
    pub token_id: Option<u64>,

    /// Amount in base units.
    pub amount: TokenAmount,

    /// Free-text message, when present and non-empty.
    pub message: Option<String>,
}

/// Decode a hex transaction input by trying each known shape in order.
///
/// # Errors
///
/// Returns `DecodeError::InvalidHex` or `DecodeError::TooShort` for inputs
/// that cannot hold any call, and `DecodeError::NoMatchingShape` when the
/// argument data fits none of the shapes.
pub fn decode_tip_call(input: &str) -> Result<DecodedTipCall, DecodeError> {
    let raw = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(raw).map_err(|e| DecodeError::InvalidHex(e.to_string()))?;

    // 4-byte selector, then ABI-encoded arguments.
    if bytes.len() < 4 {
        return Err(DecodeError::TooShort);
    }
    let args = Args::new(&bytes[4..]);

    decode_per_org(&args)
        .or_else(|_| decode_legacy(&args))
        .map_err(|_| DecodeError::NoMatchingShape)
}

/// `tip(string _fromId, string _toId, uint256 _amount, string _data)`
fn decode_per_org(args: &Args<'_>) -> Result<DecodedTipCall, DecodeError> {
    args.require_head(4)?;

    let from_user_id = args.string_at(args.offset(0)?)?;
    let to_user_id = args.string_at(args.offset(1)?)?;
    let amount = args.uint256(2)?;
    let message = args.string_at(args.offset(3)?)?;

    Ok(DecodedTipCall {
        from_user_id,
        to_user_id,
        token_id: None,
        amount,
        message: non_empty(message),
    })
}

/// `tip(string from, string to, uint256 tokenId, uint256 amount, bytes data)`
fn decode_legacy(args: &Args<'_>) -> Result<DecodedTipCall, DecodeError> {
    args.require_head(5)?;

    let from_user_id = args.string_at(args.offset(0)?)?;
    let to_user_id = args.string_at(args.offset(1)?)?;
    let token_id = args.uint64(2)?;
    let amount = args.uint256(3)?;
    let data = args.bytes_at(args.offset(4)?)?;
    let message = String::from_utf8(data.to_vec()).map_err(|_| DecodeError::InvalidUtf8)?;

    Ok(DecodedTipCall {
        from_user_id,
        to_user_id,
        token_id: Some(token_id),
        amount,
        message: non_empty(message),
    })
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// ABI argument data: a head of 32-byte words followed by dynamic tails.
struct Args<'a> {
    data: &'a [u8],
}

impl<'a> Args<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn require_head(&self, words: usize) -> Result<(), DecodeError> {
        if self.data.len() < words * 32 {
            return Err(DecodeError::TooShort);
        }
        Ok(())
    }

    fn word(&self, index: usize) -> Result<&'a [u8; 32], DecodeError> {
        let start = index * 32;
        let slice = self
            .data
            .get(start..start + 32)
            .ok_or(DecodeError::TooShort)?;
        Ok(slice.try_into().map_err(|_| DecodeError::TooShort)?)
    }

    /// Read a head word as a byte offset into the argument data.
    fn offset(&self, index: usize) -> Result<usize, DecodeError> {
        let value = self.usize_word(self.word(index)?)?;
        if value > self.data.len() {
            return Err(DecodeError::OutOfBounds);
        }
        Ok(value)
    }

    fn uint256(&self, index: usize) -> Result<TokenAmount, DecodeError> {
        TokenAmount::from_be_word(self.word(index)?)
            .map_err(|e| DecodeError::Overflow(e.to_string()))
    }

    fn uint64(&self, index: usize) -> Result<u64, DecodeError> {
        let word = self.word(index)?;
        if word[..24].iter().any(|b| *b != 0) {
            return Err(DecodeError::Overflow("uint256 exceeds 64 bits".into()));
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[24..]);
        Ok(u64::from_be_bytes(low))
    }

    fn usize_word(&self, word: &[u8; 32]) -> Result<usize, DecodeError> {
        if word[..24].iter().any(|b| *b != 0) {
            return Err(DecodeError::OutOfBounds);
        }
        let mut low = [0u8; 8];
        low.copy_from_slice(&word[24..]);
        usize::try_from(u64::from_be_bytes(low)).map_err(|_| DecodeError::OutOfBounds)
    }

    /// Read dynamic bytes at a tail offset: a length word, then the bytes.
    fn bytes_at(&self, offset: usize) -> Result<&'a [u8], DecodeError> {
        let length_word: &[u8; 32] = self
            .data
            .get(offset..offset + 32)
            .ok_or(DecodeError::OutOfBounds)?
            .try_into()
            .map_err(|_| DecodeError::OutOfBounds)?;
        let length = self.usize_word(length_word)?;

        let start = offset + 32;
        self.data
            .get(start..start + length)
            .ok_or(DecodeError::OutOfBounds)
    }

    fn string_at(&self, offset: usize) -> Result<String, DecodeError> {
        let bytes = self.bytes_at(offset)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)
    }
}
