//! The mixed byte/macro-unit vocabulary (spec §3 "Token").

use serde::{Deserialize, Serialize};

/// Dense vocabulary id. Bytes occupy `[0, 256)`; macro-units occupy
/// `[256, 256 + dict.len())` in MDL-selection order.
pub type TokenId = u32;

pub const BYTE_VOCAB_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    Byte(u8),
    Macro(u32),
}

impl Token {
    pub fn id(self) -> TokenId {
        match self {
            Token::Byte(b) => b as TokenId,
            Token::Macro(idx) => BYTE_VOCAB_SIZE + idx,
        }
    }

    pub fn from_id(id: TokenId) -> Token {
        if id < BYTE_VOCAB_SIZE {
            Token::Byte(id as u8)
        } else {
            Token::Macro(id - BYTE_VOCAB_SIZE)
        }
    }

    pub fn is_macro(self) -> bool {
        matches!(self, Token::Macro(_))
    }
}
