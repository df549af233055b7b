//! Greedy longest-match segmentation, shared by C2's accumulator and C3's
//! prompt encoder (spec §4.2 "Encoding").

use mum_types::{MacroUnit, Token};

pub trait Encoder {
    fn encode(&self, bytes: &[u8]) -> Vec<Token>;
    fn decode(&self, tokens: &[Token]) -> Vec<u8>;
}

pub struct DictionaryEncoder<'d> {
    pub dict: &'d [MacroUnit],
}

impl<'d> DictionaryEncoder<'d> {
    pub fn new(dict: &'d [MacroUnit]) -> Self {
        DictionaryEncoder { dict }
    }
}

impl<'d> Encoder for DictionaryEncoder<'d> {
    fn encode(&self, bytes: &[u8]) -> Vec<Token> {
        mum_types::encode_bytes(bytes, self.dict)
    }

    fn decode(&self, tokens: &[Token]) -> Vec<u8> {
        mum_types::decode_tokens(tokens, self.dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dictionary_encoder_round_trips() {
        let dict = vec![MacroUnit::new(0, b"th".to_vec(), 5, 0.1, 1, 4, 1).unwrap()];
        let enc = DictionaryEncoder::new(&dict);
        let tokens = enc.encode(b"the path");
        assert_eq!(enc.decode(&tokens), b"the path");
    }
}
