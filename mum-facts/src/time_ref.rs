//! `TimeRef` (spec §4.4): type-code u8 (1 instant / 2 interval / 3 relative
//! / 4 unknown), precision-code u8, and type-specific payload.

use crate::error::{FactError, FactResult};
use crate::wire::{ByteReader, ByteWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Unknown,
}

impl Precision {
    fn code(self) -> u8 {
        match self {
            Precision::Year => 0,
            Precision::Month => 1,
            Precision::Day => 2,
            Precision::Hour => 3,
            Precision::Minute => 4,
            Precision::Second => 5,
            Precision::Millisecond => 6,
            Precision::Unknown => 7,
        }
    }

    fn from_code(code: u8) -> FactResult<Self> {
        Ok(match code {
            0 => Precision::Year,
            1 => Precision::Month,
            2 => Precision::Day,
            3 => Precision::Hour,
            4 => Precision::Minute,
            5 => Precision::Second,
            6 => Precision::Millisecond,
            7 => Precision::Unknown,
            other => {
                return Err(FactError::UnknownDiscriminant {
                    what: "time precision",
                    value: other,
                })
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeRef {
    Instant {
        at: i64,
        precision: Precision,
    },
    Interval {
        start: Option<i64>,
        end: Option<i64>,
        precision: Precision,
    },
    /// Payload shape for `relative` time refs is left unspecified by the
    /// source spec beyond "type-code 3"; we carry a signed offset (seconds
    /// relative to an externally understood anchor) since that is the
    /// minimal payload any relative-time caller needs.
    Relative {
        offset_seconds: i64,
        precision: Precision,
    },
    Unknown,
}

impl TimeRef {
    /// Spec normalises TimeRefs "to their precision" before hashing — i.e.
    /// a fact's id must not depend on information finer than the declared
    /// precision. We truncate instants/intervals to whole units of their
    /// precision when that precision is coarser than seconds.
    pub fn normalized(&self) -> TimeRef {
        match self {
            TimeRef::Instant { at, precision } => TimeRef::Instant {
                at: truncate_to_precision(*at, *precision),
                precision: *precision,
            },
            TimeRef::Interval {
                start,
                end,
                precision,
            } => TimeRef::Interval {
                start: start.map(|s| truncate_to_precision(s, *precision)),
                end: end.map(|e| truncate_to_precision(e, *precision)),
                precision: *precision,
            },
            TimeRef::Relative {
                offset_seconds,
                precision,
            } => TimeRef::Relative {
                offset_seconds: truncate_to_precision(*offset_seconds, *precision),
                precision: *precision,
            },
            TimeRef::Unknown => TimeRef::Unknown,
        }
    }

    pub fn encode(&self, w: &mut ByteWriter) {
        match self {
            TimeRef::Instant { at, precision } => {
                w.write_u8(1);
                w.write_u8(precision.code());
                w.write_i64(*at);
            }
            TimeRef::Interval {
                start,
                end,
                precision,
            } => {
                w.write_u8(2);
                w.write_u8(precision.code());
                w.write_u8(start.is_some() as u8);
                if let Some(s) = start {
                    w.write_i64(*s);
                }
                w.write_u8(end.is_some() as u8);
                if let Some(e) = end {
                    w.write_i64(*e);
                }
            }
            TimeRef::Relative {
                offset_seconds,
                precision,
            } => {
                w.write_u8(3);
                w.write_u8(precision.code());
                w.write_i64(*offset_seconds);
            }
            TimeRef::Unknown => {
                w.write_u8(4);
                w.write_u8(Precision::Unknown.code());
            }
        }
    }

    pub fn decode(r: &mut ByteReader) -> FactResult<TimeRef> {
        let type_code = r.read_u8()?;
        let precision = Precision::from_code(r.read_u8()?)?;
        Ok(match type_code {
            1 => TimeRef::Instant {
                at: r.read_i64()?,
                precision,
            },
            2 => {
                let has_start = r.read_u8()? != 0;
                let start = if has_start { Some(r.read_i64()?) } else { None };
                let has_end = r.read_u8()? != 0;
                let end = if has_end { Some(r.read_i64()?) } else { None };
                TimeRef::Interval {
                    start,
                    end,
                    precision,
                }
            }
            3 => TimeRef::Relative {
                offset_seconds: r.read_i64()?,
                precision,
            },
            4 => TimeRef::Unknown,
            other => {
                return Err(FactError::UnknownDiscriminant {
                    what: "time_ref type",
                    value: other,
                })
            }
        })
    }
}

fn truncate_to_precision(value: i64, precision: Precision) -> i64 {
    let unit = match precision {
        Precision::Year => 365 * 24 * 3600,
        Precision::Month => 30 * 24 * 3600,
        Precision::Day => 24 * 3600,
        Precision::Hour => 3600,
        Precision::Minute => 60,
        Precision::Second | Precision::Millisecond | Precision::Unknown => 1,
    };
    (value / unit) * unit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_round_trips() {
        let t = TimeRef::Instant {
            at: 1_700_000_000,
            precision: Precision::Second,
        };
        let mut w = ByteWriter::new();
        t.encode(&mut w);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(TimeRef::decode(&mut r).unwrap(), t);
    }

    #[test]
    fn interval_with_open_end_round_trips() {
        let t = TimeRef::Interval {
            start: Some(10),
            end: None,
            precision: Precision::Day,
        };
        let mut w = ByteWriter::new();
        t.encode(&mut w);
        let bytes = w.into_bytes();
        let mut r = ByteReader::new(&bytes);
        assert_eq!(TimeRef::decode(&mut r).unwrap(), t);
    }

    #[test]
    fn day_precision_normalises_to_midnight_boundary() {
        let t = TimeRef::Instant {
            at: 24 * 3600 + 500,
            precision: Precision::Day,
        };
        assert_eq!(
            t.normalized(),
            TimeRef::Instant {
                at: 24 * 3600,
                precision: Precision::Day
            }
        );
    }
}
