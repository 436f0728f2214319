use crate::config::BandPlan;
use crate::error::{AelError, Result};
use crate::{CONTENT_QUOTE, TOKEN_DELIMITER};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

/// Canonical symbol table
///
/// 25 symbols spaced 170 Hz apart from 1500 Hz to 5580 Hz. Every frequency is a
/// multiple of 10 Hz, sits above the 1200 Hz silence ceiling and below the
/// 6000 Hz command-band ceiling.
const CANONICAL_ENTRIES: [(&str, u32); 25] = [
    ("REQ", 1500),
    ("ACT", 1670),
    ("DATA", 1840),
    ("CONF", 2010),
    ("ERR", 2180),
    ("SENSOR", 2350),
    ("TEMP", 2520),
    ("HUM", 2690),
    ("PRESS", 2860),
    ("GPS", 3030),
    ("SEC", 3200),
    ("AUTH", 3370),
    ("LOCK", 3540),
    ("UNLOCK", 3710),
    ("ACCESS", 3880),
    ("AI", 4050),
    ("TASK", 4220),
    ("LEARN", 4390),
    ("PREDICT", 4560),
    ("REPLY", 4730),
    ("PAY", 4900),
    ("BILL", 5070),
    ("CRYPTO", 5240),
    ("FIAT", 5410),
    ("EXCH", 5580),
];

static CANONICAL: OnceLock<Arc<Vocabulary>> = OnceLock::new();

/// Bidirectional symbol <-> frequency table
///
/// No mutation is exposed once built; frequencies and symbol names are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    by_symbol: HashMap<String, u32>,
    by_frequency: BTreeMap<u32, String>,
}

impl Vocabulary {
    /// The process-wide table, built on first use
    pub fn canonical() -> &'static Vocabulary {
        Self::canonical_shared_ref()
    }

    /// Shared handle to the process-wide table, for encoders and decoders
    pub fn canonical_shared() -> Arc<Vocabulary> {
        Arc::clone(Self::canonical_shared_ref())
    }

    fn canonical_shared_ref() -> &'static Arc<Vocabulary> {
        CANONICAL.get_or_init(|| Arc::new(Self::from_trusted(&CANONICAL_ENTRIES)))
    }

    /// Build and validate a table against a band plan
    pub fn new<S: AsRef<str>>(entries: &[(S, u32)], band: &BandPlan) -> Result<Self> {
        let mut by_symbol = HashMap::with_capacity(entries.len());
        let mut by_frequency = BTreeMap::new();

        for (symbol, frequency) in entries {
            let symbol = symbol.as_ref();
            if symbol.is_empty()
                || symbol.contains(TOKEN_DELIMITER)
                || symbol.contains(CONTENT_QUOTE)
            {
                return Err(AelError::InvalidSymbolName(symbol.to_string()));
            }
            if *frequency <= band.silence_ceiling || *frequency >= band.command_ceiling {
                return Err(AelError::FrequencyOutOfBand {
                    symbol: symbol.to_string(),
                    frequency: *frequency,
                });
            }
            if by_symbol.insert(symbol.to_string(), *frequency).is_some() {
                return Err(AelError::DuplicateSymbol(symbol.to_string()));
            }
            if by_frequency.insert(*frequency, symbol.to_string()).is_some() {
                return Err(AelError::DuplicateFrequency(*frequency));
            }
        }

        Ok(Self {
            by_symbol,
            by_frequency,
        })
    }

    // Canonical entries are checked by `test_canonical_table_validates`.
    fn from_trusted(entries: &[(&str, u32)]) -> Self {
        Self {
            by_symbol: entries
                .iter()
                .map(|&(symbol, frequency)| (symbol.to_string(), frequency))
                .collect(),
            by_frequency: entries
                .iter()
                .map(|&(symbol, frequency)| (frequency, symbol.to_string()))
                .collect(),
        }
    }

    pub fn lookup(&self, symbol: &str) -> Option<u32> {
        self.by_symbol.get(symbol).copied()
    }

    pub fn reverse_lookup(&self, frequency: u32) -> Option<&str> {
        self.by_frequency.get(&frequency).map(String::as_str)
    }

    /// Entry whose frequency is closest to `frequency`, with the absolute distance
    ///
    /// Equidistant neighbours resolve to the lower frequency. Returns `None` only
    /// for an empty table.
    pub fn nearest(&self, frequency: u32) -> Option<(&str, u32, u32)> {
        let below = self.by_frequency.range(..=frequency).next_back();
        let above = self.by_frequency.range(frequency..).next();

        let (freq, symbol) = match (below, above) {
            (Some(b), Some(a)) => {
                if frequency - *b.0 <= *a.0 - frequency {
                    b
                } else {
                    a
                }
            }
            (Some(b), None) => b,
            (None, Some(a)) => a,
            (None, None) => return None,
        };

        Some((symbol.as_str(), *freq, freq.abs_diff(frequency)))
    }

    /// Entries in ascending frequency order
    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.by_frequency
            .iter()
            .map(|(frequency, symbol)| (symbol.as_str(), *frequency))
    }

    pub fn len(&self) -> usize {
        self.by_frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_frequency.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_table_validates() {
        let validated = Vocabulary::new(&CANONICAL_ENTRIES, &BandPlan::default()).unwrap();
        assert_eq!(&validated, Vocabulary::canonical());
        assert_eq!(Vocabulary::canonical().len(), 25);
    }

    #[test]
    fn test_canonical_is_shared() {
        let a = Vocabulary::canonical() as *const Vocabulary;
        let b = Vocabulary::canonical() as *const Vocabulary;
        assert_eq!(a, b);

        let shared = Vocabulary::canonical_shared();
        assert!(std::ptr::eq(shared.as_ref(), Vocabulary::canonical()));
    }

    #[test]
    fn test_lookup_and_reverse_lookup() {
        let vocab = Vocabulary::canonical();
        assert_eq!(vocab.lookup("REQ"), Some(1500));
        assert_eq!(vocab.lookup("EXCH"), Some(5580));
        assert_eq!(vocab.lookup("req"), None);
        assert_eq!(vocab.reverse_lookup(1670), Some("ACT"));
        assert_eq!(vocab.reverse_lookup(1671), None);

        for (symbol, frequency) in vocab.entries() {
            assert_eq!(vocab.reverse_lookup(frequency), Some(symbol));
            assert_eq!(vocab.lookup(symbol), Some(frequency));
        }
    }

    #[test]
    fn test_nearest() {
        let vocab = Vocabulary::canonical();
        assert_eq!(vocab.nearest(1500), Some(("REQ", 1500, 0)));
        assert_eq!(vocab.nearest(1580), Some(("REQ", 1500, 80)));
        assert_eq!(vocab.nearest(1590), Some(("ACT", 1670, 80)));
        // Below and above the table
        assert_eq!(vocab.nearest(0), Some(("REQ", 1500, 1500)));
        assert_eq!(vocab.nearest(9000), Some(("EXCH", 5580, 3420)));
    }

    #[test]
    fn test_nearest_tie_prefers_lower() {
        let vocab = Vocabulary::new(&[("LO", 2000), ("HI", 2100)], &BandPlan::default()).unwrap();
        assert_eq!(vocab.nearest(2050), Some(("LO", 2000, 50)));
        assert_eq!(vocab.nearest(2051), Some(("HI", 2100, 49)));
    }

    #[test]
    fn test_nearest_empty() {
        let entries: [(&str, u32); 0] = [];
        let vocab = Vocabulary::new(&entries, &BandPlan::default()).unwrap();
        assert!(vocab.is_empty());
        assert_eq!(vocab.nearest(2000), None);
    }

    #[test]
    fn test_entries_sorted_by_frequency() {
        let frequencies: Vec<u32> = Vocabulary::canonical().entries().map(|(_, f)| f).collect();
        let mut sorted = frequencies.clone();
        sorted.sort_unstable();
        assert_eq!(frequencies, sorted);
        assert!(frequencies.iter().all(|&f| f < 6000 && f > 1200));
    }

    #[test]
    fn test_rejects_duplicates() {
        let band = BandPlan::default();
        assert_eq!(
            Vocabulary::new(&[("A", 2000), ("A", 2100)], &band),
            Err(AelError::DuplicateSymbol("A".into()))
        );
        assert_eq!(
            Vocabulary::new(&[("CONF", 1800), ("LOCK", 1800)], &band),
            Err(AelError::DuplicateFrequency(1800))
        );
    }

    #[test]
    fn test_rejects_out_of_band() {
        let band = BandPlan::default();
        assert!(matches!(
            Vocabulary::new(&[("HIGH", 6000)], &band),
            Err(AelError::FrequencyOutOfBand { frequency: 6000, .. })
        ));
        assert!(matches!(
            Vocabulary::new(&[("LOW", 1200)], &band),
            Err(AelError::FrequencyOutOfBand { frequency: 1200, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_names() {
        let band = BandPlan::default();
        assert!(Vocabulary::new(&[("", 2000)], &band).is_err());
        assert!(Vocabulary::new(&[("A|B", 2000)], &band).is_err());
        assert!(Vocabulary::new(&[("Q\"", 2000)], &band).is_err());
    }
}
