use crate::config::BandPlan;
use crate::vocabulary::Vocabulary;
use crate::{CHAR_SPACING_HZ, MAX_CHAR_CODE, MIN_CHAR_CODE, REPLACEMENT_CHAR};

/// Outcome of classifying one detected frequency
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// At or below the silence ceiling; never part of the token stream
    Silence,
    Symbol(String),
    Char(char),
    Unknown(u32),
}

/// Band router and tolerance matcher
///
/// Every frequency has exactly one outcome:
///
/// 1. `f <= silence_ceiling` -> `Silence`
/// 2. `text_low <= f < text_high` -> `Char`, `'?'` when the code is not printable
/// 3. `f < command_ceiling` -> nearest symbol if within tolerance, else `Unknown`
/// 4. anything else (guard band, above the text band) -> `Unknown`
#[derive(Debug, Clone)]
pub struct SymbolMatcher<'v> {
    vocabulary: &'v Vocabulary,
    band: BandPlan,
}

impl<'v> SymbolMatcher<'v> {
    pub fn new(vocabulary: &'v Vocabulary, band: BandPlan) -> Self {
        Self { vocabulary, band }
    }

    pub fn vocabulary(&self) -> &'v Vocabulary {
        self.vocabulary
    }

    pub fn classify(&self, frequency: u32) -> Classification {
        let band = &self.band;

        if frequency <= band.silence_ceiling {
            return Classification::Silence;
        }

        if (band.text_low..band.text_high).contains(&frequency) {
            let code = self.char_code(frequency);
            return match char::from_u32(code) {
                Some(ch) if (MIN_CHAR_CODE..=MAX_CHAR_CODE).contains(&code) => {
                    Classification::Char(ch)
                }
                _ => Classification::Char(REPLACEMENT_CHAR),
            };
        }

        if frequency < band.command_ceiling {
            if let Some((symbol, closest, distance)) = self.vocabulary.nearest(frequency) {
                if self.within_tolerance(closest, distance) {
                    return Classification::Symbol(symbol.to_string());
                }
            }
        }

        Classification::Unknown(frequency)
    }

    /// Character code carried by a text-band frequency, rounded to the nearest code
    ///
    /// Computed as `floor((f - text_low + 5) / 10)`. The `+ 5` already does the
    /// rounding, so the quotient must be truncated. `round((f + 5 - text_low) / 10)`
    /// rounds twice and reads an exact 7970 Hz tone ('a', code 97) as 97.5, then 98.
    /// Halfway frequencies round up. Frequencies below `text_low` map to code 0.
    pub fn char_code(&self, frequency: u32) -> u32 {
        (frequency.saturating_sub(self.band.text_low) + CHAR_SPACING_HZ / 2) / CHAR_SPACING_HZ
    }

    /// Acceptance radius around `closest`: `max(floor, percent% of closest)`, in whole Hz
    pub fn tolerance_for(&self, closest: u32) -> u32 {
        let relative = closest as u64 * self.band.tolerance_percent as u64 / 100;
        (relative as u32).max(self.band.tolerance_floor_hz)
    }

    // Compared at 100x scale so fractional tolerances stay exact.
    fn within_tolerance(&self, closest: u32, distance: u32) -> bool {
        let scaled_distance = distance as u64 * 100;
        let scaled_floor = self.band.tolerance_floor_hz as u64 * 100;
        let scaled_relative = closest as u64 * self.band.tolerance_percent as u64;
        scaled_distance <= scaled_floor.max(scaled_relative)
    }
}
