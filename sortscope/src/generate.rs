//! Input sequence generation.
//!
//! Every order produces a permutation of `0..len`, so bar heights always span
//! the full range and a sorted result is simply `0, 1, ..., len - 1`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sortscope_common::{Element, Handle};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Initial arrangement of a generated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayOrder {
    Ascending,
    Descending,
    #[default]
    Random,
    /// Sorted, with small neighbourhoods (1 to 9 elements) shuffled.
    MostlySorted,
    /// Shuffled, with a few sorted runs of up to a third of the length.
    PartiallySorted,
}

impl ArrayOrder {
    pub const ALL: [ArrayOrder; 5] = [
        ArrayOrder::Ascending,
        ArrayOrder::Descending,
        ArrayOrder::Random,
        ArrayOrder::MostlySorted,
        ArrayOrder::PartiallySorted,
    ];

    /// Kebab-case name accepted on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArrayOrder::Ascending => "ascending",
            ArrayOrder::Descending => "descending",
            ArrayOrder::Random => "random",
            ArrayOrder::MostlySorted => "mostly-sorted",
            ArrayOrder::PartiallySorted => "partially-sorted",
        }
    }

    /// The order after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|o| *o == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ArrayOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArrayOrder::Ascending => "Ascending",
            ArrayOrder::Descending => "Descending",
            ArrayOrder::Random => "Random",
            ArrayOrder::MostlySorted => "Mostly Sorted",
            ArrayOrder::PartiallySorted => "Partially Sorted",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order '{0}' (expected ascending, descending, random, mostly-sorted or partially-sorted)")]
pub struct ParseOrderError(String);

impl FromStr for ArrayOrder {
    type Err = ParseOrderError;

    /// Accepts the kebab-case names as well as the display names, ignoring
    /// case, spaces, dashes and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "ascending" => Ok(ArrayOrder::Ascending),
            "descending" => Ok(ArrayOrder::Descending),
            "random" => Ok(ArrayOrder::Random),
            "mostlysorted" => Ok(ArrayOrder::MostlySorted),
            "partiallysorted" => Ok(ArrayOrder::PartiallySorted),
            _ => Err(ParseOrderError(s.to_string())),
        }
    }
}

/// Generate `len` elements in the given order, with handles attached.
#[must_use]
pub fn generate(len: usize, order: ArrayOrder) -> Vec<Element> {
    generate_with(&mut StdRng::from_entropy(), len, order)
}

/// Same as [`generate`] with a caller-provided random source.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, len: usize, order: ArrayOrder) -> Vec<Element> {
    let mut values: Vec<i32> = (0..len).map(|v| i32::try_from(v).unwrap_or(i32::MAX)).collect();

    match order {
        ArrayOrder::Ascending => {}
        ArrayOrder::Descending => values.reverse(),
        ArrayOrder::Random => values.shuffle(rng),
        ArrayOrder::MostlySorted => {
            let mut start = 0;
            while start < len {
                let end = (start + rng.gen_range(1..=9)).min(len);
                values[start..end].shuffle(rng);
                start = end;
            }
        }
        ArrayOrder::PartiallySorted => {
            values.shuffle(rng);
            let max_run = len / 3;
            let mut start = rng.gen_range(0..=max_run);
            while start < len {
                let end = (start + rng.gen_range(0..=max_run)).min(len);
                values[start..end].sort_unstable();
                // Always advance, even when both draws are zero
                start = end + rng.gen_range(0..=max_run).max(1);
            }
        }
    }

    let mut items: Vec<Element> = values.into_iter().map(Element::new).collect();
    attach_handles(&mut items);
    items
}

/// Give position `i` the handle `Handle(i)`, replacing any previous handle.
pub fn attach_handles(items: &mut [Element]) {
    for (item, index) in items.iter_mut().zip(0u32..) {
        item.set_handle(Some(Handle(index)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[Element]) -> Vec<i32> {
        items.iter().map(Element::value).collect()
    }

    fn is_permutation(items: &[Element]) -> bool {
        let mut sorted = values(items);
        sorted.sort_unstable();
        sorted.iter().zip(0..).all(|(v, i)| *v == i)
    }

    #[test]
    fn test_ascending_and_descending() {
        assert_eq!(values(&generate(5, ArrayOrder::Ascending)), vec![0, 1, 2, 3, 4]);
        assert_eq!(values(&generate(5, ArrayOrder::Descending)), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_every_order_is_a_permutation_with_handles() {
        let mut rng = StdRng::seed_from_u64(7);
        for order in ArrayOrder::ALL {
            for len in [0, 1, 2, 3, 10, 257] {
                let items = generate_with(&mut rng, len, order);
                assert_eq!(items.len(), len);
                assert!(is_permutation(&items), "{order} / {len}");
                for (i, item) in items.iter().enumerate() {
                    assert_eq!(item.handle(), Some(Handle(u32::try_from(i).unwrap())));
                }
            }
        }
    }

    #[test]
    fn test_mostly_sorted_stays_local() {
        let mut rng = StdRng::seed_from_u64(42);
        let items = generate_with(&mut rng, 500, ArrayOrder::MostlySorted);
        for (i, item) in items.iter().enumerate() {
            let displacement = (i64::from(item.value()) - i64::try_from(i).unwrap()).abs();
            assert!(displacement < 9, "value {} at {i}", item.value());
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_with(&mut StdRng::seed_from_u64(3), 64, ArrayOrder::PartiallySorted);
        let b = generate_with(&mut StdRng::seed_from_u64(3), 64, ArrayOrder::PartiallySorted);
        assert_eq!(values(&a), values(&b));
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("mostly-sorted".parse::<ArrayOrder>(), Ok(ArrayOrder::MostlySorted));
        assert_eq!("Partially Sorted".parse::<ArrayOrder>(), Ok(ArrayOrder::PartiallySorted));
        assert_eq!("RANDOM".parse::<ArrayOrder>(), Ok(ArrayOrder::Random));
        assert!("sideways".parse::<ArrayOrder>().is_err());
        for order in ArrayOrder::ALL {
            assert_eq!(order.as_str().parse::<ArrayOrder>(), Ok(order));
            assert_eq!(order.to_string().parse::<ArrayOrder>(), Ok(order));
        }
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(ArrayOrder::Ascending.next(), ArrayOrder::Descending);
        assert_eq!(ArrayOrder::PartiallySorted.next(), ArrayOrder::Ascending);
    }
}
