//! Page offset module

use serde::{Deserialize, Serialize};

/// Calibrated page offset for one source file
///
/// `logical_minus_pdf_offset` is the stated (printed) page minus the physical
/// page index. A source with no row has no known offset, which is different
/// from an offset of zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOffset {
    /// Source file path the offset applies to
    pub source_pdf_path: String,
    /// Stated page minus physical page
    pub logical_minus_pdf_offset: i64,
    /// Number of quote instances the median was taken over
    pub n_examples: usize,
}

impl PageOffset {
    /// Map a stated page to a physical page, if the result is a valid page number
    ///
    /// Out-of-range arithmetic yields `None`.
    pub fn to_physical(&self, stated_page: i64) -> Option<u32> {
        let physical = stated_page.checked_sub(self.logical_minus_pdf_offset)?;
        u32::try_from(physical).ok().filter(|p| *p > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_physical() {
        let offset = PageOffset {
            source_pdf_path: "Smith_2010.pdf".to_string(),
            logical_minus_pdf_offset: 10,
            n_examples: 3,
        };
        assert_eq!(offset.to_physical(12), Some(2));
        assert_eq!(offset.to_physical(10), None);
        assert_eq!(offset.to_physical(3), None);
    }

    #[test]
    fn test_negative_offset() {
        let offset = PageOffset {
            source_pdf_path: "x.pdf".to_string(),
            logical_minus_pdf_offset: -2,
            n_examples: 1,
        };
        assert_eq!(offset.to_physical(1), Some(3));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let offset = PageOffset {
            source_pdf_path: "x.pdf".to_string(),
            logical_minus_pdf_offset: -5,
            n_examples: 1,
        };
        assert_eq!(offset.to_physical(i64::MAX), None);

        let offset = PageOffset {
            logical_minus_pdf_offset: i64::MAX,
            ..offset
        };
        assert_eq!(offset.to_physical(i64::MIN), None);
        assert_eq!(offset.to_physical(-2), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: a physical page shifted by the offset maps back to itself
        #[test]
        fn test_to_physical_inverts_shift(physical in 1u32..100_000, shift in -10_000i64..10_000) {
            let offset = PageOffset {
                source_pdf_path: "s.pdf".to_string(),
                logical_minus_pdf_offset: shift,
                n_examples: 1,
            };
            prop_assert_eq!(offset.to_physical(i64::from(physical) + shift), Some(physical));
        }

        /// Property: mapping never panics and never yields page 0
        #[test]
        fn test_to_physical_total(stated in any::<i64>(), shift in any::<i64>()) {
            let offset = PageOffset {
                source_pdf_path: "s.pdf".to_string(),
                logical_minus_pdf_offset: shift,
                n_examples: 0,
            };
            prop_assert_ne!(offset.to_physical(stated), Some(0));
        }
    }
}
