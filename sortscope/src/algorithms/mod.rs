//! # Algorithm Catalogue
//!
//! Plain sorting routines written against [`Tracked`](sortscope_common::Tracked). None of them knows
//! about threads, throttling or rendering; each just forwards
//! [`Cancelled`](sortscope_common::Cancelled) with `?`.
//!
//! | Name                | Family    | Extra memory |
//! |---------------------|-----------|--------------|
//! | QuickSort           | partition | stack        |
//! | MergeSort           | merge     | O(n)         |
//! | Bottom-Up MergeSort | merge     | O(n)         |
//! | In-Place MergeSort  | merge     | stack        |
//! | HeapSort            | selection | none         |
//! | ShellSort           | insertion | none         |
//! | InsertionSort       | insertion | none         |
//! | SelectionSort       | selection | none         |
//! | BubbleSort          | exchange  | none         |
//! | CocktailSort        | exchange  | none         |

mod heap;
mod merge;
mod quick;
mod simple;

use sortscope_common::Algorithm;

pub use heap::heap_sort;
pub use merge::{bottom_up_merge_sort, in_place_merge_sort, merge_sort};
pub use quick::quick_sort;
pub use simple::{bubble_sort, cocktail_sort, insertion_sort, selection_sort, shell_sort};

const CATALOGUE: &[Algorithm] = &[
    Algorithm { name: "QuickSort", run: quick_sort },
    Algorithm { name: "MergeSort", run: merge_sort },
    Algorithm { name: "Bottom-Up MergeSort", run: bottom_up_merge_sort },
    Algorithm { name: "In-Place MergeSort", run: in_place_merge_sort },
    Algorithm { name: "HeapSort", run: heap_sort },
    Algorithm { name: "ShellSort", run: shell_sort },
    Algorithm { name: "InsertionSort", run: insertion_sort },
    Algorithm { name: "SelectionSort", run: selection_sort },
    Algorithm { name: "BubbleSort", run: bubble_sort },
    Algorithm { name: "CocktailSort", run: cocktail_sort },
];

/// Every available algorithm, in menu order. The first entry is the default.
#[must_use]
pub fn catalogue() -> &'static [Algorithm] {
    CATALOGUE
}

/// Look an algorithm up by name, ignoring ASCII case.
#[must_use]
pub fn find(name: &str) -> Option<&'static Algorithm> {
    CATALOGUE.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_quicksort() {
        assert_eq!(catalogue()[0].name, "QuickSort");
        assert_eq!(catalogue().len(), 10);
    }

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find("shellsort").map(|a| a.name), Some("ShellSort"));
        assert_eq!(find("BOTTOM-UP MERGESORT").map(|a| a.name), Some("Bottom-Up MergeSort"));
        assert!(find("bogosort").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<&str> = catalogue().iter().map(|a| a.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalogue().len());
    }

    #[test]
    fn test_every_entry_sorts() {
        for algorithm in catalogue() {
            test_support::check(algorithm.run);
        }
    }
}
