use std::fmt;
use std::str::FromStr;

use crate::error::GridError;

/// Number of rows shown per page. Only a fixed set of sizes is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum PageSize {
    Ten,
    TwentyFive,
    #[default]
    Fifty,
    Hundred,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
        PageSize::Hundred,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    /// Next larger size, staying at the largest.
    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(pos + 1).min(Self::ALL.len() - 1)]
    }

    /// Next smaller size, staying at the smallest.
    pub fn previous(self) -> Self {
        let pos = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[pos.saturating_sub(1)]
    }
}

impl TryFrom<usize> for PageSize {
    type Error = GridError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.get() == value)
            .ok_or(GridError::UnsupportedPageSize(value))
    }
}

impl FromStr for PageSize {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s
            .trim()
            .parse()
            .map_err(|_| GridError::InvalidPageSize(s.to_string()))?;
        PageSize::try_from(n)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// The window of `items` shown on the 1-based page `page_index`.
///
/// Out of range pages give an empty slice; page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: PageSize) -> &[T] {
    let size = page_size.get();
    let begin = page_index.max(1).saturating_sub(1).saturating_mul(size);
    let begin = std::cmp::min(begin, items.len());
    let end = std::cmp::min(begin.saturating_add(size), items.len());
    &items[begin..end]
}

/// Number of pages needed for `count` items, at least one.
pub fn page_count(count: usize, page_size: PageSize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}
