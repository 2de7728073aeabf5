use crate::error::{Error, Result};
use crate::header::Ehdr;

/// Headers discovered in one binary, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EhdrTable {
    entries: Vec<Ehdr>,
}

impl EhdrTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Ehdr> {
        self.entries.get(index).ok_or(Error::HeaderIndex {
            index,
            len: self.entries.len(),
        })
    }

    /// The file header at offset zero, if the table holds one.
    pub fn primary(&self) -> Option<&Ehdr> {
        self.entries.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ehdr> {
        self.entries.iter()
    }

    pub(crate) fn push(&mut self, ehdr: Ehdr) {
        self.entries.push(ehdr);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a EhdrTable {
    type Item = &'a Ehdr;
    type IntoIter = std::slice::Iter<'a, Ehdr>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn sample() -> Ehdr {
        let mut bytes = vec![0x7f, b'E', b'L', b'F', 2, 1, 1];
        bytes.resize(64, 0);
        Ehdr::parse(&bytes).unwrap()
    }

    #[test]
    fn empty_table() {
        let table = EhdrTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.primary().is_none());

        let err = table.get(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Argument);
        assert!(matches!(err, Error::HeaderIndex { index: 0, len: 0 }));
    }

    #[test]
    fn push_get_clear() {
        let mut table = EhdrTable::new();
        table.push(sample());
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0).unwrap(), &sample());
        assert!(table.get(1).is_err());
        assert_eq!(table.iter().count(), 1);

        table.clear();
        assert!(table.is_empty());
    }
}
