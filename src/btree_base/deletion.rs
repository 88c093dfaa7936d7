use std::ops;

use bitmask_enum::bitmask;

/// What a removal did to the tree on its way down.
#[bitmask(u8)]
pub enum RemovalFlags {
    Ok = 0,
    NotFound = 1,
    Borrowed = 2,
    Merged = 4,
    RootShrunk = 8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemovalResult {
    pub flags: RemovalFlags,
}

impl RemovalResult {
    pub fn new(flags: RemovalFlags) -> Self {
        Self { flags }
    }

    pub fn has(&self, flag: RemovalFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_removed(&self) -> bool {
        !self.has(RemovalFlags::NotFound)
    }
}

impl ops::BitOrAssign<RemovalResult> for RemovalResult {
    fn bitor_assign(&mut self, rhs: RemovalResult) {
        self.flags = self.flags | rhs.flags;
    }
}

impl ops::BitOrAssign<RemovalFlags> for RemovalResult {
    fn bitor_assign(&mut self, rhs: RemovalFlags) {
        self.flags = self.flags | rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accumulate() {
        let mut res = RemovalResult::new(RemovalFlags::Ok);
        assert!(res.is_removed());
        res |= RemovalFlags::Merged;
        res |= RemovalResult::new(RemovalFlags::Borrowed);
        assert!(res.has(RemovalFlags::Merged));
        assert!(res.has(RemovalFlags::Borrowed));
        assert!(!res.has(RemovalFlags::RootShrunk));
        res |= RemovalFlags::NotFound;
        assert!(!res.is_removed());
    }
}
