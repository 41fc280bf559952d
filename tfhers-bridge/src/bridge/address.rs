use std::fmt;

/// Address of an input or output of a module function.
///
/// A positional address only names a slot when the module has a single function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SlotAddress {
    Positional(usize),
    Named { function: String, index: usize },
}

impl SlotAddress {
    pub fn index(&self) -> usize {
        match self {
            Self::Positional(index) | Self::Named { index, .. } => *index,
        }
    }

    pub fn function(&self) -> Option<&str> {
        match self {
            Self::Positional(_) => None,
            Self::Named { function, .. } => Some(function),
        }
    }
}

impl From<usize> for SlotAddress {
    fn from(index: usize) -> Self {
        Self::Positional(index)
    }
}

impl From<(&str, usize)> for SlotAddress {
    fn from((function, index): (&str, usize)) -> Self {
        Self::Named {
            function: function.to_owned(),
            index,
        }
    }
}

impl From<(String, usize)> for SlotAddress {
    fn from((function, index): (String, usize)) -> Self {
        Self::Named { function, index }
    }
}

impl From<&SlotAddress> for SlotAddress {
    fn from(address: &SlotAddress) -> Self {
        address.clone()
    }
}

impl fmt::Display for SlotAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional(index) => write!(f, "{index}"),
            Self::Named { function, index } => write!(f, "('{function}', {index})"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Input,
    Output,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}
