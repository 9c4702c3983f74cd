use std::fmt;

use serde::{Deserialize, Serialize};

/// One stream direction a resource may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    ByteRead,
    ByteWrite,
    CharRead,
    CharWrite,
}

impl Capability {
    pub fn is_read(&self) -> bool {
        matches!(self, Capability::ByteRead | Capability::CharRead)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ByteRead => "byte reading",
            Capability::ByteWrite => "byte writing",
            Capability::CharRead => "character reading",
            Capability::CharWrite => "character writing",
        };
        f.write_str(name)
    }
}

/// The capability subset a resource exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn supports(&self, capability: Capability) -> bool {
        match self {
            Access::ReadOnly => capability.is_read(),
            Access::WriteOnly => !capability.is_read(),
            Access::ReadWrite => true,
        }
    }

    pub fn is_readable(&self) -> bool {
        !matches!(self, Access::WriteOnly)
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Access::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Capability; 4] = [
        Capability::ByteRead,
        Capability::ByteWrite,
        Capability::CharRead,
        Capability::CharWrite,
    ];

    #[test]
    fn read_only_exposes_only_sources() {
        let supported: Vec<_> = ALL
            .into_iter()
            .filter(|c| Access::ReadOnly.supports(*c))
            .collect();
        assert_eq!(supported, vec![Capability::ByteRead, Capability::CharRead]);
        assert!(Access::ReadOnly.is_readable());
        assert!(!Access::ReadOnly.is_writable());
    }

    #[test]
    fn write_only_exposes_only_sinks() {
        let supported: Vec<_> = ALL
            .into_iter()
            .filter(|c| Access::WriteOnly.supports(*c))
            .collect();
        assert_eq!(supported, vec![Capability::ByteWrite, Capability::CharWrite]);
        assert!(!Access::WriteOnly.is_readable());
    }

    #[test]
    fn read_write_exposes_everything() {
        assert!(ALL.into_iter().all(|c| Access::ReadWrite.supports(c)));
    }
}
