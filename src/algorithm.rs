use std::fmt;
use std::str::FromStr;

use crate::error::TransposeError;
use crate::partition::Policy;

/// The closed set of transpose strategies the crate offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Single thread, row by row. The reference result.
    Serial,
    Naive,
    Diagonal,
    Block,
}

impl Algorithm {
    /// Every algorithm, baseline first.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Serial,
        Algorithm::Naive,
        Algorithm::Diagonal,
        Algorithm::Block,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Naive => "naive",
            Self::Diagonal => "diagonal",
            Self::Block => "block",
        }
    }

    /// Column heading used in the timings table.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Serial => "Serial",
            Self::Naive => "Threads:Naive",
            Self::Diagonal => "Threads:Diagonal",
            Self::Block => "Threads:Block",
        }
    }

    /// Partition policy behind a parallel algorithm, `None` for serial.
    pub const fn policy(self, tile: usize) -> Option<Policy> {
        match self {
            Self::Serial => None,
            Self::Naive => Some(Policy::Naive),
            Self::Diagonal => Some(Policy::Diagonal),
            Self::Block => Some(Policy::Block { tile }),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = TransposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TransposeError::UnknownAlgorithm {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.to_string(), algorithm.name());
        }
        assert_eq!("Block".parse::<Algorithm>().unwrap(), Algorithm::Block);
        assert!(matches!(
            "openmp".parse::<Algorithm>(),
            Err(TransposeError::UnknownAlgorithm { .. })
        ));
    }

    #[test]
    fn test_policies() {
        assert_eq!(Algorithm::Serial.policy(32), None);
        assert_eq!(Algorithm::Block.policy(16), Some(Policy::Block { tile: 16 }));
    }
}
