// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// A 2-D canvas coordinate.
///
/// The copy embedded in a tree node is a cache; the position overlay is the
/// source of truth for placement (see the sync engine's reconciliation pass).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::Position;

    #[test]
    fn positions_compare_by_value() {
        assert_eq!(Position::new(50.0, 50.0), Position::new(50.0, 50.0));
        assert_ne!(Position::new(0.0, 0.0), Position::new(50.0, 50.0));
    }
}
