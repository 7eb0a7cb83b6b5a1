// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// How well a card is known, from 0 (New) to 5 (Expert). A value of this type
/// is always within that range.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const NEW: MasteryLevel = MasteryLevel(0);
    pub const MAX: MasteryLevel = MasteryLevel(5);

    /// Every level, lowest first.
    pub fn all() -> impl Iterator<Item = MasteryLevel> {
        (Self::NEW.0..=Self::MAX.0).map(MasteryLevel)
    }

    /// Build a level from an arbitrary integer, clamping it into range.
    pub fn clamped(level: i64) -> Self {
        Self(level.clamp(Self::NEW.0 as i64, Self::MAX.0 as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn raised(self) -> Self {
        Self((self.0 + 1).min(Self::MAX.0))
    }

    pub fn lowered(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "New",
            1 => "Learning",
            2 => "Familiar",
            3 => "Proficient",
            4 => "Advanced",
            _ => "Expert",
        }
    }
}

impl TryFrom<i64> for MasteryLevel {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Self::NEW.0 as i64..=Self::MAX.0 as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            fail(format!("invalid mastery level: {value}"))
        }
    }
}

impl Display for MasteryLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for MasteryLevel {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0 as i64))
    }
}

impl FromSql for MasteryLevel {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw: i64 = FromSql::column_result(value)?;
        MasteryLevel::try_from(raw).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl Serialize for MasteryLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(MasteryLevel::clamped(-3), MasteryLevel::NEW);
        assert_eq!(MasteryLevel::clamped(3).value(), 3);
        assert_eq!(MasteryLevel::clamped(42), MasteryLevel::MAX);
    }

    #[test]
    fn test_try_from() {
        assert_eq!(MasteryLevel::try_from(4).map(|m| m.value()), Ok(4));
        let err = MasteryLevel::try_from(6).unwrap_err();
        assert_eq!(err.message(), "invalid mastery level: 6");
        assert!(MasteryLevel::try_from(-1).is_err());
    }

    #[test]
    fn test_raise_and_lower_saturate() {
        assert_eq!(MasteryLevel::MAX.raised(), MasteryLevel::MAX);
        assert_eq!(MasteryLevel::NEW.lowered(), MasteryLevel::NEW);
        assert_eq!(MasteryLevel::clamped(2).raised().value(), 3);
        assert_eq!(MasteryLevel::clamped(2).lowered().value(), 1);
    }

    #[test]
    fn test_all() {
        let levels: Vec<u8> = MasteryLevel::all().map(|m| m.value()).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_labels() {
        assert_eq!(MasteryLevel::NEW.label(), "New");
        assert_eq!(MasteryLevel::MAX.label(), "Expert");
    }
}
