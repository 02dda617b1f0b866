use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{InvalidFieldValue, UnknownField};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(PlayerId);

/// Backend-owned roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub rank: i64,
    pub player_name: String,
    pub age: i64,
    pub hits: i64,
    pub year: i64,
    pub bats: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Fields a user may edit. `id` and `rank` belong to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerField {
    PlayerName,
    Age,
    Hits,
    Year,
    Bats,
    Description,
}

impl PlayerField {
    pub const ALL: [PlayerField; 6] = [
        PlayerField::PlayerName,
        PlayerField::Age,
        PlayerField::Hits,
        PlayerField::Year,
        PlayerField::Bats,
        PlayerField::Description,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayerField::PlayerName => "player_name",
            PlayerField::Age => "age",
            PlayerField::Hits => "hits",
            PlayerField::Year => "year",
            PlayerField::Bats => "bats",
            PlayerField::Description => "description",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, PlayerField::Age | PlayerField::Hits | PlayerField::Year)
    }
}

impl fmt::Display for PlayerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        PlayerField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// One slot of a [`PlayerDraft`].
///
/// `Unset` is omitted from request bodies, `Cleared` is sent as an explicit
/// `null`, `Value` carries the edited value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DraftField<T> {
    #[default]
    Unset,
    Cleared,
    Value(T),
}

impl<T> DraftField<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, DraftField::Unset)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            DraftField::Value(value) => Some(value),
            DraftField::Unset | DraftField::Cleared => None,
        }
    }
}

impl<T> From<Option<T>> for DraftField<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(DraftField::Cleared, DraftField::Value)
    }
}

impl<T: Serialize> Serialize for DraftField<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DraftField::Value(value) => value.serialize(serializer),
            DraftField::Unset | DraftField::Cleared => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DraftField<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(DraftField::from)
    }
}

/// Partial working copy of a [`Player`] with per-field presence tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDraft {
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub id: DraftField<PlayerId>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub rank: DraftField<i64>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub player_name: DraftField<String>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub age: DraftField<i64>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub hits: DraftField<i64>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub year: DraftField<i64>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub bats: DraftField<String>,
    #[serde(default, skip_serializing_if = "DraftField::is_unset")]
    pub description: DraftField<String>,
}

impl PlayerDraft {
    /// Parses `raw` for `field` and stores it. The draft is left untouched
    /// when a numeric field receives non-numeric input.
    pub fn assign(&mut self, field: PlayerField, raw: &str) -> Result<(), InvalidFieldValue> {
        match field {
            PlayerField::PlayerName => self.player_name = DraftField::Value(raw.to_string()),
            PlayerField::Bats => self.bats = DraftField::Value(raw.to_string()),
            PlayerField::Description => self.description = DraftField::Value(raw.to_string()),
            PlayerField::Age => self.age = DraftField::Value(parse_number(field, raw)?),
            PlayerField::Hits => self.hits = DraftField::Value(parse_number(field, raw)?),
            PlayerField::Year => self.year = DraftField::Value(parse_number(field, raw)?),
        }
        Ok(())
    }

    pub fn clear(&mut self, field: PlayerField) {
        match field {
            PlayerField::PlayerName => self.player_name = DraftField::Cleared,
            PlayerField::Age => self.age = DraftField::Cleared,
            PlayerField::Hits => self.hits = DraftField::Cleared,
            PlayerField::Year => self.year = DraftField::Cleared,
            PlayerField::Bats => self.bats = DraftField::Cleared,
            PlayerField::Description => self.description = DraftField::Cleared,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = DraftField::Value(description.into());
        self
    }

    /// Applies the present fields on top of `player`.
    ///
    /// Required columns cannot be nulled, so `Cleared` only affects
    /// `description`. `id` and `rank` are never taken from the draft.
    pub fn merged_into(&self, player: &Player) -> Player {
        let mut merged = player.clone();
        if let Some(name) = self.player_name.value() {
            merged.player_name.clone_from(name);
        }
        if let Some(age) = self.age.value() {
            merged.age = *age;
        }
        if let Some(hits) = self.hits.value() {
            merged.hits = *hits;
        }
        if let Some(year) = self.year.value() {
            merged.year = *year;
        }
        if let Some(bats) = self.bats.value() {
            merged.bats.clone_from(bats);
        }
        match &self.description {
            DraftField::Value(description) => merged.description = Some(description.clone()),
            DraftField::Cleared => merged.description = None,
            DraftField::Unset => {}
        }
        merged
    }
}

fn parse_number(field: PlayerField, raw: &str) -> Result<i64, InvalidFieldValue> {
    raw.trim().parse::<i64>().map_err(|_| InvalidFieldValue {
        field,
        value: raw.to_string(),
    })
}

impl From<&Player> for PlayerDraft {
    fn from(player: &Player) -> Self {
        Self {
            id: DraftField::Value(player.id),
            rank: DraftField::Value(player.rank),
            player_name: DraftField::Value(player.player_name.clone()),
            age: DraftField::Value(player.age),
            hits: DraftField::Value(player.hits),
            year: DraftField::Value(player.year),
            bats: DraftField::Value(player.bats.clone()),
            description: player.description.clone().into(),
        }
    }
}
