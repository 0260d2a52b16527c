use serde::{Deserialize, Deserializer, Serialize, de};

use todoapi_core::Entity;

/// Item identifier. Plain integer, unique within a store.
pub type ItemId = i64;

/// A stored todo item.
///
/// Immutable once constructed: a replacement is a whole new `Item` with the
/// same id, never a partial field update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    completed: bool,
}

impl Item {
    pub fn new(id: ItemId, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Query-bound todo used by the binding demo endpoint. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: ItemId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "bool_any_case")]
    pub completed: bool,
}

/// Accepts a native bool or the strings `true`/`false` in any letter case.
fn bool_any_case<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct BoolVisitor;

    impl de::Visitor<'_> for BoolVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a boolean or \"true\"/\"false\" in any case")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
            if v.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if v.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }
    }

    deserializer.deserialize_any(BoolVisitor)
}
