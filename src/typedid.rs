use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::{Decode, Encode, Sqlite, Type};

pub trait TypedIdMarker {
    fn tag() -> &'static str;
}

/// Integer primary key tagged with the entity it belongs to.
pub struct TypedId<T: TypedIdMarker>(i64, PhantomData<fn() -> T>);

impl<T: TypedIdMarker> TypedId<T> {
    pub fn from_raw(id: i64) -> TypedId<T> {
        TypedId(id, PhantomData)
    }

    pub fn raw(self) -> i64 {
        self.0
    }
}

impl<T: TypedIdMarker> Copy for TypedId<T> {}

impl<T: TypedIdMarker> Clone for TypedId<T> {
    fn clone(&self) -> TypedId<T> {
        *self
    }
}

impl<T: TypedIdMarker> PartialEq for TypedId<T> {
    fn eq(&self, other: &TypedId<T>) -> bool {
        self.0 == other.0
    }
}

impl<T: TypedIdMarker> Eq for TypedId<T> {}

impl<T: TypedIdMarker> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: TypedIdMarker> Display for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

// debug output carries the tag so ids are distinguishable in span fields
impl<T: TypedIdMarker> Debug for TypedId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}#{}", T::tag(), self.0)
    }
}

impl<T: TypedIdMarker> FromStr for TypedId<T> {
    type Err = TypedIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = i64::from_str(s).map_err(|_| TypedIdParseError::InvalidNumber)?;
        if id <= 0 {
            return Err(TypedIdParseError::OutOfRange);
        }

        Ok(TypedId(id, PhantomData))
    }
}

impl<T: TypedIdMarker> Serialize for TypedId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de, T: TypedIdMarker> Deserialize<'de> for TypedId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(TypedId(id, PhantomData))
    }
}

impl<T: TypedIdMarker> Type<Sqlite> for TypedId<T> {
    fn type_info() -> <Sqlite as sqlx::Database>::TypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &<Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q, T: TypedIdMarker> Encode<'q, Sqlite> for TypedId<T> {
    fn encode_by_ref(
        &self,
        buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
    }
}

impl<'r, T: TypedIdMarker> Decode<'r, Sqlite> for TypedId<T> {
    fn decode(value: <Sqlite as sqlx::Database>::ValueRef<'r>) -> Result<Self, BoxDynError> {
        let id = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(TypedId(id, PhantomData))
    }
}

#[derive(Copy, Clone, Debug)]
pub enum TypedIdParseError {
    InvalidNumber,
    OutOfRange,
}

impl Display for TypedIdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl TypedIdMarker for Widget {
        fn tag() -> &'static str {
            "WDG"
        }
    }

    #[test]
    fn parses_positive_integers_only() {
        let id: TypedId<Widget> = "42".parse().unwrap();
        assert_eq!(id.raw(), 42);
        assert!("0".parse::<TypedId<Widget>>().is_err());
        assert!("abc".parse::<TypedId<Widget>>().is_err());
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = TypedId::<Widget>::from_raw(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        assert_eq!(format!("{:?}", id), "WDG#7");
    }
}
