//! Stored `date` values are epoch milliseconds, but documents written by other
//! clients may carry them as doubles, numeric strings or BSON datetimes.

use serde::{de, Deserializer};
use serde_json::Value;
use std::fmt;

/// Millis out of the inner value of a `{"$date": ...}` datetime.
fn millis_from_extended(inner: &Value) -> Option<i64> {
    match inner {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Object(o) => o.get("$numberLong").and_then(millis_from_extended),
        _ => None,
    }
}

pub fn deserialize_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct MillisVisitor;

    impl<'de> de::Visitor<'de> for MillisVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("epoch milliseconds as a number, numeric string or datetime")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom("date out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            if v.is_finite() {
                Ok(v as i64)
            } else {
                Err(E::custom("date is not finite"))
            }
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim().parse::<i64>().map_err(|_| E::custom(format!("invalid date: {v}")))
        }

        fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<i64, A::Error> {
            match map.next_key::<String>()?.as_deref() {
                Some("$date") => {
                    let inner: Value = map.next_value()?;
                    millis_from_extended(&inner).ok_or_else(|| de::Error::custom(format!("invalid $date: {inner}")))
                }
                _ => Err(de::Error::custom("expected a {\"$date\": ...} datetime")),
            }
        }
    }

    deserializer.deserialize_any(MillisVisitor)
}
