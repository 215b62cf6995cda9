use serde::Serialize;
use serde_json::Value;

/// A list filter understood by the document database.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal(String, Vec<Value>),
    OrderDesc(String),
    Limit(u32),
    CursorAfter(String),
    Search(String, String),
}

#[derive(Serialize)]
struct Encoded<'a> {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<Value>>,
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal(attribute.into(), vec![value.into()])
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    pub fn limit(limit: u32) -> Self {
        Self::Limit(limit)
    }

    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Self::CursorAfter(document_id.into())
    }

    pub fn search(attribute: impl Into<String>, term: impl Into<String>) -> Self {
        Self::Search(attribute.into(), term.into())
    }

    fn encoded(&self) -> Encoded<'_> {
        match self {
            Self::Equal(attribute, values) => Encoded {
                method: "equal",
                attribute: Some(attribute),
                values: Some(values.clone()),
            },
            Self::OrderDesc(attribute) => Encoded {
                method: "orderDesc",
                attribute: Some(attribute),
                values: None,
            },
            Self::Limit(limit) => Encoded {
                method: "limit",
                attribute: None,
                values: Some(vec![Value::from(*limit)]),
            },
            Self::CursorAfter(id) => Encoded {
                method: "cursorAfter",
                attribute: None,
                values: Some(vec![Value::from(id.as_str())]),
            },
            Self::Search(attribute, term) => Encoded {
                method: "search",
                attribute: Some(attribute),
                values: Some(vec![Value::from(term.as_str())]),
            },
        }
    }

    /// JSON form sent as a `queries[]` parameter.
    pub fn encode(&self) -> String {
        // Encoded holds only strings and JSON values, which always serialize.
        serde_json::to_string(&self.encoded()).unwrap_or_default()
    }
}

impl Serialize for Query {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encoded().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn decoded(query: &Query) -> Value {
        serde_json::from_str(&query.encode()).unwrap()
    }

    #[test]
    fn encodes_each_method() {
        assert_eq!(
            decoded(&Query::equal("accountId", "acc-1")),
            json!({ "method": "equal", "attribute": "accountId", "values": ["acc-1"] })
        );
        assert_eq!(
            decoded(&Query::order_desc("$updatedAt")),
            json!({ "method": "orderDesc", "attribute": "$updatedAt" })
        );
        assert_eq!(
            decoded(&Query::limit(10)),
            json!({ "method": "limit", "values": [10] })
        );
        assert_eq!(
            decoded(&Query::cursor_after("p9")),
            json!({ "method": "cursorAfter", "values": ["p9"] })
        );
        assert_eq!(
            decoded(&Query::search("caption", "sunset beach")),
            json!({ "method": "search", "attribute": "caption", "values": ["sunset beach"] })
        );
    }

    #[test]
    fn encoding_is_compact() {
        assert_eq!(
            Query::limit(20).encode(),
            r#"{"method":"limit","values":[20]}"#
        );
    }
}
