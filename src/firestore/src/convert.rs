// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Conversions between the prost wire types and the crate model.

use crate::google::firestore::v1 as pb;
use crate::google::firestore::v1::batch_get_documents_request::ConsistencySelector;
use crate::google::firestore::v1::value::ValueType;
use crate::model::{Document, LatLng, ReadOptions, Value};

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConvertError {
    #[error("the value for field `{0}` has no `value_type`")]
    MissingValueType(String),
}

pub(crate) trait FromProto<T> {
    fn cnv(self) -> Result<T, ConvertError>;
}

pub(crate) trait ToProto<T> {
    fn to_proto(self) -> T;
}

impl FromProto<wkt::Timestamp> for prost_types::Timestamp {
    fn cnv(self) -> Result<wkt::Timestamp, ConvertError> {
        Ok(wkt::Timestamp::clamp(self.seconds, self.nanos))
    }
}

impl ToProto<prost_types::Timestamp> for wkt::Timestamp {
    fn to_proto(self) -> prost_types::Timestamp {
        prost_types::Timestamp {
            seconds: self.seconds(),
            nanos: self.nanos(),
        }
    }
}

impl FromProto<Document> for pb::Document {
    fn cnv(self) -> Result<Document, ConvertError> {
        Ok(Document {
            fields: cnv_fields(self.fields)?,
            create_time: self.create_time.map(FromProto::cnv).transpose()?,
            update_time: self.update_time.map(FromProto::cnv).transpose()?,
            name: self.name,
        })
    }
}

fn cnv_fields<I>(fields: I) -> Result<std::collections::BTreeMap<String, Value>, ConvertError>
where
    I: IntoIterator<Item = (String, pb::Value)>,
{
    fields
        .into_iter()
        .map(|(k, v)| match v.value_type {
            None => Err(ConvertError::MissingValueType(k)),
            Some(t) => t.cnv().map(|v| (k, v)),
        })
        .collect()
}

impl FromProto<Value> for ValueType {
    fn cnv(self) -> Result<Value, ConvertError> {
        let value = match self {
            ValueType::NullValue(_) => Value::Null,
            ValueType::BooleanValue(v) => Value::Boolean(v),
            ValueType::IntegerValue(v) => Value::Integer(v),
            ValueType::DoubleValue(v) => Value::Double(v),
            ValueType::TimestampValue(v) => Value::Timestamp(v.cnv()?),
            ValueType::StringValue(v) => Value::String(v),
            ValueType::BytesValue(v) => Value::Bytes(bytes::Bytes::from(v)),
            ValueType::ReferenceValue(v) => Value::Reference(v),
            ValueType::GeoPointValue(v) => Value::GeoPoint(LatLng::new(v.latitude, v.longitude)),
            ValueType::ArrayValue(v) => Value::Array(
                v.values
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| match v.value_type {
                        None => Err(ConvertError::MissingValueType(format!("[{i}]"))),
                        Some(t) => t.cnv(),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            ValueType::MapValue(v) => Value::Map(cnv_fields(v.fields)?),
        };
        Ok(value)
    }
}

impl ToProto<ConsistencySelector> for ReadOptions {
    fn to_proto(self) -> ConsistencySelector {
        match self {
            ReadOptions::ReadTime(t) => ConsistencySelector::ReadTime(t.to_proto()),
            ReadOptions::Transaction(id) => ConsistencySelector::Transaction(id.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::google::r#type::LatLng as PbLatLng;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn pb_value(t: ValueType) -> pb::Value {
        pb::Value {
            value_type: Some(t),
        }
    }

    #[test]
    fn timestamp() -> anyhow::Result<()> {
        let input = prost_types::Timestamp {
            seconds: 1_613_779_200,
            nanos: 123_000,
        };
        let got: wkt::Timestamp = input.cnv()?;
        assert_eq!(got.seconds(), 1_613_779_200);
        assert_eq!(got.nanos(), 123_000);
        assert_eq!(got.to_proto(), input);
        Ok(())
    }

    #[test]
    fn document() -> anyhow::Result<()> {
        let ts = prost_types::Timestamp {
            seconds: 1_000,
            nanos: 0,
        };
        let input = pb::Document {
            name: "projects/p/databases/d/documents/C/a".into(),
            fields: HashMap::from([
                ("null".to_string(), pb_value(ValueType::NullValue(0))),
                ("bool".to_string(), pb_value(ValueType::BooleanValue(true))),
                ("int".to_string(), pb_value(ValueType::IntegerValue(42))),
                ("double".to_string(), pb_value(ValueType::DoubleValue(1.5))),
                (
                    "ts".to_string(),
                    pb_value(ValueType::TimestampValue(ts)),
                ),
                (
                    "string".to_string(),
                    pb_value(ValueType::StringValue("abc".into())),
                ),
                (
                    "bytes".to_string(),
                    pb_value(ValueType::BytesValue(vec![1, 2, 3])),
                ),
                (
                    "ref".to_string(),
                    pb_value(ValueType::ReferenceValue(
                        "projects/p/databases/d/documents/C/b".into(),
                    )),
                ),
                (
                    "geo".to_string(),
                    pb_value(ValueType::GeoPointValue(PbLatLng {
                        latitude: 1.0,
                        longitude: -2.0,
                    })),
                ),
                (
                    "array".to_string(),
                    pb_value(ValueType::ArrayValue(pb::ArrayValue {
                        values: vec![
                            pb_value(ValueType::IntegerValue(1)),
                            pb_value(ValueType::StringValue("two".into())),
                        ],
                    })),
                ),
                (
                    "map".to_string(),
                    pb_value(ValueType::MapValue(pb::MapValue {
                        fields: HashMap::from([(
                            "inner".to_string(),
                            pb_value(ValueType::BooleanValue(false)),
                        )]),
                    })),
                ),
            ]),
            create_time: Some(ts),
            update_time: Some(ts),
        };
        let got: Document = input.cnv()?;
        let ts = wkt::Timestamp::clamp(1_000, 0);
        let want = Document::new()
            .set_name("projects/p/databases/d/documents/C/a")
            .set_create_time(ts.clone())
            .set_update_time(ts.clone())
            .set_fields([
                ("null", Value::Null),
                ("bool", Value::Boolean(true)),
                ("int", Value::Integer(42)),
                ("double", Value::Double(1.5)),
                ("ts", Value::Timestamp(ts)),
                ("string", Value::String("abc".into())),
                ("bytes", Value::Bytes(bytes::Bytes::from_static(&[1, 2, 3]))),
                (
                    "ref",
                    Value::Reference("projects/p/databases/d/documents/C/b".into()),
                ),
                ("geo", Value::GeoPoint(LatLng::new(1.0, -2.0))),
                (
                    "array",
                    Value::Array(vec![Value::Integer(1), Value::String("two".into())]),
                ),
                (
                    "map",
                    Value::Map([("inner".to_string(), Value::Boolean(false))].into()),
                ),
            ]);
        assert_eq!(got, want);
        Ok(())
    }

    #[test]
    fn missing_value_type() {
        let input = pb::Document {
            name: "projects/p/databases/d/documents/C/a".into(),
            fields: HashMap::from([("empty".to_string(), pb::Value { value_type: None })]),
            ..Default::default()
        };
        let got = FromProto::<Document>::cnv(input);
        assert!(
            matches!(&got, Err(ConvertError::MissingValueType(f)) if f == "empty"),
            "{got:?}"
        );

        let input = ValueType::ArrayValue(pb::ArrayValue {
            values: vec![pb::Value { value_type: None }],
        });
        let got = FromProto::<Value>::cnv(input);
        assert!(
            matches!(&got, Err(ConvertError::MissingValueType(f)) if f == "[0]"),
            "{got:?}"
        );
    }

    #[test]
    fn read_options() {
        let input = ReadOptions::ReadTime(wkt::Timestamp::clamp(123, 456));
        let got = input.to_proto();
        assert_eq!(
            got,
            ConsistencySelector::ReadTime(prost_types::Timestamp {
                seconds: 123,
                nanos: 456
            })
        );

        let input = ReadOptions::Transaction(bytes::Bytes::from_static(b"txn-id"));
        let got = input.to_proto();
        assert_eq!(got, ConsistencySelector::Transaction(b"txn-id".to_vec()));
    }
}
