use std::{
    fmt,
    io::{Read, Write},
};

use indexmap::IndexMap;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Serialize,
};

use crate::{error::Result, hash::StringKey, types::StringTable};

impl Serialize for StringTable {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(&format!("{:08X}", k), v)?;
        }
        map.end()
    }
}

struct StringTableVisitor {}

impl StringTableVisitor {
    fn new() -> Self {
        StringTableVisitor {}
    }
}

impl<'de> Visitor<'de> for StringTableVisitor {
    type Value = IndexMap<u32, String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of hexadecimal keys or labels to strings")
    }

    fn visit_map<M>(self, mut access: M) -> core::result::Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, value)) = access.next_entry::<String, String>()? {
            map.insert(StringKey::parse(&key).hashed(), value);
        }

        Ok(map)
    }
}

impl<'de> Deserialize<'de> for StringTable {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(StringTable::new(
            deserializer.deserialize_map(StringTableVisitor::new())?,
        ))
    }
}

impl StringTable {
    /// Read a table exported as JSON
    pub fn read_json<R: Read>(reader: R) -> Result<StringTable> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the table as indented JSON, keeping non-ASCII text as is
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::hash::hash;
    use crate::types::StringTable;

    #[test]
    fn export_uses_hex_keys() -> Result<()> {
        let table: StringTable = [(0x0A1B2C3D, "苏伊士".to_string()), (0xFF, "x".to_string())]
            .into_iter()
            .collect();

        let mut actual = Vec::new();
        table.write_json(&mut actual)?;

        assert_eq!(
            String::from_utf8(actual)?,
            "{\n    \"0A1B2C3D\": \"苏伊士\",\n    \"000000FF\": \"x\"\n}"
        );

        Ok(())
    }

    #[test]
    fn import_accepts_hex_and_labels() -> Result<()> {
        let json = r#"{ "0A1B2C3D": "a", "0x10": "b", "new_label": "c" }"#;

        let table = StringTable::read_json(json.as_bytes())?;

        assert_eq!(
            table.iter().map(|(k, v)| (*k, v.as_str())).collect::<Vec<_>>(),
            vec![(0x0A1B2C3D, "a"), (0x10, "b"), (hash("new_label"), "c")]
        );

        Ok(())
    }

    #[test]
    fn round_trip_keeps_order() -> Result<()> {
        let table: StringTable = [(3, "c".to_string()), (1, "a".to_string())]
            .into_iter()
            .collect();

        let mut json = Vec::new();
        table.write_json(&mut json)?;

        assert_eq!(StringTable::read_json(json.as_slice())?, table);

        Ok(())
    }
}
